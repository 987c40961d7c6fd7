//! Single-pair Dijkstra over the CSR street graph.
//!
//! # Pluggable cost
//!
//! The search is parameterised by an [`EdgeCost`].  The street graph alone
//! only knows geometric length ([`ByLength`], used to map named segments
//! onto edges); the congestion-weighted graph in `igo-traffic` supplies its
//! own per-edge weight.  A cost of `None` removes the edge from the search,
//! which is how impassable edges are pruned.
//!
//! # Determinism
//!
//! Heap entries are ordered by `(cost, NodeId)` and a node's out-edges are
//! relaxed in `EdgeId` order, so equal-cost ties always resolve the same way
//! on the same network.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use igo_core::{EdgeId, NodeId};

use crate::network::StreetNetwork;

// ── Route ─────────────────────────────────────────────────────────────────────

/// A path through the street graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes in travel order, source and destination included.
    pub nodes: Vec<NodeId>,
    /// Edges in travel order; `edges.len() == nodes.len() - 1`.
    pub edges: Vec<EdgeId>,
    /// Sum of the edge costs under the cost function used for the search.
    pub total_cost: f32,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Total geometric length in metres.
    pub fn length_m(&self, network: &StreetNetwork) -> f32 {
        self.edges.iter().map(|e| network.edge_length_m[e.index()]).sum()
    }
}

// ── Edge cost ─────────────────────────────────────────────────────────────────

/// Per-edge weight for a shortest-path search.
pub trait EdgeCost {
    /// Non-negative finite cost of traversing `edge`, or `None` to skip it.
    fn cost(&self, network: &StreetNetwork, edge: EdgeId) -> Option<f32>;
}

/// Geometric length in metres.
#[derive(Copy, Clone, Debug, Default)]
pub struct ByLength;

impl EdgeCost for ByLength {
    #[inline]
    fn cost(&self, network: &StreetNetwork, edge: EdgeId) -> Option<f32> {
        Some(network.edge_length_m[edge.index()])
    }
}

/// Length-shortest path between two nodes, ignoring traffic.
pub fn shortest_path_by_length(network: &StreetNetwork, from: NodeId, to: NodeId) -> Option<Route> {
    dijkstra(network, from, to, &ByLength)
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Minimum-cost path from `from` to `to`, or `None` if `to` is unreachable
/// (or either node is not in the network).
///
/// `from == to` yields a trivial route with a single node and no edges.
pub fn dijkstra<C: EdgeCost + ?Sized>(
    network: &StreetNetwork,
    from: NodeId,
    to: NodeId,
    cost_fn: &C,
) -> Option<Route> {
    if !network.contains_node(from) || !network.contains_node(to) {
        return None;
    }
    if from == to {
        return Some(Route { nodes: vec![from], edges: vec![], total_cost: 0.0 });
    }

    let n = network.node_count();
    let mut dist      = vec![f32::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Min-heap via Reverse.  NodeId as secondary key for stable tie-breaking.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f32>, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), from)));

    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        if node == to {
            return Some(reconstruct(network, &prev_edge, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let Some(w) = cost_fn.cost(network, edge) else {
                continue;
            };
            if !w.is_finite() || w < 0.0 {
                continue;
            }
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + w;

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((OrderedFloat(new_cost), neighbor)));
            }
        }
    }

    None
}

fn reconstruct(
    network: &StreetNetwork,
    prev_edge: &[EdgeId],
    from: NodeId,
    to: NodeId,
    total_cost: f32,
) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        debug_assert_ne!(e, EdgeId::INVALID, "settled node without predecessor");
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| network.edge_to[e.index()]));

    Route { nodes, edges, total_cost }
}
