//! Fastest-route queries over a [`WeightedGraph`].

use serde::Serialize;

use igo_core::{CongestionLevel, EdgeId, GeoPoint, NodeId};
use igo_spatial::dijkstra;

use crate::error::{TrafficError, TrafficResult};
use crate::weighted::WeightedGraph;

/// A found route with everything a caller needs to draw or describe it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteDetail {
    /// Nodes in travel order, snapped origin and destination included.
    pub nodes:       Vec<NodeId>,
    pub edges:       Vec<EdgeId>,
    /// Position of every node in `nodes`.
    pub coordinates: Vec<GeoPoint>,
    /// Congestion level of every edge in `edges`.
    pub congestion:  Vec<CongestionLevel>,
    pub length_m:    f32,
    /// Sum of the itime weights along the route.
    pub weight:      f32,
}

/// Result of a routing query.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteOutcome {
    Found(RouteDetail),
    /// The snapped destination is unreachable under current weights.
    NoPath { origin: NodeId, destination: NodeId },
}

impl RouteOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, RouteOutcome::Found(_))
    }

    /// Node sequence of a found route.
    pub fn nodes(&self) -> Option<&[NodeId]> {
        match self {
            RouteOutcome::Found(detail) => Some(&detail.nodes),
            RouteOutcome::NoPath { .. } => None,
        }
    }
}

/// Snap both coordinates and find the itime-shortest path between them.
///
/// Closed edges are never used.  When both coordinates snap to the same node
/// the route is that single node.  Reads `graph` only.
pub fn route(graph: &WeightedGraph, origin: GeoPoint, destination: GeoPoint) -> TrafficResult<RouteOutcome> {
    let network = graph.network();
    let from = network
        .snap_to_node(origin)
        .ok_or(TrafficError::Snap { point: origin })?;
    let to = network
        .snap_to_node(destination)
        .ok_or(TrafficError::Snap { point: destination })?;
    Ok(route_nodes(graph, from, to))
}

/// [`route`] between two known nodes.
pub fn route_nodes(graph: &WeightedGraph, from: NodeId, to: NodeId) -> RouteOutcome {
    let network = graph.network();
    let Some(path) = dijkstra(network, from, to, graph) else {
        return RouteOutcome::NoPath { origin: from, destination: to };
    };

    RouteOutcome::Found(RouteDetail {
        coordinates: path.nodes.iter().map(|n| network.node_pos[n.index()]).collect(),
        congestion:  path.edges.iter().map(|&e| graph.congestion(e)).collect(),
        length_m:    path.length_m(network),
        weight:      path.total_cost,
        nodes:       path.nodes,
        edges:       path.edges,
    })
}
