//! Street network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`,
//! `edge_max_speed_kmh`) are sorted by source node and indexed by `EdgeId`.
//! Edge ids are stable for a given network: the congestion-weighted graph
//! stores its per-edge state in parallel arrays indexed the same way.
//!
//! There is at most one edge per ordered `(from, to)` pair.  Parallel edges
//! collapse to the shortest at build time, so congestion stamped on a node
//! pair covers every way between the two nodes.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  Used
//! to snap segment endpoints and routing queries to intersections.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

use igo_core::{EdgeId, GeoPoint, NodeId};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-node queries within a city.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── StreetNetwork ─────────────────────────────────────────────────────────────

/// Directed street graph in CSR format plus a spatial index for node snapping.
///
/// Immutable once built; share it behind an `Arc`.  Do not construct
/// directly; use [`StreetNetworkBuilder`].
pub struct StreetNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge, for path reconstruction.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Length of each edge in metres.
    pub edge_length_m: Vec<f32>,

    /// Speed limit in km/h, resolved once from the raw tags at build time.
    pub edge_max_speed_kmh: Vec<f32>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl StreetNetwork {
    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        StreetNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// The edge from `from` to `to`, if the two are adjacent.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.out_edges(from).find(|e| self.edge_to[e.index()] == to)
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest node to `pos`.
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    // ── Snapshot (cache) conversion ───────────────────────────────────────

    /// Flatten into a serializable snapshot.  Edges are emitted in `EdgeId`
    /// order so [`from_snapshot`](Self::from_snapshot) reproduces the ids.
    pub fn to_snapshot(&self) -> NetworkSnapshot {
        let edges = (0..self.edge_count())
            .map(|i| SnapshotEdge {
                from:          self.edge_from[i],
                to:            self.edge_to[i],
                length_m:      self.edge_length_m[i],
                max_speed_kmh: self.edge_max_speed_kmh[i],
            })
            .collect();
        NetworkSnapshot { nodes: self.node_pos.clone(), edges }
    }

    /// Rebuild a network from a snapshot.  Edges referencing unknown nodes
    /// are dropped.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Self {
        let mut b = StreetNetworkBuilder::with_capacity(snapshot.nodes.len(), snapshot.edges.len());
        for pos in snapshot.nodes {
            b.add_node(pos);
        }
        let n = b.node_count();
        for e in snapshot.edges {
            if e.from.index() < n && e.to.index() < n {
                b.add_directed_edge(e.from, e.to, e.length_m, e.max_speed_kmh);
            }
        }
        b.build()
    }
}

/// Serializable form of a [`StreetNetwork`], used by the on-disk cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub nodes: Vec<GeoPoint>,
    pub edges: Vec<SnapshotEdge>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub from:          NodeId,
    pub to:            NodeId,
    pub length_m:      f32,
    pub max_speed_kmh: f32,
}

// ── StreetNetworkBuilder ──────────────────────────────────────────────────────

/// Construct a [`StreetNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use igo_core::GeoPoint;
/// use igo_spatial::StreetNetworkBuilder;
///
/// let mut b = StreetNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(41.38, 2.17));
/// let c = b.add_node(GeoPoint::new(41.39, 2.17));
/// b.add_street(a, c, 1_100.0, 50.0);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // both directions
/// ```
pub struct StreetNetworkBuilder {
    nodes:     Vec<GeoPoint>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:          NodeId,
    to:            NodeId,
    length_m:      f32,
    max_speed_kmh: f32,
}

impl StreetNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add an intersection and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge from `from` to `to`.
    ///
    /// - `length_m`: physical length in metres.
    /// - `max_speed_kmh`: resolved speed limit (see [`crate::speed`]).
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f32, max_speed_kmh: f32) {
        self.raw_edges.push(RawEdge { from, to, length_m, max_speed_kmh });
    }

    /// Convenience: add edges in **both directions** for a two-way street.
    pub fn add_street(&mut self, a: NodeId, b: NodeId, length_m: f32, max_speed_kmh: f32) {
        self.add_directed_edge(a, b, length_m, max_speed_kmh);
        self.add_directed_edge(b, a, length_m, max_speed_kmh);
    }

    /// Position of a node added earlier (used by loaders to compute edge
    /// lengths between adjacent way nodes).
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`StreetNetwork`].
    ///
    /// Edges are ordered by `(from, to)`.  Of several edges between the same
    /// ordered pair only the shortest is kept (the first added on a tie), so
    /// a snapshot round-trip keeps every `EdgeId`.
    pub fn build(self) -> StreetNetwork {
        let node_count = self.nodes.len();

        let mut raw = self.raw_edges;
        raw.sort_by(|a, b| {
            (a.from, a.to)
                .cmp(&(b.from, b.to))
                .then(a.length_m.total_cmp(&b.length_m))
        });
        raw.dedup_by_key(|e| (e.from, e.to));
        let edge_count = raw.len();

        let edge_from:          Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:            Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m:      Vec<f32>    = raw.iter().map(|e| e.length_m).collect();
        let edge_max_speed_kmh: Vec<f32>    = raw.iter().map(|e| e.max_speed_kmh).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.lat, pos.lon],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        StreetNetwork {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_max_speed_kmh,
            spatial_idx,
        }
    }
}

impl Default for StreetNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
