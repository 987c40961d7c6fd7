//! The congestion-weighted graph.
//!
//! A [`WeightedGraph`] pairs the shared, immutable [`StreetNetwork`] with two
//! per-edge arrays indexed by `EdgeId`: the current congestion level and the
//! itime weight derived from it.  Congestion is only ever changed through
//! [`WeightedGraph::set_congestion`], which recomputes that edge's weight in
//! the same step, so no edge can carry a weight from an older level.
//!
//! Graphs are never mutated once published; a refresh builds a new one.

use std::sync::Arc;

use igo_core::{CongestionLevel, EdgeId};
use igo_feed::{CongestionObservation, HighwaySegment, ObservationIndex};
use igo_spatial::{EdgeCost, StreetNetwork};

use crate::itime::itime;
use crate::propagate::{apply, MatchedSegments, PropagationReport, ShortestLengthMatcher};

pub struct WeightedGraph {
    network:     Arc<StreetNetwork>,
    congestion:  Vec<CongestionLevel>,
    travel_time: Vec<f32>,
    version:     u64,
    report:      PropagationReport,
}

impl WeightedGraph {
    /// Every edge `Unknown`, weights computed.
    pub fn new(network: Arc<StreetNetwork>) -> Self {
        let edges = network.edge_count();
        let mut graph = Self {
            network,
            congestion:  vec![CongestionLevel::Unknown; edges],
            travel_time: vec![0.0; edges],
            version:     0,
            report:      PropagationReport::default(),
        };
        graph.recompute_weights();
        graph
    }

    /// Match every segment onto the network, stamp the observed levels and
    /// derive all weights.
    ///
    /// One-shot form; a long-running service matches segments once and
    /// calls [`from_matches`](Self::from_matches) on each refresh.
    pub fn build(
        network: Arc<StreetNetwork>,
        segments: &[HighwaySegment],
        observations: &[CongestionObservation],
    ) -> Self {
        let matches = MatchedSegments::compute(&network, segments, &ShortestLengthMatcher);
        Self::from_matches(network, &matches, &ObservationIndex::new(observations), 0)
    }

    /// Build version `version` from pre-matched segments.
    pub fn from_matches(
        network: Arc<StreetNetwork>,
        matches: &MatchedSegments,
        observations: &ObservationIndex,
        version: u64,
    ) -> Self {
        let mut graph = Self::new(network);
        graph.version = version;
        graph.report = apply(&mut graph, matches, observations);
        graph.recompute_weights();
        graph
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn network(&self) -> &StreetNetwork {
        &self.network
    }

    #[inline]
    pub fn shared_network(&self) -> &Arc<StreetNetwork> {
        &self.network
    }

    #[inline]
    pub fn congestion(&self, edge: EdgeId) -> CongestionLevel {
        self.congestion[edge.index()]
    }

    #[inline]
    pub fn travel_time(&self, edge: EdgeId) -> f32 {
        self.travel_time[edge.index()]
    }

    /// Refresh counter: 0 for the initial graph, +1 per successful refresh.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Outcome of the propagation that produced this graph.
    #[inline]
    pub fn report(&self) -> &PropagationReport {
        &self.report
    }

    /// Number of edges at each congestion level, indexed by wire value.
    pub fn level_counts(&self) -> [usize; 7] {
        let mut counts = [0usize; 7];
        for level in &self.congestion {
            counts[level.value() as usize] += 1;
        }
        counts
    }

    // ── Mutation (only while building) ────────────────────────────────────

    /// Set an edge's level and recompute its weight.
    pub(crate) fn set_congestion(&mut self, edge: EdgeId, level: CongestionLevel) {
        let i = edge.index();
        self.congestion[i] = level;
        self.travel_time[i] = itime(
            level,
            self.network.edge_length_m[i],
            self.network.edge_max_speed_kmh[i],
        );
    }

    /// Recompute every weight from its current `(congestion, length,
    /// max_speed)` triple.  Never reads the previous weights.
    pub(crate) fn recompute_weights(&mut self) {
        let network = &self.network;
        let congestion = &self.congestion;

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.travel_time
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, t)| {
                    *t = itime(congestion[i], network.edge_length_m[i], network.edge_max_speed_kmh[i]);
                });
        }

        #[cfg(not(feature = "parallel"))]
        for (i, t) in self.travel_time.iter_mut().enumerate() {
            *t = itime(congestion[i], network.edge_length_m[i], network.edge_max_speed_kmh[i]);
        }
    }
}

/// itime as the Dijkstra weight.  Closed edges (`+∞`) are pruned.
impl EdgeCost for WeightedGraph {
    #[inline]
    fn cost(&self, _network: &StreetNetwork, edge: EdgeId) -> Option<f32> {
        let w = self.travel_time[edge.index()];
        w.is_finite().then_some(w)
    }
}
