//! Congestion propagation: segment-level observations onto graph edges.
//!
//! # Matching
//!
//! A highway segment is only known by its polyline.  The default
//! [`ShortestLengthMatcher`] snaps the first and last polyline points to
//! their nearest nodes and takes the length-shortest path between them as
//! the run of edges the segment covers.  This is a heuristic: a segment that
//! bends away from the geometrically shortest street gets the wrong edges.
//! A map-matcher that follows the whole polyline can replace it through the
//! [`SegmentMatcher`] trait without touching the rest of the pipeline.
//!
//! Matching only depends on the street graph and the catalog, neither of
//! which changes between refreshes, so [`MatchedSegments`] is computed once
//! and each refresh only re-stamps levels.
//!
//! # Stamping
//!
//! For every matched segment with a known (non-zero) current level, every
//! edge of its run gets that level.  Segments overlap rarely; when they do
//! the later segment in catalog order overwrites the earlier one.

use log::debug;
use serde::Serialize;

use igo_core::{EdgeId, SegmentId};
use igo_feed::{HighwaySegment, ObservationIndex};
use igo_spatial::{shortest_path_by_length, StreetNetwork};

use crate::weighted::WeightedGraph;

// ── Matching ──────────────────────────────────────────────────────────────────

/// Result of mapping one segment onto the street graph.
#[derive(Clone, Debug, PartialEq)]
pub enum SegmentMatch {
    /// Edges covered by the segment, in travel order.  Never empty.
    Edges(Vec<EdgeId>),
    /// Both endpoints snapped to the same node.
    Degenerate,
    /// No directed path between the snapped endpoints.
    NoPath,
    /// The polyline is empty or the network has no nodes.
    Unsnappable,
}

/// Maps a highway segment onto a run of edges.
pub trait SegmentMatcher: Send + Sync {
    fn match_segment(&self, network: &StreetNetwork, segment: &HighwaySegment) -> SegmentMatch;
}

/// Snap endpoints, then take the length-shortest path between them.
#[derive(Copy, Clone, Debug, Default)]
pub struct ShortestLengthMatcher;

impl SegmentMatcher for ShortestLengthMatcher {
    fn match_segment(&self, network: &StreetNetwork, segment: &HighwaySegment) -> SegmentMatch {
        let (Some(start), Some(end)) = (segment.start(), segment.end()) else {
            return SegmentMatch::Unsnappable;
        };
        let (Some(org), Some(dst)) = (network.snap_to_node(start), network.snap_to_node(end)) else {
            return SegmentMatch::Unsnappable;
        };
        if org == dst {
            return SegmentMatch::Degenerate;
        }
        match shortest_path_by_length(network, org, dst) {
            Some(route) if !route.edges.is_empty() => SegmentMatch::Edges(route.edges),
            Some(_) => SegmentMatch::Degenerate,
            None => SegmentMatch::NoPath,
        }
    }
}

/// Every catalog segment with its match, in catalog order.
#[derive(Clone, Debug, Default)]
pub struct MatchedSegments {
    entries: Vec<(SegmentId, SegmentMatch)>,
}

impl MatchedSegments {
    /// Match every segment.  Runs on Rayon's pool with the `parallel`
    /// feature; catalog order is kept either way.
    pub fn compute<M: SegmentMatcher + ?Sized>(
        network: &StreetNetwork,
        segments: &[HighwaySegment],
        matcher: &M,
    ) -> Self {
        #[cfg(feature = "parallel")]
        let entries = {
            use rayon::prelude::*;
            segments
                .par_iter()
                .map(|s| (s.id, matcher.match_segment(network, s)))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let entries = segments
            .iter()
            .map(|s| (s.id, matcher.match_segment(network, s)))
            .collect();

        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(SegmentId, SegmentMatch)> {
        self.entries.iter()
    }

    pub fn get(&self, segment: SegmentId) -> Option<&SegmentMatch> {
        self.entries.iter().find(|(id, _)| *id == segment).map(|(_, m)| m)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Segments that map onto at least one edge.
    pub fn matched_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, m)| matches!(m, SegmentMatch::Edges(_)))
            .count()
    }
}

// ── Stamping ──────────────────────────────────────────────────────────────────

/// What one propagation pass did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PropagationReport {
    /// Segments whose level was written onto edges.
    pub segments_stamped:  usize,
    /// Segments absent from the congestion feed.
    pub no_observation:    usize,
    /// Segments reported with level 0.
    pub unknown_level:     usize,
    /// Segments whose endpoints snap to one node, or cannot be snapped.
    pub degenerate:        usize,
    /// Segments with no path between their endpoints.
    pub no_path:           usize,
    /// Edge writes performed, overlaps counted twice.
    pub edges_stamped:     usize,
}

/// Stamp every matched segment's current level onto its edges.
///
/// Edges covered by no segment keep whatever level `graph` already has,
/// which for a fresh graph is `Unknown`.
pub fn apply(
    graph: &mut WeightedGraph,
    matches: &MatchedSegments,
    observations: &ObservationIndex,
) -> PropagationReport {
    let mut report = PropagationReport::default();

    for (segment, m) in matches.iter() {
        let Some(obs) = observations.get(*segment) else {
            report.no_observation += 1;
            continue;
        };
        if !obs.current.is_known() {
            report.unknown_level += 1;
            continue;
        }
        match m {
            SegmentMatch::Edges(edges) => {
                for &edge in edges {
                    graph.set_congestion(edge, obs.current);
                }
                report.segments_stamped += 1;
                report.edges_stamped += edges.len();
            }
            SegmentMatch::Degenerate | SegmentMatch::Unsnappable => {
                debug!("segment {segment}: endpoints collapse, nothing to stamp");
                report.degenerate += 1;
            }
            SegmentMatch::NoPath => {
                debug!("segment {segment}: no path between endpoints");
                report.no_path += 1;
            }
        }
    }

    report
}
