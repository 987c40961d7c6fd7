//! Feed records.

use std::collections::HashMap;

use igo_core::{CongestionLevel, GeoPoint, SegmentId};

/// A named stretch of street as published in the highway catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct HighwaySegment {
    pub id: SegmentId,
    pub description: String,
    /// Ordered polyline.  Never empty once parsed.
    pub polyline: Vec<GeoPoint>,
}

impl HighwaySegment {
    #[inline]
    pub fn start(&self) -> Option<GeoPoint> {
        self.polyline.first().copied()
    }

    #[inline]
    pub fn end(&self) -> Option<GeoPoint> {
        self.polyline.last().copied()
    }
}

/// One row of the congestion feed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CongestionObservation {
    pub segment_id: SegmentId,
    /// Feed timestamp as published, `YYYYMMDDhhmmss`.
    pub timestamp: u64,
    pub current: CongestionLevel,
    pub predicted: CongestionLevel,
}

/// Observations keyed by segment.
///
/// If the feed lists a segment more than once the first row wins.
#[derive(Clone, Debug, Default)]
pub struct ObservationIndex {
    by_segment: HashMap<SegmentId, CongestionObservation>,
}

impl ObservationIndex {
    pub fn new(observations: &[CongestionObservation]) -> Self {
        let mut by_segment = HashMap::with_capacity(observations.len());
        for obs in observations {
            by_segment.entry(obs.segment_id).or_insert(*obs);
        }
        Self { by_segment }
    }

    pub fn get(&self, segment: SegmentId) -> Option<&CongestionObservation> {
        self.by_segment.get(&segment)
    }

    /// Current level of `segment`, `Unknown` when the feed says nothing.
    pub fn status_of(&self, segment: SegmentId) -> CongestionLevel {
        self.get(segment).map_or(CongestionLevel::Unknown, |o| o.current)
    }

    pub fn len(&self) -> usize {
        self.by_segment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_segment.is_empty()
    }
}
