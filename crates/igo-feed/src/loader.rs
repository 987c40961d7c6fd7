//! CSV feed parsers.
//!
//! # Highway catalog
//!
//! Comma-delimited, double-quoted.  The coordinate column is itself a
//! comma-separated `lon,lat,lon,lat,…` list.
//!
//! ```csv
//! Tram,Descripció,Coordenades
//! 1,Diagonal (Ronda de Dalt a Doctor Marañón),"2.112035,41.384191,2.101502,41.381630"
//! ```
//!
//! # Congestion feed
//!
//! `#`-delimited, one row per segment:
//!
//! ```text
//! 1#20210512103005#2#3
//! ```
//!
//! columns `segment_id # timestamp # current_status # predicted_status`.
//!
//! Both feeds may or may not start with a header line.  A first row whose
//! leading field is not an integer is treated as a header and skipped.

use std::io::Read;

use log::{debug, warn};
use serde::Deserialize;

use igo_core::{CongestionLevel, GeoPoint, SegmentId};

use crate::record::{CongestionObservation, HighwaySegment};
use crate::{FeedError, FeedResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SegmentRecord {
    way_id:      u32,
    description: String,
    coordinates: String,
}

#[derive(Deserialize)]
struct ObservationRecord {
    segment_id: u32,
    timestamp:  u64,
    current:    u8,
    predicted:  u8,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse the highway segment catalog.
///
/// # Errors
///
/// Any malformed row fails the whole feed: a catalog with holes would
/// silently drop congestion for the missing segments.
pub fn parse_segments<R: Read>(reader: R) -> FeedResult<Vec<HighwaySegment>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut segments = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        if row == 0 && is_header(&record) {
            continue;
        }
        let rec: SegmentRecord = record.deserialize(None)?;
        let polyline = parse_polyline(&rec.coordinates)
            .map_err(|e| FeedError::Parse(format!("segment {}: {e}", rec.way_id)))?;
        segments.push(HighwaySegment {
            id:          SegmentId(rec.way_id),
            description: rec.description,
            polyline,
        });
    }
    Ok(segments)
}

/// Parse the congestion feed.
///
/// Rows whose current status lies outside `0..=6` are skipped with a
/// warning; an out-of-range predicted status is read as `Unknown`.
pub fn parse_observations<R: Read>(reader: R) -> FeedResult<Vec<CongestionObservation>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'#')
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut observations = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        if row == 0 && is_header(&record) {
            continue;
        }
        let rec: ObservationRecord = record.deserialize(None)?;

        let current = match CongestionLevel::try_from(rec.current) {
            Ok(level) => level,
            Err(e) => {
                warn!("skipping congestion row for segment {}: {e}", rec.segment_id);
                continue;
            }
        };
        let predicted = CongestionLevel::try_from(rec.predicted).unwrap_or_else(|e| {
            debug!("segment {}: predicted status ignored: {e}", rec.segment_id);
            CongestionLevel::Unknown
        });

        observations.push(CongestionObservation {
            segment_id: SegmentId(rec.segment_id),
            timestamp:  rec.timestamp,
            current,
            predicted,
        });
    }
    Ok(observations)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(0)
        .is_none_or(|first| first.parse::<u64>().is_err())
}

/// Parse `lon,lat,lon,lat,…` into points.
fn parse_polyline(s: &str) -> Result<Vec<GeoPoint>, String> {
    let values = s
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f32>()
                .map_err(|e| format!("invalid coordinate {v:?}: {e}"))
        })
        .collect::<Result<Vec<f32>, String>>()?;

    if values.is_empty() || values.len() % 2 != 0 {
        return Err(format!("expected lon,lat pairs, got {} values", values.len()));
    }

    let polyline: Vec<GeoPoint> = values
        .chunks_exact(2)
        .map(|pair| GeoPoint::from_lon_lat(pair[0], pair[1]))
        .collect();

    if let Some(bad) = polyline.iter().find(|p| !p.is_valid()) {
        return Err(format!("coordinate out of range: {bad}"));
    }
    Ok(polyline)
}
