//! Travel-time model.
//!
//! The per-edge weight ("itime") is derived from the edge's speed limit,
//! derated by the reported congestion level:
//!
//! | Level        | itime                                      |
//! |--------------|--------------------------------------------|
//! | 0 (unknown)  | `max_speed / 2`                            |
//! | 1 ..= 5      | `max_speed - (max_speed / 5) * (level - 1)`|
//! | 6 (closed)   | `+∞` (edge is never traversed)             |
//!
//! The result is an effective speed in km/h, not an elapsed time, and is used
//! unchanged as the Dijkstra weight.  Length does not enter the formula.

use igo_core::CongestionLevel;

/// Weight of one edge under `congestion`.
///
/// Pure: the same triple always yields the same value.
#[inline]
pub fn itime(congestion: CongestionLevel, _length_m: f32, max_speed_kmh: f32) -> f32 {
    match congestion {
        CongestionLevel::Closed => f32::INFINITY,
        CongestionLevel::Unknown => max_speed_kmh / 2.0,
        level => {
            let steps = (level.value() - 1) as f32;
            max_speed_kmh - (max_speed_kmh / 5.0) * steps
        }
    }
}
