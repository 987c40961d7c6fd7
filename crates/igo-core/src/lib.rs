//! `igo-core` — foundational types for the iGo congestion-aware router.
//!
//! Every other `igo-*` crate depends on this one.  It has no `igo-*`
//! dependencies and only `serde`, `toml` and `thiserror` externally.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`, `SegmentId`                       |
//! | [`geo`]         | `GeoPoint`, haversine distance                        |
//! | [`congestion`]  | `CongestionLevel` (0 = unknown … 6 = closed)          |
//! | [`config`]      | `IgoConfig` (TOML), refresh TTL                       |
//! | [`error`]       | `IgoError`, `IgoResult`                               |

pub mod config;
pub mod congestion;
pub mod error;
pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{IgoConfig, DEFAULT_REFRESH_TTL_SECS};
pub use congestion::CongestionLevel;
pub use error::{IgoError, IgoResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, NodeId, SegmentId};
