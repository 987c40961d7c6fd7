//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `igo-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// No cached graph and the provider could not produce one.  Fatal at
    /// startup: without a street graph there is nothing to route on.
    #[error("cannot build street graph for {place:?}: {reason}")]
    Construction { place: String, reason: String },

    #[error("network provider error: {0}")]
    Provider(String),

    #[error("graph cache error: {0}")]
    Cache(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
