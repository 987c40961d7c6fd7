//! Traffic-subsystem error type.

use igo_core::GeoPoint;
use igo_feed::FeedError;
use thiserror::Error;

/// Errors produced by `igo-traffic`.
///
/// An unreachable destination is not an error; see
/// [`RouteOutcome::NoPath`](crate::RouteOutcome::NoPath).
#[derive(Debug, Error)]
pub enum TrafficError {
    /// The coordinate could not be mapped to a graph node (empty graph).
    #[error("cannot snap {point} to the street graph")]
    Snap { point: GeoPoint },

    /// Fetching or parsing a feed failed during a refresh.
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
