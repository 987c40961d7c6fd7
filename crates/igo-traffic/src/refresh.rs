//! TTL gate for weighted-graph rebuilds.

use std::time::{Duration, Instant};

/// Decides when the congestion data is old enough to refetch.
///
/// Starts with no update recorded, so the first check is always stale.
/// Only a successful rebuild moves `last_update`; a failed fetch leaves the
/// controller stale and the next request retries.
#[derive(Clone, Debug)]
pub struct RefreshController {
    ttl:         Duration,
    last_update: Option<Instant>,
}

impl RefreshController {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, last_update: None }
    }

    /// `true` if nothing was ever loaded or `now - last_update >= ttl`.
    pub fn is_stale(&self, now: Instant) -> bool {
        match self.last_update {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.ttl,
        }
    }

    pub fn mark_updated(&mut self, now: Instant) {
        self.last_update = Some(now);
    }

    #[inline]
    pub fn last_update(&self) -> Option<Instant> {
        self.last_update
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
