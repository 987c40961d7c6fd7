//! Long-running owner of the current weighted graph.
//!
//! # Concurrency
//!
//! The published graph lives behind a `RwLock` as an `Arc<WeightedGraph>`.  Readers
//! clone the `Arc` and drop the lock immediately, so a query keeps using the
//! version it started with even if a refresh publishes a newer one halfway
//! through.
//!
//! The instant of the last successful refresh is published next to the graph,
//! so status reads never touch the refresh mutex.
//!
//! Refreshes are serialised by a `Mutex<RefreshController>`.  A request that
//! finds the data stale takes the mutex with `try_lock`; if another thread is
//! already refreshing, it routes on the current graph instead of waiting for
//! the feed.  The new graph is built without holding the `RwLock` and swapped
//! in with a single write.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, TryLockError};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::Serialize;

use igo_core::GeoPoint;
use igo_feed::{FeedSource, ObservationIndex};
use igo_spatial::StreetNetwork;

use crate::error::TrafficResult;
use crate::propagate::{MatchedSegments, PropagationReport, SegmentMatcher, ShortestLengthMatcher};
use crate::refresh::RefreshController;
use crate::route::{route, RouteOutcome};
use crate::weighted::WeightedGraph;

pub struct TrafficService<F: FeedSource> {
    network: Arc<StreetNetwork>,
    matches: MatchedSegments,
    feed:    F,
    ttl:     Duration,
    current: RwLock<Published>,
    refresh: Mutex<RefreshController>,
}

/// The graph readers see, with the instant it was refreshed at.
struct Published {
    graph:      Arc<WeightedGraph>,
    updated_at: Option<Instant>,
}

/// Snapshot of the service state, for diagnostics.
#[derive(Clone, Debug, Serialize)]
pub struct ServiceStatus {
    /// Version of the published graph; 0 until the first successful refresh.
    pub version:          u64,
    /// Seconds since the last successful refresh, if any.
    pub last_update_secs: Option<f64>,
    pub ttl_secs:         u64,
    pub stale:            bool,
    /// A refresh was in progress when the status was taken.
    pub refreshing:       bool,
    pub segments:         usize,
    pub matched_segments: usize,
    /// Edge count per congestion level, indexed by level value.
    pub edges_by_level:   [usize; 7],
    pub last_propagation: PropagationReport,
}

impl<F: FeedSource> TrafficService<F> {
    /// Fetch the segment catalog, match it onto `network` and publish an
    /// all-unknown graph.  The first [`ensure_fresh`](Self::ensure_fresh)
    /// loads real congestion.
    ///
    /// Fails if the catalog cannot be fetched.
    pub fn new(network: Arc<StreetNetwork>, feed: F, ttl: Duration) -> TrafficResult<Self> {
        Self::with_matcher(network, feed, ttl, &ShortestLengthMatcher)
    }

    pub fn with_matcher<M: SegmentMatcher + ?Sized>(
        network: Arc<StreetNetwork>,
        feed: F,
        ttl: Duration,
        matcher: &M,
    ) -> TrafficResult<Self> {
        let segments = feed.fetch_segments()?;
        let matches = MatchedSegments::compute(&network, &segments, matcher);
        info!(
            "matched {} of {} highway segments onto {} edges",
            matches.matched_count(),
            matches.len(),
            network.edge_count(),
        );

        let initial = Arc::new(WeightedGraph::new(Arc::clone(&network)));
        Ok(Self {
            network,
            matches,
            feed,
            ttl,
            current: RwLock::new(Published { graph: initial, updated_at: None }),
            refresh: Mutex::new(RefreshController::new(ttl)),
        })
    }

    /// The published graph, without any staleness check.
    pub fn current(&self) -> Arc<WeightedGraph> {
        self.published().0
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[inline]
    pub fn network(&self) -> &Arc<StreetNetwork> {
        &self.network
    }

    #[inline]
    pub fn feed(&self) -> &F {
        &self.feed
    }

    #[inline]
    pub fn matches(&self) -> &MatchedSegments {
        &self.matches
    }

    /// Return a graph that is fresh as of `now` when possible.
    ///
    /// Rebuilds if the TTL has elapsed.  Never fails: a failed fetch is
    /// logged, the previous graph stays published, and the next call retries.
    /// If another thread is refreshing, returns the current graph at once.
    pub fn ensure_fresh(&self, now: Instant) -> Arc<WeightedGraph> {
        let mut refresh = match self.refresh.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                debug!("refresh already in progress, serving current graph");
                return self.current();
            }
        };
        if !refresh.is_stale(now) {
            return self.current();
        }
        match self.rebuild(now) {
            Ok(graph) => {
                refresh.mark_updated(now);
                graph
            }
            Err(e) => {
                warn!("congestion refresh failed, keeping version {}: {e}", self.current().version());
                self.current()
            }
        }
    }

    /// Rebuild regardless of the TTL, waiting for any refresh in progress.
    pub fn refresh_now(&self, now: Instant) -> TrafficResult<Arc<WeightedGraph>> {
        let mut refresh = self.lock_refresh();
        let graph = self.rebuild(now)?;
        refresh.mark_updated(now);
        Ok(graph)
    }

    /// [`ensure_fresh`](Self::ensure_fresh), then [`route`].
    pub fn route(&self, origin: GeoPoint, destination: GeoPoint, now: Instant) -> TrafficResult<RouteOutcome> {
        let graph = self.ensure_fresh(now);
        route(&graph, origin, destination)
    }

    /// Never blocks on a refresh in progress; `refreshing` reports one.
    pub fn status(&self, now: Instant) -> ServiceStatus {
        let (graph, updated_at) = self.published();
        let refreshing = matches!(self.refresh.try_lock(), Err(TryLockError::WouldBlock));
        let age = updated_at.map(|t| now.saturating_duration_since(t));
        ServiceStatus {
            version:          graph.version(),
            last_update_secs: age.map(|a| a.as_secs_f64()),
            ttl_secs:         self.ttl.as_secs(),
            stale:            age.is_none_or(|a| a >= self.ttl),
            refreshing,
            segments:         self.matches.len(),
            matched_segments: self.matches.matched_count(),
            edges_by_level:   graph.level_counts(),
            last_propagation: *graph.report(),
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn lock_refresh(&self) -> MutexGuard<'_, RefreshController> {
        self.refresh.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn published(&self) -> (Arc<WeightedGraph>, Option<Instant>) {
        let read = |p: &Published| (Arc::clone(&p.graph), p.updated_at);
        match self.current.read() {
            Ok(guard) => read(&guard),
            Err(poisoned) => read(&poisoned.into_inner()),
        }
    }

    /// Fetch observations, build the next version and publish it as of
    /// `now`.  Caller holds the refresh mutex.
    fn rebuild(&self, now: Instant) -> TrafficResult<Arc<WeightedGraph>> {
        let observations = self.feed.fetch_observations()?;
        let index = ObservationIndex::new(&observations);
        let version = self.current().version() + 1;

        let graph = Arc::new(WeightedGraph::from_matches(
            Arc::clone(&self.network),
            &self.matches,
            &index,
            version,
        ));
        let report = graph.report();
        info!(
            "congestion graph v{version}: {} observations, {} segments stamped ({} edges), \
             {} without observation, {} unknown, {} degenerate, {} no path",
            observations.len(),
            report.segments_stamped,
            report.edges_stamped,
            report.no_observation,
            report.unknown_level,
            report.degenerate,
            report.no_path,
        );

        let published = Published { graph: Arc::clone(&graph), updated_at: Some(now) };
        match self.current.write() {
            Ok(mut slot) => *slot = published,
            Err(poisoned) => *poisoned.into_inner() = published,
        }
        Ok(graph)
    }
}
