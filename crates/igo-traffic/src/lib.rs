//! `igo-traffic` — congestion-weighted graph, fastest routes and refresh.
//!
//! # Pipeline
//!
//! ```text
//! StreetNetwork (static, Arc-shared)
//!   + highway segments ──► MatchedSegments (once, at startup)
//!   + observations ──────► propagate::apply ──► per-edge congestion
//!                                           └─► itime ──► per-edge weight
//!                                                          │
//!                          route(graph, origin, dest) ◄────┘
//! ```
//!
//! [`TrafficService`] owns the published [`WeightedGraph`] and rebuilds it
//! through [`RefreshController`] when the congestion data goes stale.
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`itime`]     | per-edge weight from `(congestion, length, max_speed)`    |
//! | [`propagate`] | `SegmentMatcher`, `MatchedSegments`, `apply`              |
//! | [`weighted`]  | `WeightedGraph`                                           |
//! | [`route`]     | `route`, `RouteOutcome`, `RouteDetail`                    |
//! | [`refresh`]   | `RefreshController` (TTL gate)                            |
//! | [`service`]   | `TrafficService`, `ServiceStatus`                         |
//! | [`error`]     | `TrafficError`, `TrafficResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Match segments and recompute weights on Rayon's pool.      |

pub mod error;
pub mod itime;
pub mod propagate;
pub mod refresh;
pub mod route;
pub mod service;
pub mod weighted;


pub use error::{TrafficError, TrafficResult};
pub use itime::itime;
pub use propagate::{apply, MatchedSegments, PropagationReport, SegmentMatch, SegmentMatcher, ShortestLengthMatcher};
pub use refresh::RefreshController;
pub use route::{route, route_nodes, RouteDetail, RouteOutcome};
pub use service::{ServiceStatus, TrafficService};
pub use weighted::WeightedGraph;
