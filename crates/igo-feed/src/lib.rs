//! `igo-feed` — highway segment catalog and congestion feed.
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`record`] | `HighwaySegment`, `CongestionObservation`, `ObservationIndex` |
//! | [`loader`] | `parse_segments`, `parse_observations`                     |
//! | [`source`] | `FeedSource` trait, `LocationFeed` (file or URL)           |
//! | [`error`]  | `FeedError`, `FeedResult<T>`                               |
//!
//! # Feature flags
//!
//! | Flag   | Effect                                                       |
//! |--------|--------------------------------------------------------------|
//! | `http` | Fetch `http(s)://` locations with a blocking `reqwest` client. |

pub mod error;
pub mod loader;
pub mod record;
pub mod source;


pub use error::{FeedError, FeedResult};
pub use loader::{parse_observations, parse_segments};
pub use record::{CongestionObservation, HighwaySegment, ObservationIndex};
pub use source::{FeedSource, LocationFeed};
