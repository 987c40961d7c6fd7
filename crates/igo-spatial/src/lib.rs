//! `igo-spatial` — street graph, speed limits, spatial indexing, and
//! length-based routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`network`]  | `StreetNetwork` (CSR + R-tree), `StreetNetworkBuilder`       |
//! | [`speed`]    | `TagValue`, classification table, `derive_max_speed`         |
//! | [`router`]   | `EdgeCost`, `Route`, `dijkstra`, `shortest_path_by_length`   |
//! | [`cache`]    | gzip'd graph cache keyed by area name, `load_or_build`       |
//! | [`provider`] | `NetworkProvider` trait, `PbfProvider`                       |
//! | [`osm`]      | `load_from_pbf` (feature = `"osm"` only)                     |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag  | Effect                                                         |
//! |-------|----------------------------------------------------------------|
//! | `osm` | Enables OSM PBF loading via the `osmpbf` crate.                |

pub mod cache;
pub mod error;
pub mod network;
pub mod provider;
pub mod router;
pub mod speed;

#[cfg(feature = "osm")]
pub mod osm;

#[cfg(test)]
mod tests;

pub use cache::load_or_build;
pub use error::{SpatialError, SpatialResult};
pub use network::{NetworkSnapshot, StreetNetwork, StreetNetworkBuilder};
pub use provider::{NetworkProvider, NoProvider};
pub use router::{dijkstra, shortest_path_by_length, ByLength, EdgeCost, Route};
pub use speed::{derive_max_speed, TagValue};

#[cfg(feature = "osm")]
pub use provider::PbfProvider;
