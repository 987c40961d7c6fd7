//! Source of raw street networks.

use crate::network::StreetNetwork;
use crate::SpatialResult;

/// Produces the drivable street network for a named area.
///
/// Only consulted by [`crate::cache::load_or_build`] when no cached graph
/// exists.
pub trait NetworkProvider {
    fn fetch_network(&self, area: &str) -> SpatialResult<StreetNetwork>;
}

/// Reads a local OSM PBF extract.  The area name is only used for logging;
/// the extract itself defines the bounds.
#[cfg(feature = "osm")]
pub struct PbfProvider {
    pub path: std::path::PathBuf,
}

#[cfg(feature = "osm")]
impl NetworkProvider for PbfProvider {
    fn fetch_network(&self, area: &str) -> SpatialResult<StreetNetwork> {
        log::info!("reading street network for {area:?} from {}", self.path.display());
        crate::osm::load_from_pbf(&self.path)
    }
}

/// A provider that always fails.  Used when no network source is
/// configured, so startup succeeds only from cache.
pub struct NoProvider;

impl NetworkProvider for NoProvider {
    fn fetch_network(&self, area: &str) -> SpatialResult<StreetNetwork> {
        Err(crate::SpatialError::Provider(format!(
            "no network source configured for {area:?}"
        )))
    }
}
