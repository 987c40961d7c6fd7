//! Application configuration.
//!
//! # File format
//!
//! ```toml
//! place            = "Barcelona, Catalonia"
//! cache_dir        = "cache"
//! pbf_path         = "data/barcelona.osm.pbf"
//! highways_url     = "https://…/transit_relacio_trams.csv"
//! congestions_url  = "https://…/download"
//! refresh_ttl_secs = 300
//! ```
//!
//! Every key is optional; missing keys take the [`Default`] values, which
//! reproduce the Barcelona deployment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{IgoError, IgoResult};

/// Congestion data is considered stale after this many seconds.
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 5 * 60;

const DEFAULT_PLACE: &str = "Barcelona, Catalonia";
const DEFAULT_HIGHWAYS_URL: &str = "https://opendata-ajuntament.barcelona.cat/data/dataset/1090983a-1c40-4609-8620-14ad49aae3ab/resource/1d6c814c-70ef-4147-aa16-a49ddb952f72/download/transit_relacio_trams.csv";
const DEFAULT_CONGESTIONS_URL: &str = "https://opendata-ajuntament.barcelona.cat/data/dataset/8319c2b1-4c21-4962-9acd-6db4c5ff1148/resource/2d456eb5-4ea6-4f68-9794-2f3f1a58a933/download";

/// Top-level configuration for the routing service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IgoConfig {
    /// Area name.  Also the cache key for the street graph.
    pub place: String,

    /// Directory holding cached street graphs.
    pub cache_dir: PathBuf,

    /// Local OSM extract used to build the street graph when no cache exists.
    pub pbf_path: Option<PathBuf>,

    /// Highway segment catalog (comma-delimited CSV).  A URL or a local path.
    pub highways_url: String,

    /// Congestion observations (`#`-delimited).  A URL or a local path.
    pub congestions_url: String,

    /// Time-to-live of the congestion-weighted graph.
    pub refresh_ttl_secs: u64,
}

impl Default for IgoConfig {
    fn default() -> Self {
        Self {
            place:            DEFAULT_PLACE.to_owned(),
            cache_dir:        PathBuf::from("cache"),
            pbf_path:         None,
            highways_url:     DEFAULT_HIGHWAYS_URL.to_owned(),
            congestions_url:  DEFAULT_CONGESTIONS_URL.to_owned(),
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
        }
    }
}

impl IgoConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> IgoResult<Self> {
        let config: IgoConfig = toml::from_str(s).map_err(|e| IgoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path(path: &Path) -> IgoResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> IgoResult<()> {
        if self.place.trim().is_empty() {
            return Err(IgoError::Config("`place` must not be empty".into()));
        }
        if self.refresh_ttl_secs == 0 {
            return Err(IgoError::Config("`refresh_ttl_secs` must be positive".into()));
        }
        if self.highways_url.trim().is_empty() || self.congestions_url.trim().is_empty() {
            return Err(IgoError::Config("feed locations must not be empty".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl_secs)
    }
}
