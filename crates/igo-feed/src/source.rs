//! Where feeds come from.
//!
//! The service only depends on [`FeedSource`].  [`LocationFeed`] is the
//! production implementation: each feed location is either an `http(s)://`
//! URL (requires the `http` feature) or a local file path.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;

use crate::loader::{parse_observations, parse_segments};
use crate::record::{CongestionObservation, HighwaySegment};
use crate::FeedResult;

/// Supplies the highway catalog and the current congestion observations.
///
/// Implementations may block on network I/O.  They must be `Send + Sync` so
/// a shared service can refresh from any request thread.
pub trait FeedSource: Send + Sync {
    fn fetch_segments(&self) -> FeedResult<Vec<HighwaySegment>>;
    fn fetch_observations(&self) -> FeedResult<Vec<CongestionObservation>>;
}

/// Reads both feeds from configured locations.
#[derive(Clone, Debug)]
pub struct LocationFeed {
    pub highways:    String,
    pub congestions: String,
    #[cfg(feature = "http")]
    client: reqwest::blocking::Client,
}

impl LocationFeed {
    #[cfg(not(feature = "http"))]
    pub fn new(highways: impl Into<String>, congestions: impl Into<String>) -> FeedResult<Self> {
        Ok(Self { highways: highways.into(), congestions: congestions.into() })
    }

    #[cfg(feature = "http")]
    pub fn new(highways: impl Into<String>, congestions: impl Into<String>) -> FeedResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(60))
            .user_agent(concat!("igo/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { highways: highways.into(), congestions: congestions.into(), client })
    }

    /// Open `location` and hand the raw bytes to `parse`.
    fn read<T>(
        &self,
        location: &str,
        parse: impl FnOnce(&mut dyn std::io::Read) -> FeedResult<T>,
    ) -> FeedResult<T> {
        if is_url(location) {
            return self.read_url(location, parse);
        }
        debug!("reading feed from {location}");
        let file = File::open(Path::new(location))?;
        parse(&mut BufReader::new(file))
    }

    #[cfg(feature = "http")]
    fn read_url<T>(
        &self,
        url: &str,
        parse: impl FnOnce(&mut dyn std::io::Read) -> FeedResult<T>,
    ) -> FeedResult<T> {
        debug!("fetching feed from {url}");
        let bytes = self.client.get(url).send()?.error_for_status()?.bytes()?;
        parse(&mut std::io::Cursor::new(bytes))
    }

    #[cfg(not(feature = "http"))]
    fn read_url<T>(
        &self,
        url: &str,
        _parse: impl FnOnce(&mut dyn std::io::Read) -> FeedResult<T>,
    ) -> FeedResult<T> {
        Err(crate::FeedError::Unsupported(format!("{url} (built without the `http` feature)")))
    }
}

impl FeedSource for LocationFeed {
    fn fetch_segments(&self) -> FeedResult<Vec<HighwaySegment>> {
        self.read(&self.highways, |r| parse_segments(r))
    }

    fn fetch_observations(&self) -> FeedResult<Vec<CongestionObservation>> {
        self.read(&self.congestions, |r| parse_observations(r))
    }
}

fn is_url(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
