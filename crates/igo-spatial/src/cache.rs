//! On-disk street graph cache keyed by area name.
//!
//! The graph is written as gzip-compressed JSON of a [`NetworkSnapshot`].
//! The format is private to this crate; callers only see
//! [`load_or_build`].
//!
//! ```text
//! cache_dir/barcelona_catalonia.graph.json.gz
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::{info, warn};

use crate::network::{NetworkSnapshot, StreetNetwork};
use crate::provider::NetworkProvider;
use crate::{SpatialError, SpatialResult};

const CACHE_SUFFIX: &str = ".graph.json.gz";

/// Cache file for `place` inside `cache_dir`.
///
/// The area name is slugged: ASCII alphanumerics are lower-cased, any run
/// of other characters becomes a single `_`.
pub fn cache_path(cache_dir: &Path, place: &str) -> PathBuf {
    let mut slug = String::with_capacity(place.len());
    for c in place.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    let slug = if slug.is_empty() { "area" } else { slug };
    cache_dir.join(format!("{slug}{CACHE_SUFFIX}"))
}

pub fn cache_exists(cache_dir: &Path, place: &str) -> bool {
    cache_path(cache_dir, place).is_file()
}

/// Write `network` to `path`, creating parent directories as needed.
pub fn save_network(network: &StreetNetwork, path: &Path) -> SpatialResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, &network.to_snapshot())?;
    encoder.finish()?.flush()?;
    Ok(())
}

/// Read a network previously written by [`save_network`].
pub fn load_network(path: &Path) -> SpatialResult<StreetNetwork> {
    let file = File::open(path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let snapshot: NetworkSnapshot = serde_json::from_reader(decoder)?;
    Ok(StreetNetwork::from_snapshot(snapshot))
}

/// Load the street graph for `place` from the cache, or build it with
/// `provider` and cache it.
///
/// An unreadable cache file is treated as missing.  Failing to write the
/// cache is logged but not fatal.
///
/// # Errors
///
/// [`SpatialError::Construction`] when there is no usable cache and the
/// provider fails.
pub fn load_or_build(
    place: &str,
    cache_dir: &Path,
    provider: &dyn NetworkProvider,
) -> SpatialResult<StreetNetwork> {
    let path = cache_path(cache_dir, place);

    if path.is_file() {
        match load_network(&path) {
            Ok(network) => {
                info!(
                    "loaded street graph for {place:?} from {} ({} nodes, {} edges)",
                    path.display(),
                    network.node_count(),
                    network.edge_count(),
                );
                return Ok(network);
            }
            Err(e) => warn!("ignoring unreadable graph cache {}: {e}", path.display()),
        }
    }

    let network = provider
        .fetch_network(place)
        .map_err(|e| SpatialError::Construction { place: place.to_owned(), reason: e.to_string() })?;

    if network.is_empty() {
        return Err(SpatialError::Construction {
            place:  place.to_owned(),
            reason: "provider returned an empty network".into(),
        });
    }

    info!(
        "built street graph for {place:?} ({} nodes, {} edges)",
        network.node_count(),
        network.edge_count(),
    );

    if let Err(e) = save_network(&network, &path) {
        warn!("could not write graph cache {}: {e}", path.display());
    }

    Ok(network)
}
