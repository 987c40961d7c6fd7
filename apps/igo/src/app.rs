//! Command-line surface.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use serde_json::json;

use igo_core::{CongestionLevel, GeoPoint, IgoConfig};
use igo_feed::LocationFeed;
use igo_spatial::{load_or_build, NoProvider, PbfProvider, StreetNetwork};
use igo_traffic::TrafficService;

/// Fastest routes through the city under current traffic.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct IgoApp {
    /// TOML configuration file.  Built-in defaults when omitted.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Area name; overrides `place`.
    #[arg(long, global = true)]
    pub place: Option<String>,

    /// Graph cache directory; overrides `cache_dir`.
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// OSM PBF extract; overrides `pbf_path`.
    #[arg(long, global = true)]
    pub pbf: Option<PathBuf>,

    #[command(subcommand)]
    pub op: IgoOperation,
}

#[derive(Debug, Clone, Subcommand)]
pub enum IgoOperation {
    /// load the street graph from cache, building and caching it if missing.
    BuildCache,

    /// print the fastest route between two points as JSON.
    Route {
        /// origin as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        from: GeoPoint,

        /// destination as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        to: GeoPoint,
    },

    /// fetch current congestion and print per-level edge counts as JSON.
    Congestion,
}

impl IgoApp {
    pub fn run(&self) -> anyhow::Result<()> {
        let config = self.load_config()?;

        match &self.op {
            IgoOperation::BuildCache => {
                let network = load_network(&config)?;
                println!(
                    "{}",
                    json!({
                        "place": config.place,
                        "cache_dir": config.cache_dir,
                        "nodes": network.node_count(),
                        "edges": network.edge_count(),
                    })
                );
            }
            IgoOperation::Route { from, to } => {
                let service = start_service(&config)?;
                let outcome = service.route(*from, *to, Instant::now())?;
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
            IgoOperation::Congestion => {
                let service = start_service(&config)?;
                let now = Instant::now();
                service.refresh_now(now).context("fetching congestion feed")?;

                let status = service.status(now);
                let levels: serde_json::Map<String, serde_json::Value> = CongestionLevel::ALL
                    .iter()
                    .map(|l| (l.as_str().to_owned(), json!(status.edges_by_level[l.value() as usize])))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "version": status.version,
                        "segments": status.segments,
                        "matched_segments": status.matched_segments,
                        "edges_by_level": levels,
                        "propagation": status.last_propagation,
                    }))?
                );
            }
        }
        Ok(())
    }

    fn load_config(&self) -> anyhow::Result<IgoConfig> {
        let mut config = match &self.config {
            Some(path) => IgoConfig::from_path(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => IgoConfig::default(),
        };
        if let Some(place) = &self.place {
            config.place = place.clone();
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let Some(pbf) = &self.pbf {
            config.pbf_path = Some(pbf.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

fn load_network(config: &IgoConfig) -> anyhow::Result<StreetNetwork> {
    let network = match &config.pbf_path {
        Some(path) => load_or_build(&config.place, &config.cache_dir, &PbfProvider { path: path.clone() }),
        None => load_or_build(&config.place, &config.cache_dir, &NoProvider),
    };
    network.with_context(|| format!("street graph for {:?}", config.place))
}

fn start_service(config: &IgoConfig) -> anyhow::Result<TrafficService<LocationFeed>> {
    let network = Arc::new(load_network(config)?);
    let feed = LocationFeed::new(config.highways_url.as_str(), config.congestions_url.as_str())?;
    info!(
        "serving {:?}: {} nodes, {} edges, refresh every {}s",
        config.place,
        network.node_count(),
        network.edge_count(),
        config.refresh_ttl_secs,
    );
    TrafficService::new(network, feed, config.refresh_ttl())
        .context("loading highway segment catalog")
}
