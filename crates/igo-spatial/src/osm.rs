//! OSM PBF loader, enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use igo_spatial::osm::load_from_pbf;
//!
//! let network = load_from_pbf(Path::new("barcelona.osm.pbf"))?;
//! ```
//!
//! # What is loaded
//!
//! Only drivable `highway=*` ways are included (see [`is_drivable`]).
//! Graph nodes are junctions; the shape points of a way between two
//! junctions become one edge.  One-way ways add a single directed edge,
//! everything else adds both directions.  The
//! `highway` and `maxspeed` tags are normalised into [`TagValue`]s and
//! resolved to a speed limit immediately.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use osmpbf::{Element, ElementReader};

use igo_core::{GeoPoint, NodeId};

use crate::network::{StreetNetwork, StreetNetworkBuilder};
use crate::speed::{derive_max_speed, TagValue};
use crate::SpatialError;

// ── Public entry point ────────────────────────────────────────────────────────

/// Load the drivable street network from an OSM PBF file.
///
/// # Errors
///
/// Returns [`SpatialError::Osm`] if the file cannot be opened or parsed.
pub fn load_from_pbf(path: &Path) -> Result<StreetNetwork, SpatialError> {
    // ── Phase 1: collect all OSM nodes + drivable ways in one pass ────────
    let reader = ElementReader::from_path(path)
        .map_err(|e| SpatialError::Osm(format!("{}: {e}", path.display())))?;

    let mut all_nodes: HashMap<i64, GeoPoint> = HashMap::new();
    let mut ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat() as f32, n.lon() as f32));
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat() as f32, n.lon() as f32));
            }
            Element::Way(w) => {
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let tag = |key: &str| tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);

                let Some(highway) = tag("highway") else { return };
                if !is_drivable(highway, tag("access"), tag("motor_vehicle")) {
                    return;
                }

                let max_speed_kmh = derive_max_speed(
                    &TagValue::from_osm(Some(highway)),
                    &TagValue::from_osm(tag("maxspeed")),
                );
                ways.push(OsmWay {
                    refs: w.refs().collect(),
                    max_speed_kmh,
                    direction: direction(highway, &tags),
                });
            }
            _ => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    Ok(build_network(&all_nodes, &ways))
}

// ── Simplification ────────────────────────────────────────────────────────────

/// Build the street graph with one node per junction.
///
/// A junction is a way's first or last node, or any node referenced more
/// than once across all ways.  Shape points between two junctions of the
/// same way are folded into a single edge whose length is the sum of the
/// pieces.  A reference without coordinates breaks the stretch it is on.
fn build_network(positions: &HashMap<i64, GeoPoint>, ways: &[OsmWay]) -> StreetNetwork {
    let mut ref_counts: HashMap<i64, u32> = HashMap::new();
    let mut junctions: HashSet<i64> = HashSet::new();
    for way in ways {
        for &id in &way.refs {
            *ref_counts.entry(id).or_insert(0) += 1;
        }
        if let (Some(&first), Some(&last)) = (way.refs.first(), way.refs.last()) {
            junctions.insert(first);
            junctions.insert(last);
        }
    }
    junctions.extend(ref_counts.into_iter().filter(|&(_, n)| n > 1).map(|(id, _)| id));
    junctions.retain(|id| positions.contains_key(id));

    let mut builder = StreetNetworkBuilder::with_capacity(junctions.len(), junctions.len() * 3);

    // Sorted so node ids do not depend on hash order.
    let mut sorted_ids: Vec<i64> = junctions.into_iter().collect();
    sorted_ids.sort_unstable();

    let mut osm_to_igo: HashMap<i64, NodeId> = HashMap::with_capacity(sorted_ids.len());
    for osm_id in sorted_ids {
        if let Some(&pos) = positions.get(&osm_id) {
            osm_to_igo.insert(osm_id, builder.add_node(pos));
        }
    }

    for way in ways {
        let mut from: Option<NodeId> = None;
        let mut prev: Option<GeoPoint> = None;
        let mut len_m = 0.0_f32;

        for id in &way.refs {
            let Some(&pos) = positions.get(id) else {
                from = None;
                prev = None;
                len_m = 0.0;
                continue;
            };
            if let Some(p) = prev {
                len_m += p.distance_m(pos);
            }
            prev = Some(pos);

            let Some(&node) = osm_to_igo.get(id) else { continue };
            match from {
                Some(a) if a != node => add_stretch(&mut builder, way, a, node, len_m.max(0.1)),
                _ => {}
            }
            from = Some(node);
            len_m = 0.0;
        }
    }

    builder.build()
}

fn add_stretch(builder: &mut StreetNetworkBuilder, way: &OsmWay, a: NodeId, b: NodeId, len_m: f32) {
    match way.direction {
        Direction::Both => builder.add_street(a, b, len_m, way.max_speed_kmh),
        Direction::Forward => builder.add_directed_edge(a, b, len_m, way.max_speed_kmh),
        Direction::Backward => builder.add_directed_edge(b, a, len_m, way.max_speed_kmh),
    }
}

// ── Internal types ────────────────────────────────────────────────────────────

struct OsmWay {
    refs:          Vec<i64>,
    max_speed_kmh: f32,
    direction:     Direction,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    Both,
    Forward,
    Backward,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// `true` if a way with this `highway` value is open to private cars.
///
/// Only public road classes qualify; `service` roads (parking aisles,
/// driveways) and anything unrecognised are left out.
fn is_drivable(highway: &str, access: Option<&str>, motor_vehicle: Option<&str>) -> bool {
    let class_ok = matches!(
        highway,
        "motorway" | "motorway_link" | "trunk" | "trunk_link"
            | "primary" | "primary_link" | "secondary" | "secondary_link"
            | "tertiary" | "tertiary_link" | "unclassified" | "residential"
            | "living_street" | "road"
    );
    let closed = |v: Option<&str>| matches!(v, Some("no" | "private"));
    class_ok && !closed(access) && !closed(motor_vehicle)
}

/// Travel direction for car traffic.
///
/// Motorways, motorway links and roundabouts are implicitly one-way.
fn direction(highway: &str, tags: &[(&str, &str)]) -> Direction {
    let oneway = tags.iter().find(|(k, _)| *k == "oneway").map(|(_, v)| *v);
    match oneway {
        Some("yes" | "1" | "true") => Direction::Forward,
        Some("-1" | "reverse") => Direction::Backward,
        Some("no" | "false" | "0") => Direction::Both,
        _ => {
            let roundabout = tags.iter().any(|(k, v)| *k == "junction" && *v == "roundabout");
            if roundabout || matches!(highway, "motorway" | "motorway_link") {
                Direction::Forward
            } else {
                Direction::Both
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footways_are_not_drivable() {
        assert!(!is_drivable("footway", None, None));
        assert!(is_drivable("residential", None, None));
        assert!(!is_drivable("residential", Some("private"), None));
        assert!(!is_drivable("primary", None, Some("no")));
    }

    #[test]
    fn only_public_road_classes_are_drivable() {
        for class in ["service", "bus_guideway", "raceway", "busway", "something_new"] {
            assert!(!is_drivable(class, None, None), "{class}");
        }
        for class in ["motorway_link", "unclassified", "living_street", "tertiary"] {
            assert!(is_drivable(class, None, None), "{class}");
        }
    }

    fn way(refs: &[i64], direction: Direction) -> OsmWay {
        OsmWay { refs: refs.to_vec(), max_speed_kmh: 50.0, direction }
    }

    /// Nodes 1..=4 spaced 0.001° of longitude apart on one parallel.
    fn positions(ids: &[i64]) -> HashMap<i64, GeoPoint> {
        ids.iter()
            .map(|&id| (id, GeoPoint::new(41.38, 2.10 + 0.001 * id as f32)))
            .collect()
    }

    #[test]
    fn shape_points_collapse_into_one_edge() {
        let pos = positions(&[1, 2, 3, 4]);
        let net = build_network(&pos, &[way(&[1, 2, 3, 4], Direction::Both)]);

        assert_eq!(net.node_count(), 2);
        assert_eq!(net.edge_count(), 2);
        let a = net.snap_to_node(pos[&1]).unwrap();
        let b = net.snap_to_node(pos[&4]).unwrap();
        let e = net.find_edge(a, b).unwrap();
        let straight = pos[&1].distance_m(pos[&4]);
        assert!((net.edge_length_m[e.index()] - straight).abs() < 1.0);
    }

    #[test]
    fn shared_node_splits_ways() {
        // 1-2-3 crossed at 2 by 5-2; 3 and 5 are dead ends.
        let mut pos = positions(&[1, 2, 3]);
        pos.insert(5, GeoPoint::new(41.381, 2.102));
        let net = build_network(
            &pos,
            &[way(&[1, 2, 3], Direction::Both), way(&[5, 2], Direction::Forward)],
        );

        assert_eq!(net.node_count(), 4);
        assert_eq!(net.edge_count(), 5);
    }

    #[test]
    fn missing_coordinates_break_the_stretch() {
        let pos = positions(&[1, 3]);
        let net = build_network(&pos, &[way(&[1, 2, 3], Direction::Both)]);
        assert_eq!(net.node_count(), 2);
        assert_eq!(net.edge_count(), 0);
    }

    #[test]
    fn oneway_tags() {
        assert_eq!(direction("residential", &[("oneway", "yes")]), Direction::Forward);
        assert_eq!(direction("residential", &[("oneway", "-1")]), Direction::Backward);
        assert_eq!(direction("residential", &[]), Direction::Both);
        assert_eq!(direction("motorway", &[]), Direction::Forward);
        assert_eq!(direction("motorway", &[("oneway", "no")]), Direction::Both);
        assert_eq!(direction("primary", &[("junction", "roundabout")]), Direction::Forward);
    }
}
