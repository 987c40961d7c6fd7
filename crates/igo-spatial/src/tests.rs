//! Unit tests for igo-spatial.
//!
//! All tests use a hand-crafted network so they run without any OSM file.

#[cfg(test)]
mod helpers {
    use igo_core::{GeoPoint, NodeId};
    use crate::{StreetNetwork, StreetNetworkBuilder};

    /// Build a small grid network for testing.
    ///
    /// Nodes (lat, lon):
    ///   0:(0,0)  1:(0,1)  2:(0,2)
    ///   3:(1,0)           4:(1,2)
    ///
    /// Two-way streets: 0-1, 1-2, 0-3, 2-4, 3-4
    ///
    /// Length-shortest 0→4 is 0→1→2→4 (300 m) vs 0→3→4 (600 m).
    pub fn grid_network() -> (StreetNetwork, [NodeId; 5]) {
        let mut b = StreetNetworkBuilder::new();

        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 1.0));
        let n2 = b.add_node(GeoPoint::new(0.0, 2.0));
        let n3 = b.add_node(GeoPoint::new(1.0, 0.0));
        let n4 = b.add_node(GeoPoint::new(1.0, 2.0));

        b.add_street(n0, n1, 100.0, 30.0);
        b.add_street(n1, n2, 100.0, 30.0);
        b.add_street(n2, n4, 100.0, 30.0);
        b.add_street(n0, n3, 500.0, 90.0); // long but fast
        b.add_street(n3, n4, 100.0, 90.0);

        (b.build(), [n0, n1, n2, n3, n4])
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use igo_core::GeoPoint;
    use crate::StreetNetworkBuilder;

    #[test]
    fn empty_build() {
        let net = StreetNetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn single_street() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(41.38, 2.17));
        let c = b.add_node(GeoPoint::new(41.39, 2.17));
        b.add_street(a, c, 1_000.0, 50.0);
        let net = b.build();
        assert_eq!(net.node_count(), 2);
        assert_eq!(net.edge_count(), 2);
        assert!(net.edge_max_speed_kmh.iter().all(|&s| s == 50.0));
    }

    #[test]
    fn csr_out_edges() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        assert_eq!(net.out_edges(n1).count(), 2);
        assert_eq!(net.out_degree(n0), 2);
        assert_eq!(net.out_degree(n2), 2);
        assert_eq!(net.out_degree(n3), 2);
        assert_eq!(net.out_degree(n4), 2);
    }

    #[test]
    fn out_edges_source_correctness() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        for e in net.out_edges(n0) {
            assert_eq!(net.edge_from[e.index()], n0);
        }
        assert!(net.out_edges(n0).any(|e| net.edge_to[e.index()] == n1));
    }

    #[test]
    fn directed_only_edge() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0, 30.0);
        let net = b.build();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.out_degree(a), 1);
        assert_eq!(net.out_degree(c), 0);
    }

    #[test]
    fn parallel_edges_collapse_to_shortest() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 250.0, 30.0);
        b.add_directed_edge(a, c, 120.0, 50.0);
        b.add_directed_edge(c, a, 250.0, 30.0);
        let net = b.build();
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.out_degree(a), 1);

        let e = net.find_edge(a, c).unwrap();
        assert_eq!(net.edge_length_m[e.index()], 120.0);
        assert_eq!(net.edge_max_speed_kmh[e.index()], 50.0);
        assert_eq!(net.edge_length_m[net.find_edge(c, a).unwrap().index()], 250.0);
    }

    #[test]
    fn equal_length_parallel_edges_keep_first() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0, 30.0);
        b.add_directed_edge(a, c, 100.0, 90.0);
        let net = b.build();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.edge_max_speed_kmh[0], 30.0);
    }

    #[test]
    fn snapshot_roundtrip_keeps_edge_ids() {
        let (net, _) = super::helpers::grid_network();
        let copy = crate::StreetNetwork::from_snapshot(net.to_snapshot());
        assert_eq!(copy.node_pos, net.node_pos);
        assert_eq!(copy.edge_from, net.edge_from);
        assert_eq!(copy.edge_to, net.edge_to);
        assert_eq!(copy.edge_length_m, net.edge_length_m);
        assert_eq!(copy.edge_max_speed_kmh, net.edge_max_speed_kmh);
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use igo_core::GeoPoint;
    use crate::StreetNetworkBuilder;

    #[test]
    fn snap_exact_position() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.0)), Some(n0));
    }

    #[test]
    fn snap_nearest() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.4)), Some(n0));
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.6)), Some(n1));
    }

    #[test]
    fn empty_network_returns_none() {
        let net = StreetNetworkBuilder::new().build();
        assert!(net.snap_to_node(GeoPoint::new(0.0, 0.0)).is_none());
    }
}

// ── Length routing ────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use igo_core::{EdgeId, GeoPoint, NodeId};
    use crate::{dijkstra, shortest_path_by_length, EdgeCost, StreetNetwork, StreetNetworkBuilder};

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let r = shortest_path_by_length(&net, n0, n0).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.nodes, vec![n0]);
        assert_eq!(r.total_cost, 0.0);
    }

    #[test]
    fn shortest_path_correct() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let route = shortest_path_by_length(&net, n0, n4).unwrap();

        assert_eq!(route.nodes, vec![n0, n1, n2, n4]);
        assert_eq!(route.edges.len(), 3);
        assert_eq!(route.total_cost, 300.0);
        assert_eq!(route.length_m(&net), 300.0);

        assert_eq!(net.edge_from[route.edges[0].index()], n0);
        assert_eq!(net.edge_to[route.edges[2].index()], n4);
    }

    #[test]
    fn no_route_disconnected() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(1.0, 0.0));
        let net = b.build();
        assert!(shortest_path_by_length(&net, a, c).is_none());
    }

    #[test]
    fn unknown_node_is_no_route() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        assert!(shortest_path_by_length(&net, n0, NodeId(99)).is_none());
        assert!(shortest_path_by_length(&net, NodeId::INVALID, n0).is_none());
    }

    #[test]
    fn directed_one_way_blocks_return() {
        let mut b = StreetNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0, 30.0);
        let net = b.build();

        assert!(shortest_path_by_length(&net, a, c).is_some());
        assert!(shortest_path_by_length(&net, c, a).is_none());
    }

    /// Cost that forbids every edge leaving node 1.
    struct AvoidNode1;

    impl EdgeCost for AvoidNode1 {
        fn cost(&self, network: &StreetNetwork, edge: EdgeId) -> Option<f32> {
            (network.edge_from[edge.index()] != NodeId(1)).then(|| network.edge_length_m[edge.index()])
        }
    }

    #[test]
    fn pruned_edges_force_detour() {
        let (net, [n0, _, _, n3, n4]) = super::helpers::grid_network();
        let route = dijkstra(&net, n0, n4, &AvoidNode1).unwrap();
        assert_eq!(route.nodes, vec![n0, n3, n4]);
        assert_eq!(route.total_cost, 600.0);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let (net, [n0, _, _, _, n4]) = super::helpers::grid_network();
        let a = shortest_path_by_length(&net, n0, n4);
        let b = shortest_path_by_length(&net, n0, n4);
        assert_eq!(a, b);
    }
}

// ── Speed-limit derivation ────────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use crate::speed::{class_speed_kmh, derive_max_speed, parse_max_speed, TagValue, FALLBACK_SPEED_KMH};

    #[test]
    fn class_table() {
        assert_eq!(class_speed_kmh("residential"), Some(30.0));
        assert_eq!(class_speed_kmh("living_street_link"), Some(20.0));
        assert_eq!(class_speed_kmh("primary"), Some(50.0));
        assert_eq!(class_speed_kmh("secondary_link"), Some(40.0));
        assert_eq!(class_speed_kmh("tertiary"), Some(30.0));
        assert_eq!(class_speed_kmh("trunk_link"), Some(90.0));
        assert_eq!(class_speed_kmh("motorway"), None);
    }

    #[test]
    fn candidate_classes_take_the_fastest() {
        let highway = TagValue::from(vec!["primary", "residential"]);
        assert_eq!(derive_max_speed(&highway, &TagValue::Missing), 50.0);

        let highway = TagValue::from(vec!["living_street", "tertiary", "trunk"]);
        assert_eq!(derive_max_speed(&highway, &TagValue::Missing), 90.0);
    }

    #[test]
    fn classes_are_matched_exactly() {
        // Each class maps to its own row, not to the first row of the table.
        assert_eq!(derive_max_speed(&"living_street".into(), &TagValue::Missing), 20.0);
        assert_eq!(derive_max_speed(&"secondary".into(), &TagValue::Missing), 40.0);
    }

    #[test]
    fn explicit_limit_wins() {
        assert_eq!(derive_max_speed(&"residential".into(), &"50".into()), 50.0);
    }

    #[test]
    fn explicit_list_takes_maximum() {
        let maxspeed = TagValue::from(vec!["30", "50", "20"]);
        assert_eq!(derive_max_speed(&TagValue::Missing, &maxspeed), 50.0);
    }

    #[test]
    fn unparsable_limit_falls_back_to_class() {
        assert_eq!(derive_max_speed(&"primary".into(), &"signals".into()), 50.0);
    }

    #[test]
    fn unknown_class_uses_fallback() {
        assert_eq!(derive_max_speed(&"unclassified".into(), &TagValue::Missing), FALLBACK_SPEED_KMH);
        assert_eq!(derive_max_speed(&TagValue::Missing, &TagValue::Missing), FALLBACK_SPEED_KMH);
    }

    #[test]
    fn parse_units() {
        assert_eq!(parse_max_speed("50"), Some(50.0));
        assert_eq!(parse_max_speed(" 30 km/h"), Some(30.0));
        assert!((parse_max_speed("30 mph").unwrap() - 48.28).abs() < 0.01);
        assert_eq!(parse_max_speed("0"), None);
        assert_eq!(parse_max_speed("ES:urban"), None);
        assert_eq!(parse_max_speed("50kmh"), Some(50.0));
        assert_eq!(parse_max_speed("50 KM/H"), Some(50.0));
    }

    #[test]
    fn unknown_unit_is_rejected() {
        assert_eq!(parse_max_speed("50abc"), None);
        assert_eq!(parse_max_speed("50 knots"), None);
        assert_eq!(parse_max_speed("50;"), None);
    }

    #[test]
    fn osm_tag_normalisation() {
        assert_eq!(TagValue::from_osm(None), TagValue::Missing);
        assert_eq!(TagValue::from_osm(Some(" ")), TagValue::Missing);
        assert_eq!(TagValue::from_osm(Some("primary")), TagValue::Single("primary".into()));
        assert_eq!(
            TagValue::from_osm(Some("50;30")),
            TagValue::Candidates(vec!["50".into(), "30".into()])
        );
    }
}

// ── Graph cache ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod cache {
    use std::cell::Cell;
    use std::path::Path;

    use tempfile::TempDir;

    use crate::cache::{cache_exists, cache_path, load_network, save_network};
    use crate::{load_or_build, NetworkProvider, NoProvider, SpatialError, SpatialResult, StreetNetwork};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    /// Hands out the grid network and counts how often it was asked.
    struct GridProvider {
        calls: Cell<u32>,
    }

    impl NetworkProvider for GridProvider {
        fn fetch_network(&self, _area: &str) -> SpatialResult<StreetNetwork> {
            self.calls.set(self.calls.get() + 1);
            Ok(super::helpers::grid_network().0)
        }
    }

    #[test]
    fn path_is_slugged() {
        let p = cache_path(Path::new("cache"), "Barcelona, Catalonia");
        assert_eq!(p, Path::new("cache").join("barcelona_catalonia.graph.json.gz"));
        let p = cache_path(Path::new("c"), "  ");
        assert_eq!(p, Path::new("c").join("area.graph.json.gz"));
    }

    #[test]
    fn save_then_load() {
        let dir = tmp();
        let (net, _) = super::helpers::grid_network();
        let path = dir.path().join("nested").join("grid.graph.json.gz");
        save_network(&net, &path).unwrap();
        let loaded = load_network(&path).unwrap();
        assert_eq!(loaded.to_snapshot(), net.to_snapshot());
    }

    #[test]
    fn builds_once_then_reuses_cache() {
        let dir = tmp();
        let provider = GridProvider { calls: Cell::new(0) };

        let first = load_or_build("Grid Town", dir.path(), &provider).unwrap();
        assert_eq!(provider.calls.get(), 1);
        assert!(cache_exists(dir.path(), "Grid Town"));

        let second = load_or_build("Grid Town", dir.path(), &provider).unwrap();
        assert_eq!(provider.calls.get(), 1, "second startup must not hit the provider");
        assert_eq!(first.to_snapshot(), second.to_snapshot());
    }

    #[test]
    fn no_cache_and_no_provider_is_fatal() {
        let dir = tmp();
        let result = load_or_build("Nowhere", dir.path(), &NoProvider);
        assert!(matches!(result, Err(SpatialError::Construction { .. })));
    }

    #[test]
    fn corrupt_cache_is_rebuilt() {
        let dir = tmp();
        let path = cache_path(dir.path(), "Grid Town");
        std::fs::write(&path, b"not gzip").unwrap();

        let provider = GridProvider { calls: Cell::new(0) };
        let net = load_or_build("Grid Town", dir.path(), &provider).unwrap();
        assert_eq!(provider.calls.get(), 1);
        assert_eq!(net.node_count(), 5);
        assert!(load_network(&path).is_ok(), "cache should be rewritten");
    }
}
