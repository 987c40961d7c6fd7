//! Unit tests for igo-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId, SegmentId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(EdgeId(100) > EdgeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(SegmentId::default(), SegmentId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(SegmentId(7).to_string(), "SegmentId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(41.3874, 2.1686);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(41.0, 2.0);
        let b = GeoPoint::new(42.0, 2.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn lon_lat_order() {
        let p = GeoPoint::from_lon_lat(2.17, 41.38);
        assert_eq!(p.lat, 41.38);
        assert_eq!(p.lon, 2.17);
    }

    #[test]
    fn parse_lat_lon() {
        let p: GeoPoint = " 41.5 , 2.25".parse().unwrap();
        assert_eq!(p, GeoPoint::new(41.5, 2.25));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("41.5".parse::<GeoPoint>().is_err());
        assert!("north,2.0".parse::<GeoPoint>().is_err());
        assert!("95.0,2.0".parse::<GeoPoint>().is_err());
    }
}

#[cfg(test)]
mod congestion {
    use crate::CongestionLevel;

    #[test]
    fn default_is_unknown() {
        assert_eq!(CongestionLevel::default(), CongestionLevel::Unknown);
        assert!(!CongestionLevel::Unknown.is_known());
        assert!(CongestionLevel::Closed.is_known());
    }

    #[test]
    fn wire_values() {
        for (i, level) in CongestionLevel::ALL.iter().enumerate() {
            assert_eq!(level.value() as usize, i);
            assert_eq!(CongestionLevel::try_from(i as u8).unwrap(), *level);
        }
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(CongestionLevel::try_from(7).is_err());
        assert!(CongestionLevel::try_from(255).is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(CongestionLevel::Dense.to_string(), "dense");
        assert_eq!(CongestionLevel::Closed.as_str(), "closed");
    }
}

#[cfg(test)]
mod config {
    use std::time::Duration;

    use crate::{IgoConfig, DEFAULT_REFRESH_TTL_SECS};

    #[test]
    fn empty_document_uses_defaults() {
        let config = IgoConfig::from_toml_str("").unwrap();
        assert_eq!(config, IgoConfig::default());
        assert_eq!(config.refresh_ttl(), Duration::from_secs(DEFAULT_REFRESH_TTL_SECS));
        assert_eq!(config.place, "Barcelona, Catalonia");
    }

    #[test]
    fn overrides() {
        let config = IgoConfig::from_toml_str(
            r#"
            place = "Girona"
            pbf_path = "girona.osm.pbf"
            refresh_ttl_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.place, "Girona");
        assert_eq!(config.refresh_ttl(), Duration::from_secs(60));
        assert!(config.pbf_path.is_some());
    }

    #[test]
    fn zero_ttl_rejected() {
        assert!(IgoConfig::from_toml_str("refresh_ttl_secs = 0").is_err());
    }

    #[test]
    fn empty_place_rejected() {
        assert!(IgoConfig::from_toml_str("place = \"  \"").is_err());
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(IgoConfig::from_toml_str("colour = \"red\"").is_err());
    }
}
