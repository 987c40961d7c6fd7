//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` uses `f32` (single-precision) latitude/longitude.  At the
//! equator this gives ~1 m precision, plenty for snapping within a city.
//!
//! Feeds publish polylines as `(lon, lat)` pairs while the graph stores
//! `(lat, lon)`; use [`GeoPoint::from_lon_lat`] at the boundary so the axis
//! order is fixed in one place.

use serde::{Deserialize, Serialize};

/// A WGS-84 geographic coordinate stored as single-precision floats.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f32,
    pub lon: f32,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// Build from a `(lon, lat)` pair as found in highway-feed polylines.
    #[inline]
    pub fn from_lon_lat(lon: f32, lat: f32) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Accuracy: ±0.5 % (f32 rounding); suitable for edge lengths at city
    /// scale.
    pub fn distance_m(self, other: GeoPoint) -> f32 {
        const R: f32 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// `true` if both components are finite and inside WGS-84 bounds.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

impl std::str::FromStr for GeoPoint {
    type Err = crate::IgoError;

    /// Parse `"lat,lon"` (whitespace around either number is ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| crate::IgoError::Parse(format!("expected \"lat,lon\", got {s:?}")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f32>()
                .map_err(|e| crate::IgoError::Parse(format!("invalid coordinate {v:?}: {e}")))
        };
        let point = GeoPoint::new(parse(lat)?, parse(lon)?);
        if !point.is_valid() {
            return Err(crate::IgoError::Parse(format!("coordinate out of range: {s:?}")));
        }
        Ok(point)
    }
}
