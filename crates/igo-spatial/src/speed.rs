//! Speed-limit derivation for street edges.
//!
//! Raw street data carries two loosely typed attributes per edge: the road
//! classification (`highway`) and an optional explicit limit (`maxspeed`).
//! Either may be absent, a single value, or a list of candidates when several
//! ways were merged into one edge.  Both are normalised into [`TagValue`] at
//! ingestion and resolved to a single km/h figure exactly once, when the
//! edge is added to the network.
//!
//! # Resolution order
//!
//! 1. An explicit `maxspeed` that parses as a number wins.  For a candidate
//!    list the largest parsable value is taken.
//! 2. Otherwise the classification is looked up in [`class_speed_kmh`]; for a
//!    candidate list the class with the **highest** limit is taken.
//! 3. If nothing resolves, [`FALLBACK_SPEED_KMH`] is used.

/// Speed assumed for classifications outside the lookup table.
pub const FALLBACK_SPEED_KMH: f32 = 30.0;

/// A raw attribute as found on an edge: missing, one value, or candidates.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum TagValue {
    #[default]
    Missing,
    Single(String),
    Candidates(Vec<String>),
}

impl TagValue {
    /// Normalise an OSM tag value.  `;` separates multiple values.
    pub fn from_osm(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return TagValue::Missing;
        };
        let mut parts: Vec<String> = raw
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect();
        match parts.len() {
            0 => TagValue::Missing,
            1 => TagValue::Single(parts.remove(0)),
            _ => TagValue::Candidates(parts),
        }
    }

    /// Iterate over every value carried by this tag.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            TagValue::Missing => &[],
            TagValue::Single(v) => std::slice::from_ref(v),
            TagValue::Candidates(vs) => vs,
        };
        slice.iter().map(String::as_str)
    }
}

impl From<&str> for TagValue {
    fn from(v: &str) -> Self {
        TagValue::Single(v.to_owned())
    }
}

impl From<Vec<&str>> for TagValue {
    fn from(vs: Vec<&str>) -> Self {
        TagValue::Candidates(vs.into_iter().map(str::to_owned).collect())
    }
}

/// Speed limit in km/h for a road classification, or `None` if the class is
/// not in the table.
pub fn class_speed_kmh(class: &str) -> Option<f32> {
    match class {
        "residential"   | "residential_link"   => Some(30.0),
        "living_street" | "living_street_link" => Some(20.0),
        "primary"       | "primary_link"       => Some(50.0),
        "secondary"     | "secondary_link"     => Some(40.0),
        "tertiary"      | "tertiary_link"      => Some(30.0),
        "trunk"         | "trunk_link"         => Some(90.0),
        _ => None,
    }
}

/// Parse an explicit `maxspeed` value.
///
/// Accepts a bare integer (`"50"`) or an integer followed by `km/h`, `kmh`
/// or `mph` (`"50 km/h"`, `"30 mph"`).  Any other unit, and symbolic values
/// such as `"signals"` or `"ES:urban"`, yield `None`.
pub fn parse_max_speed(raw: &str) -> Option<f32> {
    let raw = raw.trim();
    let digits_end = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    let value: u32 = raw[..digits_end].parse().ok()?;
    if value == 0 {
        return None;
    }
    let unit = raw[digits_end..].trim().to_ascii_lowercase();
    match unit.as_str() {
        "" | "km/h" | "kmh" => Some(value as f32),
        "mph" => Some(value as f32 * 1.609_344),
        _ => None,
    }
}

/// Resolve an edge's speed limit in km/h from its raw tags.
pub fn derive_max_speed(highway: &TagValue, maxspeed: &TagValue) -> f32 {
    let explicit = maxspeed.values().filter_map(parse_max_speed).reduce(f32::max);
    if let Some(kmh) = explicit {
        return kmh;
    }
    highway
        .values()
        .filter_map(class_speed_kmh)
        .reduce(f32::max)
        .unwrap_or(FALLBACK_SPEED_KMH)
}
