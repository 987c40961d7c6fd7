//! Congestion level reported by the traffic feed, shared by every crate that
//! touches per-edge traffic state.

use serde::{Deserialize, Serialize};

use crate::IgoError;

/// Current traffic state of a street, `0..=6` on the wire.
///
/// `Unknown` is the default for any edge the feed says nothing about.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum CongestionLevel {
    /// No information.
    #[default]
    Unknown = 0,
    VeryFluid = 1,
    Fluid = 2,
    Dense = 3,
    VeryDense = 4,
    Congested = 5,
    /// Street closed to traffic.
    Closed = 6,
}

impl CongestionLevel {
    /// All levels in wire order.
    pub const ALL: [CongestionLevel; 7] = [
        CongestionLevel::Unknown,
        CongestionLevel::VeryFluid,
        CongestionLevel::Fluid,
        CongestionLevel::Dense,
        CongestionLevel::VeryDense,
        CongestionLevel::Congested,
        CongestionLevel::Closed,
    ];

    /// Numeric wire value.
    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// `true` for levels that carry actual feed information.
    #[inline]
    pub fn is_known(self) -> bool {
        !matches!(self, CongestionLevel::Unknown)
    }

    /// Human-readable label, used in CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            CongestionLevel::Unknown   => "unknown",
            CongestionLevel::VeryFluid => "very fluid",
            CongestionLevel::Fluid     => "fluid",
            CongestionLevel::Dense     => "dense",
            CongestionLevel::VeryDense => "very dense",
            CongestionLevel::Congested => "congested",
            CongestionLevel::Closed    => "closed",
        }
    }
}

impl TryFrom<u8> for CongestionLevel {
    type Error = IgoError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        CongestionLevel::ALL
            .get(v as usize)
            .copied()
            .ok_or_else(|| IgoError::Parse(format!("congestion level {v} outside 0..=6")))
    }
}

impl From<CongestionLevel> for u8 {
    fn from(level: CongestionLevel) -> u8 {
        level.value()
    }
}

impl std::fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
