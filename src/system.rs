//! Provides [`CoordinateSystem`] and [`FormatKind`].
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Expected;
use crate::Error;

/// The textual convention of a [`CoordinateSystem`].
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FormatKind {
    /// `lat, lng`, e.g. `39.9042, 116.4074`
    DecimalDegrees,
    /// `D°M'S"H, D°M'S"H`, e.g. `39°54'15.12"N, 116°24'26.64"E`
    DegreesMinutesSeconds,
    /// `<zone><letter> <easting> <northing>`, e.g. `50T 447192.3 4417528.5`
    UtmZoneEastingNorthing,
    /// `x, y` in meters, e.g. `12958528.0, 4849865.0`
    MercatorMeters,
}

/// Represents the supported coordinate systems.
///
/// This is a closed set, every system has both a parse and a format rule.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// let system: CoordinateSystem = "gcj02".parse()?;
/// assert_eq!(system, CoordinateSystem::Gcj02);
/// assert_eq!(system.format_kind(), FormatKind::DecimalDegrees);
/// assert_eq!(system.to_string(), "gcj02");
/// # Ok::<(), coordtrans::Error>(())
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoordinateSystem {
    #[cfg_attr(feature = "serde", serde(rename = "wgs84"))]
    Wgs84,
    #[cfg_attr(feature = "serde", serde(rename = "wgs84_dms"))]
    Wgs84Dms,
    #[cfg_attr(feature = "serde", serde(rename = "gcj02"))]
    Gcj02,
    #[cfg_attr(feature = "serde", serde(rename = "bd09"))]
    Bd09,
    #[cfg_attr(feature = "serde", serde(rename = "utm"))]
    Utm,
    #[cfg_attr(feature = "serde", serde(rename = "web_mercator"))]
    WebMercator,
}

impl CoordinateSystem {
    /// All the systems, in the canonical display order.
    pub const ALL: [CoordinateSystem; 6] = [
        Self::Wgs84,
        Self::Wgs84Dms,
        Self::Gcj02,
        Self::Bd09,
        Self::Utm,
        Self::WebMercator,
    ];

    /// Returns the format kind.
    ///
    /// ```
    /// # use coordtrans::*;
    /// assert_eq!(CoordinateSystem::Bd09.format_kind(), FormatKind::DecimalDegrees);
    /// assert_eq!(CoordinateSystem::Utm.format_kind(), FormatKind::UtmZoneEastingNorthing);
    /// ```
    #[inline]
    pub const fn format_kind(&self) -> FormatKind {
        match self {
            Self::Wgs84 | Self::Gcj02 | Self::Bd09 => FormatKind::DecimalDegrees,
            Self::Wgs84Dms => FormatKind::DegreesMinutesSeconds,
            Self::Utm => FormatKind::UtmZoneEastingNorthing,
            Self::WebMercator => FormatKind::MercatorMeters,
        }
    }

    /// Returns `true` if the system is expressed in geographic degrees
    /// (and so bounded to ±90/±180), `false` for the planar ones.
    #[inline]
    pub const fn is_geographic(&self) -> bool {
        !matches!(self, Self::Utm | Self::WebMercator)
    }

    /// Returns the identifier used in URLs and exports.
    #[inline]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Wgs84 => "wgs84",
            Self::Wgs84Dms => "wgs84_dms",
            Self::Gcj02 => "gcj02",
            Self::Bd09 => "bd09",
            Self::Utm => "utm",
            Self::WebMercator => "web_mercator",
        }
    }

    /// Returns the display name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Wgs84 => "WGS84 (Decimal Degrees)",
            Self::Wgs84Dms => "WGS84 (Degrees Minutes Seconds)",
            Self::Gcj02 => "GCJ-02 (Mars Coordinates)",
            Self::Bd09 => "BD-09 (Baidu Coordinates)",
            Self::Utm => "UTM (Universal Transverse Mercator)",
            Self::WebMercator => "Web Mercator (EPSG:3857)",
        }
    }

    /// Returns an example input of the system.
    #[inline]
    pub const fn example(&self) -> &'static str {
        match self {
            Self::Wgs84 => "39.9042, 116.4074",
            Self::Wgs84Dms => "39°54'15.12\"N, 116°24'26.64\"E",
            Self::Gcj02 => "39.9056, 116.4139",
            Self::Bd09 => "39.9119, 116.4204",
            Self::Utm => "50T 447192.3 4417528.5",
            Self::WebMercator => "12958528.0, 4849865.0",
        }
    }
}

impl Display for CoordinateSystem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CoordinateSystem {
    type Err = Error;

    /// Makes a [`CoordinateSystem`] from its id, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Self::ALL
            .into_iter()
            .find(|sys| sys.id().eq_ignore_ascii_case(t))
            .ok_or_else(|| Error::new_format(s, Expected::SystemId))
    }
}
