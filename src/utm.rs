//! Provides the approximate UTM notation.
//!
//! This is **not** the Universal Transverse Mercator projection.
//! Both directions are linear approximations at 111320 m per degree:
//!
//! - forward: zone = ⌊(𝜆 + 180)/6⌋ + 1, easting = 𝜆·111320, northing = 𝜑·111320,
//! - backward: 𝜆 = (easting − 500000)/111320 + 6·zone − 183, 𝜑 = northing/111320.
//!
//! Note that the two are not inverses of each other,
//! the forward one has no false easting.
//! The error of either against the true projection reaches several degrees.
//!
//! # Example
//!
//! ```
//! # use coordtrans::*;
//! # use coordtrans::utm::Utm;
//! let utm = Utm::from_wgs84(&Coordinate::new(116.4074, 39.9042));
//! assert_eq!(utm.zone(), 50);
//! assert_eq!(utm.to_string(), "50N 12958471.8 4442135.5");
//!
//! let utm: Utm = "50T 447192.3 4417528.5".parse()?;
//! let c = utm.to_wgs84();
//! assert!((c.longitude - 116.5256).abs() < 1e-4);
//! assert!((c.latitude - 39.6832).abs() < 1e-4);
//! # Ok::<(), coordtrans::Error>(())
//! ```
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::Expected;
use crate::{Coordinate, Error};

/// Meters per degree of the approximation.
pub const METERS_PER_DEGREE: f64 = 111320.0;
/// The false easting \[m\] assumed on parsing.
pub const FALSE_EASTING: f64 = 500000.0;

/// Represents an approximate UTM position, `<zone><band> <easting> <northing>`.
#[derive(Debug, PartialEq, Clone)]
pub struct Utm {
    zone: u32,
    band: char,
    easting: f64,
    northing: f64,
}

impl Utm {
    /// Makes a [`Utm`] from a WGS84 coordinate, approximately.
    ///
    /// The band is `N` on the northern hemisphere (and the equator), otherwise `S`.
    /// `c` is expected in the geographic range, see [`Coordinate::validate`].
    pub fn from_wgs84(c: &Coordinate) -> Self {
        let zone = ((c.longitude + 180.0) / 6.0).floor() + 1.0;
        Self {
            // 1..=61 in the geographic range
            zone: zone as u32,
            band: if c.latitude >= 0.0 { 'N' } else { 'S' },
            easting: c.longitude * METERS_PER_DEGREE,
            northing: c.latitude * METERS_PER_DEGREE,
        }
    }

    /// Returns the WGS84 coordinate, approximately.
    ///
    /// The band letter does not affect the result.
    pub fn to_wgs84(&self) -> Coordinate {
        Coordinate::new(
            (self.easting - FALSE_EASTING) / METERS_PER_DEGREE + self.zone as f64 * 6.0 - 183.0,
            self.northing / METERS_PER_DEGREE,
        )
    }

    #[inline]
    pub const fn zone(&self) -> u32 {
        self.zone
    }

    #[inline]
    pub const fn band(&self) -> char {
        self.band
    }

    #[inline]
    pub const fn easting(&self) -> f64 {
        self.easting
    }

    #[inline]
    pub const fn northing(&self) -> f64 {
        self.northing
    }
}

impl Display for Utm {
    /// Easting and northing with 1 decimal place.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{} {:.1} {:.1}",
            self.zone, self.band, self.easting, self.northing
        )
    }
}

fn parse_unsigned(s: &str) -> Option<f64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    s.parse::<f64>().ok()
}

impl FromStr for Utm {
    type Err = Error;

    /// Makes a [`Utm`] from `<zone><band> <easting> <northing>`,
    /// e.g. `50T 447192.3 4417528.5`.
    ///
    /// The zone is digits and the band is one uppercase ASCII letter,
    /// easting and northing are unsigned decimals separated by whitespaces.
    ///
    /// # Errors
    ///
    /// If `s` does not match the notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || Error::new_format(s, Expected::Utm);

        let mut tokens = s.split_whitespace();
        let (Some(head), Some(easting), Some(northing), None) =
            (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(err());
        };

        let band = head.chars().last().ok_or_else(err)?;
        if !band.is_ascii_uppercase() {
            return Err(err());
        }
        let digits = &head[..head.len() - band.len_utf8()];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let zone = digits.parse::<u32>().map_err(|_| err())?;

        Ok(Self {
            zone,
            band,
            easting: parse_unsigned(easting).ok_or_else(err)?,
            northing: parse_unsigned(northing).ok_or_else(err)?,
        })
    }
}
