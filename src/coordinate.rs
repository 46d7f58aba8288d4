//! Provides [`Coordinate`] and [`Offset`].
use std::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Axis;
use crate::{Error, Result};

/// Returns the normalized latitude into -90.0 <= and <= 90.0.
#[inline]
fn normalize_latitude(t: f64) -> f64 {
    if t.is_nan() || (-90.0..=90.0).contains(&t) {
        t
    } else {
        match t % 360.0 {
            s if s.lt(&-270.0) || s.gt(&270.0) => s - f64::copysign(360.0, s),
            s if s.lt(&-90.0) || s.gt(&90.0) => f64::copysign(180.0, s) - s,
            s => s,
        }
    }
}

/// Returns the normalize longitude -180.0 <= and <= 180.0.
#[inline]
fn normalize_longitude(t: f64) -> f64 {
    if t.is_nan() || (-180.0..=180.0).contains(&t) {
        t
    } else {
        match t % 360.0 {
            s if s.lt(&-180.0) || s.gt(&180.0) => s - f64::copysign(360.0, s),
            s => s,
        }
    }
}

/// Represents a position, an ordered pair longitude and latitude.
///
/// For the geographic systems the unit is \[deg\],
/// for Web Mercator the pair is planar (x, y) \[m\].
///
/// We emphasize that the order is (longitude, latitude),
/// even though the decimal-degree text is written latitude first.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// let beijing = Coordinate::new(116.4074, 39.9042);
/// assert_eq!(beijing.longitude, 116.4074);
/// assert_eq!(beijing.latitude, 39.9042);
///
/// // Add/sub Offset
/// let shifted = beijing + Offset::new(0.01, 0.02);
/// assert_eq!(shifted - Offset::new(0.01, 0.02), beijing);
/// ```
#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    /// The longitude \[deg\] (or x \[m\])
    pub longitude: f64,
    /// The latitude \[deg\] (or y \[m\])
    pub latitude: f64,
}

/// A correction in degree which a offset model adds to a [`Coordinate`].
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Offset {
    /// The longitude correction \[deg\].
    pub longitude: f64,
    /// The latitude correction \[deg\].
    pub latitude: f64,
}

impl Offset {
    #[inline]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<(f64, f64)> for Coordinate {
    /// see [`Coordinate::new()`], the tuple is (longitude, latitude)
    fn from(rhs: (f64, f64)) -> Self {
        Self::new(rhs.0, rhs.1)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.longitude, value.latitude)
    }
}

impl Add<Offset> for Coordinate {
    type Output = Self;

    fn add(self, rhs: Offset) -> Self::Output {
        Self::new(self.longitude + rhs.longitude, self.latitude + rhs.latitude)
    }
}

impl Sub<Offset> for Coordinate {
    type Output = Self;

    fn sub(self, rhs: Offset) -> Self::Output {
        Self::new(self.longitude - rhs.longitude, self.latitude - rhs.latitude)
    }
}

impl Coordinate {
    /// Makes a [`Coordinate`].
    ///
    /// This does not check the value range.
    #[inline]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Makes a [`Coordinate`] with checking the geographic range.
    ///
    /// # Errors
    ///
    /// If `latitude` and/or `longitude` is out-of-range (or NaN),
    /// `latitude` must satisfy -90.0 <= and <= 90.0
    /// and `longitude` does -180.0 <= and <= 180.0.
    ///
    /// # Example
    ///
    /// ```
    /// # use coordtrans::*;
    /// assert!(Coordinate::try_new(116.4, 39.9).is_ok());
    /// assert!(Coordinate::try_new(116.4, 91.0).is_err());
    /// assert!(Coordinate::try_new(181.0, 39.9).is_err());
    /// assert!(Coordinate::try_new(f64::NAN, 39.9).is_err());
    /// ```
    pub fn try_new(longitude: f64, latitude: f64) -> Result<Self> {
        let c = Self::new(longitude, latitude);
        c.validate()?;
        Ok(c)
    }

    /// Checks that `self` lies in the geographic range.
    ///
    /// # Errors
    ///
    /// See [`Coordinate::try_new`].
    pub fn validate(&self) -> Result<()> {
        for (axis, value) in [
            (Axis::Latitude, self.latitude),
            (Axis::Longitude, self.longitude),
        ] {
            let (low, high) = axis.bounds();
            if !(low..=high).contains(&value) {
                return Err(Error::new_out_of_range(axis, value));
            }
        }
        Ok(())
    }

    /// Returns `true` if both components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }

    /// Makes a normalized [`Coordinate`] from `self`.
    ///
    /// The result has latitude and longitude
    /// which value -90.0 <= and <= 90.0, and -180.0 <= and <= 180.0 respectively.
    ///
    /// # Example
    ///
    /// ```
    /// # use coordtrans::*;
    /// let c = Coordinate::new(200.0, 100.0);
    /// assert_eq!(c.normalize(), Coordinate::new(-160.0, 80.0));
    /// ```
    pub fn normalize(&self) -> Self {
        Self::new(
            normalize_longitude(self.longitude),
            normalize_latitude(self.latitude),
        )
    }

    /// Returns the largest absolute difference of the components.
    ///
    /// ```
    /// # use coordtrans::*;
    /// let a = Coordinate::new(116.0, 39.0);
    /// let b = Coordinate::new(116.5, 38.0);
    /// assert_eq!(a.max_abs_diff(&b), 1.0);
    /// ```
    #[inline]
    pub fn max_abs_diff(&self, other: &Coordinate) -> f64 {
        f64::max(
            (self.longitude - other.longitude).abs(),
            (self.latitude - other.latitude).abs(),
        )
    }
}
