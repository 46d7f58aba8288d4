//! Provides utilities for DMS notation degree.
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::iter::Peekable;
use std::str::{Chars, FromStr};

use crate::error::Axis;

/// Returns a DMS notation [`String`] from a DD notation [`f64`].
///
/// The seconds are rounded to 2 decimal places and the hemisphere is chosen by sign,
/// `N`/`S` if `is_lat`, otherwise `E`/`W`.
///
/// # Errors
///
/// Returns [`None`] when `dd` is NaN or infinite.
///
/// # Example
///
/// ```
/// # use coordtrans::dms::dd_to_dms;
/// assert_eq!(dd_to_dms(39.9042, true), Some("39°54'15.12\"N".to_string()));
/// assert_eq!(dd_to_dms(-116.4074, false), Some("116°24'26.64\"W".to_string()));
/// ```
#[inline]
#[must_use]
pub fn dd_to_dms(dd: f64, is_lat: bool) -> Option<String> {
    let axis = if is_lat {
        Axis::Latitude
    } else {
        Axis::Longitude
    };
    DMS::from_degree(dd, axis).map(|x| x.to_string())
}

/// Returns a DD notation [`f64`] from a DMS notation [`str`].
///
/// # Errors
///
/// Returns [`Err`] when `s` does not match `D°M'S"H`.
///
/// # Example
///
/// ```
/// # use coordtrans::dms::dms_to_dd;
/// let dd = dms_to_dd("39°54'15.12\"N").unwrap();
/// assert!((dd - 39.9042).abs() < 1e-10);
///
/// let dd = dms_to_dd("33°51'35.9\"S").unwrap();
/// assert!((dd + 33.85997222222222).abs() < 1e-10);
///
/// assert!(dms_to_dd("39.9042").is_err());
/// ```
#[inline]
pub fn dms_to_dd(s: &str) -> Result<f64, ParseDMSError> {
    s.parse::<DMS>().map(|x| x.to_degree())
}

/// The hemisphere letter of a [`DMS`].
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Returns the hemisphere of a signed `value` on `axis`, zero is north/east.
    #[inline]
    pub fn of(value: f64, axis: Axis) -> Self {
        match (axis, value.is_sign_negative() && value != 0.0) {
            (Axis::Latitude, false) => Self::North,
            (Axis::Latitude, true) => Self::South,
            (Axis::Longitude, false) => Self::East,
            (Axis::Longitude, true) => Self::West,
        }
    }

    /// Returns `true` on the negative side, south or west.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        matches!(self, Self::South | Self::West)
    }

    #[inline]
    pub const fn axis(&self) -> Axis {
        match self {
            Self::North | Self::South => Axis::Latitude,
            Self::East | Self::West => Axis::Longitude,
        }
    }

    #[inline]
    pub const fn as_char(&self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
            Self::East => 'E',
            Self::West => 'W',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Self::North),
            'S' => Some(Self::South),
            'E' => Some(Self::East),
            'W' => Some(Self::West),
            _ => None,
        }
    }
}

/// Represents DMS notation latitude or longitude, e.g. `39°54'15.12"N`.
///
/// # Example
///
/// ```
/// # use coordtrans::dms::*;
/// let dms: DMS = "39°54'15.12\"N".parse().unwrap();
/// assert_eq!(dms.hemisphere(), &Hemisphere::North);
/// assert_eq!(dms.degree(), &39);
/// assert_eq!(dms.minute(), &54);
/// assert_eq!(dms.second(), &15.12);
///
/// assert_eq!(format!("{}", dms), "39°54'15.12\"N");
/// assert_eq!(format!("{:#}", dms), "39°54′15.12″N");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct DMS {
    hemisphere: Hemisphere,
    degree: u32,
    minute: u32,
    second: f64,
}

impl Display for DMS {
    /// Returns `D°M'S"H` with 2 decimal places seconds,
    /// or `D°M′S″H` with prime marks on alternate flag.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (minute_mark, second_mark) = if f.alternate() {
            ('′', '″')
        } else {
            ('\'', '"')
        };
        write!(
            f,
            "{}°{}{}{:.2}{}{}",
            self.degree,
            self.minute,
            minute_mark,
            self.second,
            second_mark,
            self.hemisphere.as_char()
        )
    }
}

impl FromStr for DMS {
    type Err = ParseDMSError;

    /// Makes a [`DMS`] from `D°M'S"H` notation.
    ///
    /// Degree and minute are integers, second is decimal, and `H` is one of `NSEW`.
    /// The prime marks `′`/`″` are accepted as well as `'`/`"`.
    ///
    /// # Errors
    ///
    /// When `s` is empty or does not match the notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Self::Err::with_empty());
        };

        let mut chars = s.chars().peekable();

        let degree = parse_integer(&mut chars)?;
        expect_mark(&mut chars, &['°'])?;
        let minute = parse_integer(&mut chars)?;
        expect_mark(&mut chars, &['\'', '′'])?;
        let second = parse_decimal(&mut chars)?;
        expect_mark(&mut chars, &['"', '″'])?;

        let hemisphere = chars
            .next()
            .and_then(Hemisphere::from_char)
            .ok_or(Self::Err::with_invalid_hemisphere())?;

        if chars.next().is_some() {
            return Err(Self::Err::with_trailing());
        }

        Ok(Self {
            hemisphere,
            degree,
            minute,
            second,
        })
    }
}

fn parse_integer(chars: &mut Peekable<Chars>) -> Result<u32, ParseDMSError> {
    let mut acc: Option<u32> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        let r = acc
            .unwrap_or(0)
            .checked_mul(10)
            .and_then(|v| v.checked_add(d))
            .ok_or(ParseDMSError::with_out_of_bounds())?;
        acc = Some(r);
    }
    acc.ok_or(ParseDMSError::with_invalid_digit())
}

fn parse_decimal(chars: &mut Peekable<Chars>) -> Result<f64, ParseDMSError> {
    let mut s = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit() || *c == '.') {
        s.push(c);
    }
    s.parse::<f64>()
        .map_err(|_| ParseDMSError::with_invalid_digit())
}

fn expect_mark(chars: &mut Peekable<Chars>, marks: &[char]) -> Result<(), ParseDMSError> {
    chars
        .next_if(|c| marks.contains(c))
        .map(|_| ())
        .ok_or(ParseDMSError::with_missing_mark())
}

impl DMS {
    /// Makes a [`DMS`].
    ///
    /// # Errors
    ///
    /// Returns [`None`] when `second` is negative or not finite.
    ///
    /// # Example
    ///
    /// ```
    /// # use coordtrans::dms::*;
    /// let dms = DMS::new(Hemisphere::East, 116, 24, 26.64).unwrap();
    /// assert_eq!(dms.to_string(), "116°24'26.64\"E");
    /// ```
    #[inline]
    #[must_use]
    pub fn new(hemisphere: Hemisphere, degree: u32, minute: u32, second: f64) -> Option<Self> {
        if !second.is_finite() || second.is_sign_negative() {
            return None;
        }

        Some(Self {
            hemisphere,
            degree,
            minute,
            second,
        })
    }

    /// Makes a [`DMS`] from DD notation [`f64`].
    ///
    /// degree = ⌊|𝑣|⌋, minute = ⌊(|𝑣| − degree)·60⌋,
    /// and second is the remaining fraction in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`None`] when `value` is NaN or infinite,
    /// or its degree does not fit in [`u32`].
    ///
    /// # Example
    ///
    /// ```
    /// # use coordtrans::dms::*;
    /// # use coordtrans::error::Axis;
    /// let dms = DMS::from_degree(-33.8688, Axis::Latitude).unwrap();
    /// assert_eq!(dms.hemisphere(), &Hemisphere::South);
    /// assert_eq!(dms.degree(), &33);
    /// assert_eq!(dms.minute(), &52);
    /// assert!((dms.second() - 7.68).abs() < 1e-9);
    /// ```
    pub fn from_degree(value: f64, axis: Axis) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }

        let abs = value.abs();
        let degree = abs.floor();
        if degree > f64::from(u32::MAX) {
            return None;
        }
        let minute = ((abs - degree) * 60.0).floor();
        let second = (abs - degree - minute / 60.0) * 3600.0;

        // float error may give tiny negative second
        Self::new(
            Hemisphere::of(value, axis),
            degree as u32,
            minute as u32,
            second.max(0.0),
        )
    }

    /// Returns the hemisphere of `self`.
    #[inline]
    #[must_use]
    pub const fn hemisphere(&self) -> &Hemisphere {
        &self.hemisphere
    }

    /// Returns the degree of `self`.
    #[inline]
    #[must_use]
    pub const fn degree(&self) -> &u32 {
        &self.degree
    }

    /// Returns the minute of `self`.
    #[inline]
    #[must_use]
    pub const fn minute(&self) -> &u32 {
        &self.minute
    }

    /// Returns the second of `self`, including the fraction.
    #[inline]
    #[must_use]
    pub const fn second(&self) -> &f64 {
        &self.second
    }

    /// Returns a signed DD notation [`f64`] that `self` converts into.
    ///
    /// # Example
    ///
    /// ```
    /// # use coordtrans::dms::*;
    /// let dms = DMS::new(Hemisphere::West, 74, 0, 21.6).unwrap();
    /// assert!((dms.to_degree() + 74.006).abs() < 1e-12);
    /// ```
    #[inline]
    #[must_use]
    pub fn to_degree(&self) -> f64 {
        let temp = self.degree as f64 + self.minute as f64 / 60.0 + self.second / 3600.0;

        if self.hemisphere.is_negative() {
            -temp
        } else {
            temp
        }
    }
}

//
// Error
//

/// An error which can be returned on parsing DMS degree.
///
/// This error is used as the error type for the [`FromStr`] for [`DMS`].
#[derive(Debug, PartialEq, Eq)]
pub struct ParseDMSError {
    kind: ParseDMSErrorKind,
}

/// An error kind of [`ParseDMSError`].
#[derive(Debug, PartialEq, Eq)]
pub enum ParseDMSErrorKind {
    InvalidDigit,
    OutOfBounds,
    MissingMark,
    InvalidHemisphere,
    Trailing,
    Empty,
}

impl ParseDMSError {
    #[cold]
    const fn with_invalid_digit() -> Self {
        Self {
            kind: ParseDMSErrorKind::InvalidDigit,
        }
    }

    #[cold]
    const fn with_out_of_bounds() -> Self {
        Self {
            kind: ParseDMSErrorKind::OutOfBounds,
        }
    }

    #[cold]
    const fn with_missing_mark() -> Self {
        Self {
            kind: ParseDMSErrorKind::MissingMark,
        }
    }

    #[cold]
    const fn with_invalid_hemisphere() -> Self {
        Self {
            kind: ParseDMSErrorKind::InvalidHemisphere,
        }
    }

    #[cold]
    const fn with_trailing() -> Self {
        Self {
            kind: ParseDMSErrorKind::Trailing,
        }
    }

    #[cold]
    const fn with_empty() -> Self {
        Self {
            kind: ParseDMSErrorKind::Empty,
        }
    }

    /// Returns the detailed cause.
    pub const fn kind(&self) -> &ParseDMSErrorKind {
        &self.kind
    }
}

impl Error for ParseDMSError {}

impl Display for ParseDMSError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let s = match self.kind {
            ParseDMSErrorKind::InvalidDigit => "invalid digit found in string",
            ParseDMSErrorKind::OutOfBounds => "cannot parse out-of-bounds DMS",
            ParseDMSErrorKind::MissingMark => "degree, minute or second mark not found",
            ParseDMSErrorKind::InvalidHemisphere => "hemisphere must be one of N, S, E or W",
            ParseDMSErrorKind::Trailing => "unexpected characters after hemisphere",
            ParseDMSErrorKind::Empty => "cannot parse DMS from empty string",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_to_string() {
        let cases = [
            (DMS::new(Hemisphere::North, 0, 0, 0.0), "0°0'0.00\"N"),
            (DMS::new(Hemisphere::South, 0, 0, 0.0), "0°0'0.00\"S"),
            (DMS::new(Hemisphere::North, 39, 54, 15.12), "39°54'15.12\"N"),
            (DMS::new(Hemisphere::East, 116, 24, 26.64), "116°24'26.64\"E"),
            (DMS::new(Hemisphere::West, 1, 2, 3.456), "1°2'3.46\"W"),
        ];

        for (a, e) in cases {
            assert_eq!(a.unwrap().to_string(), e);
        }

        assert_eq!(
            format!("{:#}", DMS::new(Hemisphere::East, 116, 24, 26.64).unwrap()),
            "116°24′26.64″E"
        );
    }

    #[test]
    fn test_from_str() {
        let cases = [
            ("39°54'15.12\"N", DMS::new(Hemisphere::North, 39, 54, 15.12)),
            ("116°24'26.64\"E", DMS::new(Hemisphere::East, 116, 24, 26.64)),
            ("  33°51'35.9\"S ", DMS::new(Hemisphere::South, 33, 51, 35.9)),
            ("0°0'0\"W", DMS::new(Hemisphere::West, 0, 0, 0.0)),
            ("39°54′15.12″N", DMS::new(Hemisphere::North, 39, 54, 15.12)),
            ("39°54'15.\"n", DMS::new(Hemisphere::North, 39, 54, 15.0)),
        ];
        for (a, e) in cases {
            assert_eq!(DMS::from_str(a).expect(a), e.expect(a), "{}", a);
        }

        let cases = [
            ("", ParseDMSErrorKind::Empty),
            ("   ", ParseDMSErrorKind::Empty),
            ("39.9042", ParseDMSErrorKind::MissingMark),
            ("°54'15.12\"N", ParseDMSErrorKind::InvalidDigit),
            ("39°'15.12\"N", ParseDMSErrorKind::InvalidDigit),
            ("39°54'\"N", ParseDMSErrorKind::InvalidDigit),
            ("39°54'1.2.3\"N", ParseDMSErrorKind::InvalidDigit),
            ("39°54'15.12N", ParseDMSErrorKind::MissingMark),
            ("39°54'15.12\"", ParseDMSErrorKind::InvalidHemisphere),
            ("39°54'15.12\"X", ParseDMSErrorKind::InvalidHemisphere),
            ("39°54'15.12\"NE", ParseDMSErrorKind::Trailing),
            ("99999999999°0'0\"N", ParseDMSErrorKind::OutOfBounds),
        ];
        for (c, kind) in cases {
            assert_eq!(DMS::from_str(c).unwrap_err().kind(), &kind, "{}", c);
        }
    }

    #[test]
    fn test_from_degree() {
        let dms = DMS::from_degree(39.9042, Axis::Latitude).unwrap();
        assert_eq!(dms.hemisphere, Hemisphere::North);
        assert_eq!(dms.degree, 39);
        assert_eq!(dms.minute, 54);
        assert!((dms.second - 15.12).abs() < 1e-9);

        let dms = DMS::from_degree(-0.0, Axis::Longitude).unwrap();
        assert_eq!(dms.hemisphere, Hemisphere::East);

        let dms = DMS::from_degree(-180.0, Axis::Longitude).unwrap();
        assert_eq!(dms.hemisphere, Hemisphere::West);
        assert_eq!(dms.degree, 180);
        assert_eq!(dms.minute, 0);

        assert!(DMS::from_degree(f64::NAN, Axis::Latitude).is_none());
        assert!(DMS::from_degree(f64::INFINITY, Axis::Latitude).is_none());
        assert!(DMS::from_degree(1e20, Axis::Longitude).is_none());
        assert!(DMS::from_degree(-5e9, Axis::Latitude).is_none());

        let dms = DMS::from_degree(4294967295.5, Axis::Longitude).unwrap();
        assert_eq!(dms.degree(), &u32::MAX);
        assert_eq!(dms.minute(), &30);
    }

    #[test]
    fn test_round_trip() {
        // reproduces within one arc-second
        let mut v = -90.0;
        while v <= 90.0 {
            let s = dd_to_dms(v, true).unwrap();
            let back = dms_to_dd(&s).unwrap();
            assert!((back - v).abs() < 1.0 / 3600.0, "{v} {s} {back}");
            v += 0.7311;
        }

        let s = dd_to_dms(39.9042, true).unwrap();
        assert!((dms_to_dd(&s).unwrap() - 39.9042).abs() < 1.0 / 3600.0);
    }
}
