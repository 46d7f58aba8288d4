//! Provides the parser of the coordinate text.
//!
//! A line is parsed in the convention of its source [`CoordinateSystem`],
//! and the result stays in that system, it is not yet converted into WGS84.
//! The exceptions are DMS and UTM, which are read as WGS84 degrees.
use log::warn;

use crate::dms::dms_to_dd;
use crate::error::Expected;
use crate::system::FormatKind;
use crate::utm::Utm;
use crate::{Coordinate, CoordinateSystem, Error, Result};

/// Returns a pair of finite floats separated by a comma.
fn parse_pair(text: &str, expected: Expected) -> Result<(f64, f64)> {
    let err = || Error::new_format(text, expected);

    let mut parts = text.split(',').map(str::trim);
    let (Some(first), Some(second), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(err());
    };

    let first: f64 = first.parse().map_err(|_| err())?;
    let second: f64 = second.parse().map_err(|_| err())?;
    if !first.is_finite() || !second.is_finite() {
        return Err(err());
    }

    Ok((first, second))
}

fn parse_dms_pair(text: &str) -> Result<Coordinate> {
    let err = || Error::new_format(text, Expected::DegreesMinutesSeconds);

    let mut parts = text.split(',');
    let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(err());
    };

    let latitude = dms_to_dd(lat).map_err(|_| err())?;
    let longitude = dms_to_dd(lng).map_err(|_| err())?;
    Ok(Coordinate::new(longitude, latitude))
}

/// Parses one line of `text` in the convention of `system`.
///
/// - decimal degrees: `lat, lng`, returned as (lng, lat),
/// - DMS: `D°M'S"H, D°M'S"H`, latitude first,
/// - UTM: `<zone><band> <easting> <northing>`, approximately, see [`crate::utm`],
/// - Web Mercator: `x, y` \[m\], no reordering.
///
/// This does not check the geographic range of the result,
/// except for UTM whose result is WGS84 degrees.
///
/// # Errors
///
/// If `text` does not match the convention, or has a non-finite number.
/// A UTM line out of the geographic range gives an out-of-range error.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// let c = parse_coordinate_line("39.9042, 116.4074", CoordinateSystem::Wgs84)?;
/// assert_eq!(c, Coordinate::new(116.4074, 39.9042));
///
/// let c = parse_coordinate_line("12958528.0, 4849865.0", CoordinateSystem::WebMercator)?;
/// assert_eq!(c, Coordinate::new(12958528.0, 4849865.0));
///
/// let c = parse_coordinate_line("39°54'15.12\"N, 116°24'26.64\"E", CoordinateSystem::Wgs84Dms)?;
/// assert!((c.longitude - 116.4074).abs() < 1e-9);
/// assert!((c.latitude - 39.9042).abs() < 1e-9);
///
/// assert!(parse_coordinate_line("notacoord", CoordinateSystem::Wgs84).is_err());
/// # Ok::<(), Error>(())
/// ```
pub fn parse_coordinate_line(text: &str, system: CoordinateSystem) -> Result<Coordinate> {
    let text = text.trim();
    match system.format_kind() {
        FormatKind::DecimalDegrees => {
            let (lat, lng) = parse_pair(text, Expected::DecimalDegrees)?;
            Ok(Coordinate::new(lng, lat))
        }
        FormatKind::DegreesMinutesSeconds => parse_dms_pair(text),
        FormatKind::UtmZoneEastingNorthing => {
            let c = text.parse::<Utm>()?.to_wgs84();
            c.validate()?;
            Ok(c)
        }
        FormatKind::MercatorMeters => {
            let (x, y) = parse_pair(text, Expected::MercatorMeters)?;
            Ok(Coordinate::new(x, y))
        }
    }
}

/// A successfully parsed line.
#[derive(Debug, PartialEq, Clone)]
pub struct ParsedLine {
    /// The 1-based line number in the input.
    pub line_number: usize,
    /// The trimmed text of the line.
    pub original: String,
    pub coordinate: Coordinate,
}

/// A line that failed to parse.
#[derive(Debug, PartialEq)]
pub struct SkippedLine {
    /// The 1-based line number in the input.
    pub line_number: usize,
    pub original: String,
    pub error: Error,
}

/// The result of [`parse_lines`] and [`parse_text`].
#[derive(Debug, PartialEq, Default)]
pub struct ParsedBatch {
    /// Parsed lines, in the input order.
    pub entries: Vec<ParsedLine>,
    /// Lines skipped by parse failure, in the input order.
    ///
    /// Blank lines are not counted.
    pub skipped: Vec<SkippedLine>,
}

impl ParsedBatch {
    /// Returns the number of lines skipped by parse failure.
    #[inline]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Returns `true` if no line is parsed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses `lines`, one coordinate per line.
///
/// Blank lines are ignored and lines failing to parse are skipped with a warning,
/// a failure never aborts the rest.
/// Line numbers are 1-based positions in `lines`, blank ones included.
pub fn parse_lines<'a, I>(lines: I, system: CoordinateSystem) -> ParsedBatch
where
    I: IntoIterator<Item = &'a str>,
{
    let mut batch = ParsedBatch::default();

    for (lineno, line) in lines.into_iter().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_coordinate_line(line, system) {
            Ok(coordinate) => batch.entries.push(ParsedLine {
                line_number: lineno + 1,
                original: line.to_string(),
                coordinate,
            }),
            Err(error) => {
                warn!("line {} skipped: {}", lineno + 1, error);
                batch.skipped.push(SkippedLine {
                    line_number: lineno + 1,
                    original: line.to_string(),
                    error,
                });
            }
        }
    }

    batch
}

/// Parses multi-line `text`, see [`parse_lines`].
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// # use coordtrans::parser::parse_text;
/// let batch = parse_text("39.9,116.4\nnotacoord\n\n40.0,116.5", CoordinateSystem::Wgs84);
/// assert_eq!(batch.entries.len(), 2);
/// assert_eq!(batch.entries[0].line_number, 1);
/// assert_eq!(batch.entries[1].line_number, 4);
/// assert_eq!(batch.skipped_count(), 1);
/// assert_eq!(batch.skipped[0].line_number, 2);
/// ```
#[inline]
pub fn parse_text(text: &str, system: CoordinateSystem) -> ParsedBatch {
    parse_lines(text.lines(), system)
}

#[cfg(test)]
mod test {
    use super::*;

    mod decimal_degrees {
        use super::*;

        #[test]
        fn test_order() {
            let c = parse_coordinate_line("39.9042, 116.4074", CoordinateSystem::Wgs84).unwrap();
            assert_eq!(c.longitude, 116.4074);
            assert_eq!(c.latitude, 39.9042);

            for sys in [CoordinateSystem::Gcj02, CoordinateSystem::Bd09] {
                let c = parse_coordinate_line("  -33.8688,151.2093 ", sys).unwrap();
                assert_eq!(c, Coordinate::new(151.2093, -33.8688));
            }
        }

        #[test]
        fn test_error() {
            for s in [
                "",
                "39.9042",
                "39.9042 116.4074",
                "39.9042, 116.4074, 10.0",
                "39.9042, abc",
                "39.9042,",
                "NaN, 116.4074",
                "inf, 116.4074",
            ] {
                let err = parse_coordinate_line(s, CoordinateSystem::Wgs84).unwrap_err();
                assert!(err.is_format(), "{s:?}");
            }
        }

        #[test]
        fn test_out_of_range_is_parsed() {
            let c = parse_coordinate_line("91.0, 181.0", CoordinateSystem::Wgs84).unwrap();
            assert_eq!(c, Coordinate::new(181.0, 91.0));
        }
    }

    mod dms {
        use super::*;

        #[test]
        fn test() {
            let c = parse_coordinate_line(
                "33°51'35.9\"S, 151°12'33.5\"E",
                CoordinateSystem::Wgs84Dms,
            )
            .unwrap();
            assert!((c.latitude + 33.85997222222222).abs() < 1e-12);
            assert!((c.longitude - 151.20930555555555).abs() < 1e-12);
        }

        #[test]
        fn test_error() {
            for s in [
                "39°54'15.12\"N",
                "39.9042, 116.4074",
                "39°54'15.12\"N, 116°24'26.64\"E, 0°0'0\"N",
                "39°54'15.12\"N; 116°24'26.64\"E",
            ] {
                let err = parse_coordinate_line(s, CoordinateSystem::Wgs84Dms).unwrap_err();
                assert!(err.is_format(), "{s:?}");
            }
        }
    }

    mod utm {
        use super::*;

        #[test]
        fn test() {
            let c = parse_coordinate_line("33N 500000 1113200", CoordinateSystem::Utm).unwrap();
            assert_eq!(c, Coordinate::new(15.0, 10.0));

            let err = parse_coordinate_line("39.9042, 116.4074", CoordinateSystem::Utm).unwrap_err();
            assert!(err.is_format());
        }

        #[test]
        fn test_out_of_range() {
            for s in [
                "33N 500000 99999999",
                "33N 500000 999999999999.0",
                "99N 500000 1113200",
                "4294967295N 500000 0",
            ] {
                let err = parse_coordinate_line(s, CoordinateSystem::Utm).unwrap_err();
                assert!(err.is_out_of_range(), "{s:?}");
            }

            let batch = parse_text(
                "50T 447192.3 4417528.5\n33N 500000 999999999999.0",
                CoordinateSystem::Utm,
            );
            assert_eq!(batch.entries.len(), 1);
            assert_eq!(batch.skipped_count(), 1);
            assert_eq!(batch.skipped[0].line_number, 2);
            assert!(batch.skipped[0].error.is_out_of_range());
        }
    }

    mod web_mercator {
        use super::*;

        #[test]
        fn test() {
            let c = parse_coordinate_line("-8238310.24, 4970071.58", CoordinateSystem::WebMercator)
                .unwrap();
            assert_eq!(c, Coordinate::new(-8238310.24, 4970071.58));

            let err = parse_coordinate_line("12958528.0", CoordinateSystem::WebMercator).unwrap_err();
            assert!(err.is_format());
        }
    }

    #[test]
    fn test_parse_text() {
        let batch = parse_text("39.9,116.4\nnotacoord\n40.0,116.5", CoordinateSystem::Wgs84);
        assert_eq!(
            batch.entries,
            vec![
                ParsedLine {
                    line_number: 1,
                    original: "39.9,116.4".to_string(),
                    coordinate: Coordinate::new(116.4, 39.9),
                },
                ParsedLine {
                    line_number: 3,
                    original: "40.0,116.5".to_string(),
                    coordinate: Coordinate::new(116.5, 40.0),
                },
            ]
        );
        assert_eq!(batch.skipped_count(), 1);
        assert_eq!(batch.skipped[0].line_number, 2);
        assert_eq!(batch.skipped[0].original, "notacoord");
        assert!(batch.skipped[0].error.is_format());
    }

    #[test]
    fn test_parse_text_blank() {
        let batch = parse_text("", CoordinateSystem::Wgs84);
        assert!(batch.is_empty());
        assert_eq!(batch.skipped_count(), 0);

        let batch = parse_text("\n  \r\n\t\n", CoordinateSystem::Wgs84);
        assert!(batch.is_empty());
        assert_eq!(batch.skipped_count(), 0);

        let batch = parse_text("\r\n 39.9, 116.4 \r\n", CoordinateSystem::Wgs84);
        assert_eq!(batch.entries.len(), 1);
        assert_eq!(batch.entries[0].line_number, 2);
        assert_eq!(batch.entries[0].original, "39.9, 116.4");
    }

    #[test]
    fn test_parse_lines() {
        let lines = ["", "39.9,116.4", "39.9"];
        let batch = parse_lines(lines, CoordinateSystem::Wgs84);
        assert_eq!(batch.entries.len(), 1);
        assert_eq!(batch.entries[0].line_number, 2);
        assert_eq!(batch.skipped[0].line_number, 3);
    }
}
