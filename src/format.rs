//! Provides the formatter, renders a WGS84 coordinate in each system's text.
use crate::dms::DMS;
use crate::error::Axis;
use crate::system::FormatKind;
use crate::transform::from_wgs84;
use crate::utm::Utm;
use crate::{Coordinate, CoordinateSystem, Error, Result};

/// A coordinate in the target system and its text.
#[derive(Debug, PartialEq, Clone)]
pub struct Formatted {
    /// The coordinate in the target system, (x, y) \[m\] for Web Mercator.
    ///
    /// For DMS and UTM this is the WGS84 coordinate which the text is made from.
    pub coordinate: Coordinate,
    pub text: String,
}

/// Returns `lat, lng` with 6 decimal places.
///
/// ```
/// # use coordtrans::*;
/// # use coordtrans::format::format_decimal_degrees;
/// let s = format_decimal_degrees(&Coordinate::new(116.4074, 39.9042));
/// assert_eq!(s, "39.904200, 116.407400");
/// ```
#[inline]
pub fn format_decimal_degrees(c: &Coordinate) -> String {
    format!("{:.6}, {:.6}", c.latitude, c.longitude)
}

/// Returns `D°M'S"H, D°M'S"H`, latitude first.
///
/// # Errors
///
/// If `c` is not finite.
///
/// ```
/// # use coordtrans::*;
/// # use coordtrans::format::format_dms;
/// let s = format_dms(&Coordinate::new(116.4074, 39.9042))?;
/// assert_eq!(s, "39°54'15.12\"N, 116°24'26.64\"E");
/// # Ok::<(), Error>(())
/// ```
pub fn format_dms(c: &Coordinate) -> Result<String> {
    let lat = DMS::from_degree(c.latitude, Axis::Latitude)
        .ok_or_else(|| Error::new_numeric_domain("DMS notation", c.latitude))?;
    let lng = DMS::from_degree(c.longitude, Axis::Longitude)
        .ok_or_else(|| Error::new_numeric_domain("DMS notation", c.longitude))?;
    Ok(format!("{lat}, {lng}"))
}

/// Returns the approximate UTM text, see [`crate::utm`].
///
/// # Errors
///
/// If `c` is not finite, or out of the geographic range.
pub fn format_utm(c: &Coordinate) -> Result<String> {
    if let Some(v) = [c.longitude, c.latitude].into_iter().find(|v| !v.is_finite()) {
        return Err(Error::new_numeric_domain("UTM notation", v));
    }
    c.validate()?;
    Ok(Utm::from_wgs84(c).to_string())
}

/// Returns `x, y` with 1 decimal place.
#[inline]
pub fn format_mercator_meters(xy: &Coordinate) -> String {
    format!("{:.1}, {:.1}", xy.longitude, xy.latitude)
}

/// Converts a WGS84 coordinate `wgs84` into `target` and renders it.
///
/// # Errors
///
/// If the conversion into `target` fails,
/// e.g. Web Mercator at the poles.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// # use coordtrans::format::format_wgs84;
/// let beijing = Coordinate::new(116.4074, 39.9042);
///
/// let f = format_wgs84(&beijing, CoordinateSystem::WebMercator)?;
/// assert_eq!(f.text, "12958412.5, 4852030.6");
///
/// let f = format_wgs84(&beijing, CoordinateSystem::Utm)?;
/// assert_eq!(f.text, "50N 12958471.8 4442135.5");
/// assert_eq!(f.coordinate, beijing);
///
/// assert!(format_wgs84(&Coordinate::new(0.0, 90.0), CoordinateSystem::WebMercator).is_err());
/// # Ok::<(), Error>(())
/// ```
pub fn format_wgs84(wgs84: &Coordinate, target: CoordinateSystem) -> Result<Formatted> {
    let coordinate = from_wgs84(*wgs84, target)?;
    let text = match target.format_kind() {
        FormatKind::DecimalDegrees => format_decimal_degrees(&coordinate),
        FormatKind::DegreesMinutesSeconds => format_dms(&coordinate)?,
        FormatKind::UtmZoneEastingNorthing => format_utm(&coordinate)?,
        FormatKind::MercatorMeters => format_mercator_meters(&coordinate),
    };
    Ok(Formatted { coordinate, text })
}
