//! Provides the pairwise converters and the routing through WGS84.
//!
//! WGS84 is the pivot; there is no direct converter between two non-WGS84
//! systems in [`transform`], every conversion composes through WGS84.
//!
//! The GCJ-02 and BD-09 offsets are empirical models,
//! their backward conversions are approximations and not exact inverses.
//!
//! # Example
//!
//! ```
//! # use coordtrans::*;
//! # use coordtrans::transform::*;
//! let wgs = Coordinate::new(116.407387, 39.904179);
//!
//! let gcj = wgs84_to_gcj02(wgs);
//! assert!((gcj.longitude - 116.413629).abs() < 1e-6);
//! assert!((gcj.latitude - 39.905582).abs() < 1e-6);
//!
//! // Outside of China, the offset is not applied
//! let paris = Coordinate::new(2.3522, 48.8566);
//! assert_eq!(wgs84_to_gcj02(paris), paris);
//! ```
use std::f64::consts::PI;

use crate::coordinate::Offset;
use crate::{Coordinate, CoordinateSystem, Error, Result};

macro_rules! mul_add {
    ($a:expr, $b:expr, $c:expr) => {
        if cfg!(feature = "fma") {
            f64::mul_add($a, $b, $c)
        } else {
            $a * $b + $c
        }
    };
}

/// The semi-major axis \[m\] of the Krasovsky 1940 ellipsoid used by the GCJ-02 model.
pub const SEMI_MAJOR_AXIS: f64 = 6378245.0;
/// The square of eccentricity used by the GCJ-02 model.
pub const ECCENTRICITY_SQUARED: f64 = 0.00669342162296594323;
/// Half of the equatorial circumference \[m\] of EPSG:3857.
pub const MERCATOR_HALF_EXTENT: f64 = 20037508.34;

const BAIDU_FACTOR: f64 = PI * 3000.0 / 180.0;

/// Max iteration of [`gcj02_to_wgs84_exact`].
pub const MAX_ITERATION: usize = 30;
/// Convergence criteria \[deg\] of [`gcj02_to_wgs84_exact`].
pub const CRITERIA: f64 = 1e-9;

/// Returns `true` if the offset models do not apply at (`lng`, `lat`).
///
/// This is a rectangle roughly enclosing China.
///
/// ```
/// # use coordtrans::transform::is_out_of_china;
/// assert!(!is_out_of_china(116.4074, 39.9042));
/// assert!(is_out_of_china(2.3522, 48.8566));
/// assert!(is_out_of_china(116.4, 60.0));
/// ```
#[inline]
pub fn is_out_of_china(lng: f64, lat: f64) -> bool {
    !(72.004..=137.8347).contains(&lng) || !(0.8293..=55.8271).contains(&lat)
}

fn transform_lat(x: f64, y: f64) -> f64 {
    let mut ret = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.2 * x.abs().sqrt();
    ret = mul_add!(0.1 * x, y, ret);
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

fn transform_lng(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x.abs().sqrt();
    ret = mul_add!(0.1 * x, y, ret);
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}

/// Returns the Mars offset at `c`, scaled by the local radii of curvature.
fn mars_offset(c: &Coordinate) -> Offset {
    let d_lat = transform_lat(c.longitude - 105.0, c.latitude - 35.0);
    let d_lng = transform_lng(c.longitude - 105.0, c.latitude - 35.0);

    let rad_lat = c.latitude / 180.0 * PI;
    let magic = rad_lat.sin();
    let magic = mul_add!(-ECCENTRICITY_SQUARED * magic, magic, 1.0);
    let sqrt_magic = magic.sqrt();

    let d_lat =
        (d_lat * 180.0) / ((SEMI_MAJOR_AXIS * (1.0 - ECCENTRICITY_SQUARED)) / (magic * sqrt_magic) * PI);
    let d_lng = (d_lng * 180.0) / (SEMI_MAJOR_AXIS / sqrt_magic * rad_lat.cos() * PI);

    Offset::new(d_lng, d_lat)
}

/// Returns the GCJ-02 coordinate of a WGS84 `c`.
///
/// This is identity when [`is_out_of_china`].
pub fn wgs84_to_gcj02(c: Coordinate) -> Coordinate {
    if is_out_of_china(c.longitude, c.latitude) {
        return c;
    }
    c + mars_offset(&c)
}

/// Returns the WGS84 coordinate of a GCJ-02 `c`, approximately.
///
/// This subtracts the offset evaluated at `c` itself,
/// the error is about 1e-5 degree, see [`gcj02_to_wgs84_exact`]
/// for the iterative solution.
///
/// This is identity when [`is_out_of_china`].
pub fn gcj02_to_wgs84(c: Coordinate) -> Coordinate {
    if is_out_of_china(c.longitude, c.latitude) {
        return c;
    }
    c - mars_offset(&c)
}

/// Returns the WGS84 coordinate of a GCJ-02 `c` by fixed-point iteration.
///
/// The iteration stops when the forward conversion of the estimate
/// reproduces `c` within [`CRITERIA`], or after [`MAX_ITERATION`] steps.
///
/// ```
/// # use coordtrans::*;
/// # use coordtrans::transform::*;
/// let wgs = Coordinate::new(114.304569, 30.593354);
/// let actual = gcj02_to_wgs84_exact(wgs84_to_gcj02(wgs));
/// assert!(actual.max_abs_diff(&wgs) < 1e-8);
/// ```
pub fn gcj02_to_wgs84_exact(c: Coordinate) -> Coordinate {
    if is_out_of_china(c.longitude, c.latitude) {
        return c;
    }

    let mut wgs = gcj02_to_wgs84(c);
    for _ in 0..MAX_ITERATION {
        let temp = wgs84_to_gcj02(wgs);
        let delta = Offset::new(temp.longitude - c.longitude, temp.latitude - c.latitude);
        if delta.longitude.abs() < CRITERIA && delta.latitude.abs() < CRITERIA {
            break;
        }
        wgs = wgs - delta;
    }
    wgs
}

/// Returns the BD-09 coordinate of a GCJ-02 `c`.
pub fn gcj02_to_bd09(c: Coordinate) -> Coordinate {
    let (x, y) = (c.longitude, c.latitude);
    let z = x.hypot(y) + 0.00002 * (y * BAIDU_FACTOR).sin();
    let theta = y.atan2(x) + 0.000003 * (x * BAIDU_FACTOR).cos();
    Coordinate::new(z * theta.cos() + 0.0065, z * theta.sin() + 0.006)
}

/// Returns the GCJ-02 coordinate of a BD-09 `c`, approximately.
pub fn bd09_to_gcj02(c: Coordinate) -> Coordinate {
    let x = c.longitude - 0.0065;
    let y = c.latitude - 0.006;
    let z = x.hypot(y) - 0.00002 * (y * BAIDU_FACTOR).sin();
    let theta = y.atan2(x) - 0.000003 * (x * BAIDU_FACTOR).cos();
    Coordinate::new(z * theta.cos(), z * theta.sin())
}

/// Returns the BD-09 coordinate of a WGS84 `c`, through GCJ-02.
#[inline]
pub fn wgs84_to_bd09(c: Coordinate) -> Coordinate {
    gcj02_to_bd09(wgs84_to_gcj02(c))
}

/// Returns the WGS84 coordinate of a BD-09 `c`, through GCJ-02.
#[inline]
pub fn bd09_to_wgs84(c: Coordinate) -> Coordinate {
    gcj02_to_wgs84(bd09_to_gcj02(c))
}

/// Returns the Web Mercator (EPSG:3857) (x, y) \[m\] of a WGS84 `c`.
///
/// # Errors
///
/// If the latitude is ±90.0 (or beyond), or the input is not finite,
/// where the projection diverges.
///
/// ```
/// # use coordtrans::*;
/// # use coordtrans::transform::*;
/// let xy = wgs84_to_web_mercator(Coordinate::new(180.0, 0.0))?;
/// assert_eq!(xy.longitude, MERCATOR_HALF_EXTENT);
/// assert!(xy.latitude.abs() < 1e-6);
///
/// assert!(wgs84_to_web_mercator(Coordinate::new(0.0, 90.0)).is_err());
/// # Ok::<(), coordtrans::Error>(())
/// ```
pub fn wgs84_to_web_mercator(c: Coordinate) -> Result<Coordinate> {
    if !c.longitude.is_finite() {
        return Err(Error::new_numeric_domain(
            "Web Mercator projection",
            c.longitude,
        ));
    }
    // NaN also fails here
    if !(c.latitude.abs() < 90.0) {
        return Err(Error::new_numeric_domain(
            "Web Mercator projection",
            c.latitude,
        ));
    }

    let x = c.longitude * MERCATOR_HALF_EXTENT / 180.0;
    let y = ((90.0 + c.latitude) * PI / 360.0).tan().ln() / (PI / 180.0);
    let y = y * MERCATOR_HALF_EXTENT / 180.0;
    Ok(Coordinate::new(x, y))
}

/// Returns the WGS84 coordinate of a Web Mercator (x, y) \[m\].
///
/// # Errors
///
/// If `xy` is not finite.
pub fn web_mercator_to_wgs84(xy: Coordinate) -> Result<Coordinate> {
    for v in [xy.longitude, xy.latitude] {
        if !v.is_finite() {
            return Err(Error::new_numeric_domain("inverse Web Mercator projection", v));
        }
    }

    let lng = xy.longitude / MERCATOR_HALF_EXTENT * 180.0;
    let lat = xy.latitude / MERCATOR_HALF_EXTENT * 180.0;
    let lat = 180.0 / PI * (2.0 * (lat * PI / 180.0).exp().atan() - PI / 2.0);
    Ok(Coordinate::new(lng, lat))
}

/// Returns the WGS84 coordinate of `c` given in `from`.
///
/// DMS and UTM coordinates are already in WGS84 degrees once parsed,
/// so this is identity for them.
///
/// # Errors
///
/// See [`web_mercator_to_wgs84`].
pub fn to_wgs84(c: Coordinate, from: CoordinateSystem) -> Result<Coordinate> {
    match from {
        CoordinateSystem::Wgs84 | CoordinateSystem::Wgs84Dms | CoordinateSystem::Utm => Ok(c),
        CoordinateSystem::Gcj02 => Ok(gcj02_to_wgs84(c)),
        CoordinateSystem::Bd09 => Ok(bd09_to_wgs84(c)),
        CoordinateSystem::WebMercator => web_mercator_to_wgs84(c),
    }
}

/// Returns the coordinate in `to` of a WGS84 `c`.
///
/// # Errors
///
/// See [`wgs84_to_web_mercator`].
pub fn from_wgs84(c: Coordinate, to: CoordinateSystem) -> Result<Coordinate> {
    match to {
        CoordinateSystem::Wgs84 | CoordinateSystem::Wgs84Dms | CoordinateSystem::Utm => Ok(c),
        CoordinateSystem::Gcj02 => Ok(wgs84_to_gcj02(c)),
        CoordinateSystem::Bd09 => Ok(wgs84_to_bd09(c)),
        CoordinateSystem::WebMercator => wgs84_to_web_mercator(c),
    }
}

/// Converts `c` from `from` to `to`, through WGS84.
///
/// # Errors
///
/// If the Web Mercator projection is involved and fails.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// let bd = transform(
///     Coordinate::new(116.407387, 39.904179),
///     CoordinateSystem::Wgs84,
///     CoordinateSystem::Bd09,
/// )?;
/// assert!((bd.longitude - 116.420033).abs() < 1e-5);
/// assert!((bd.latitude - 39.911844).abs() < 1e-5);
/// # Ok::<(), coordtrans::Error>(())
/// ```
pub fn transform(c: Coordinate, from: CoordinateSystem, to: CoordinateSystem) -> Result<Coordinate> {
    if from == to {
        return Ok(c);
    }
    from_wgs84(to_wgs84(c, from)?, to)
}
