//! Provides [`BoundingBox`], its parser and metrics.
use std::f64::consts::PI;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Axis, Expected};
use crate::{Coordinate, Error, Result};

/// The radius \[km\] of the sphere on which [`Dimensions`] are measured.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Represents a bounding box, `[minLng, minLat, maxLng, maxLat]` \[deg\].
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// let bbox: BoundingBox = "116.3, 39.8, 116.5, 40.0".parse()?;
/// bbox.validate()?;
///
/// assert_eq!(bbox, BoundingBox::new(116.3, 39.8, 116.5, 40.0));
/// assert_eq!(bbox.to_string(), "[116.300000, 39.800000, 116.500000, 40.000000]");
///
/// let center = bbox.center();
/// assert!((center.longitude - 116.4).abs() < 1e-12);
/// assert!((center.latitude - 39.9).abs() < 1e-12);
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

/// The approximate size of a [`BoundingBox`].
#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimensions {
    /// East-west extent \[km\] at the center latitude.
    pub width: f64,
    /// North-south extent \[km\].
    pub height: f64,
}

impl Dimensions {
    /// Returns `width * height` \[km²\].
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// How a [`BoundingBox`] was made.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BboxKind {
    /// Drawn on the map.
    Drawn,
    /// Parsed from text input.
    Preview,
}

impl BboxKind {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Drawn => "drawn",
            Self::Preview => "preview",
        }
    }
}

/// Returns a finite number from a JSON number or a numeric string.
fn json_number(v: &Value) -> Option<f64> {
    let x = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    };
    x.filter(|x| x.is_finite())
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}

fn from_first_four(values: [Option<f64>; 4]) -> Option<BoundingBox> {
    match values {
        [Some(min_lng), Some(min_lat), Some(max_lng), Some(max_lat)] => {
            Some(BoundingBox::new(min_lng, min_lat, max_lng, max_lat))
        }
        _ => None,
    }
}

fn from_json_array(array: &[Value]) -> Option<BoundingBox> {
    if array.len() < 4 {
        return None;
    }
    from_first_four([
        json_number(&array[0]),
        json_number(&array[1]),
        json_number(&array[2]),
        json_number(&array[3]),
    ])
}

fn from_polygon_feature(value: &Value) -> Option<BoundingBox> {
    if value.get("type")?.as_str()? != "Feature" {
        return None;
    }
    let geometry = value.get("geometry")?;
    if geometry.get("type")?.as_str()? != "Polygon" {
        return None;
    }

    let ring = geometry.get("coordinates")?.get(0)?.as_array()?;
    if ring.len() < 4 {
        return None;
    }

    let mut bbox = BoundingBox::new(
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    );
    for position in ring {
        let lng = json_number(position.get(0)?)?;
        let lat = json_number(position.get(1)?)?;
        bbox.min_lng = bbox.min_lng.min(lng);
        bbox.min_lat = bbox.min_lat.min(lat);
        bbox.max_lng = bbox.max_lng.max(lng);
        bbox.max_lat = bbox.max_lat.max(lat);
    }
    Some(bbox)
}

fn from_json(value: &Value) -> Option<BoundingBox> {
    // (a) an object with bbox member
    if let Some(bbox) = value
        .get("bbox")
        .and_then(Value::as_array)
        .and_then(|a| from_json_array(a))
    {
        return Some(bbox);
    }

    // (b) a Polygon Feature
    if let Some(bbox) = from_polygon_feature(value) {
        return Some(bbox);
    }

    // (c) a bare array
    value.as_array().and_then(|a| from_json_array(a))
}

fn from_separated<'a>(tokens: impl Iterator<Item = &'a str>) -> Option<BoundingBox> {
    let tokens: Vec<_> = tokens.map(str::trim).filter(|s| !s.is_empty()).collect();
    if tokens.len() < 4 {
        return None;
    }
    from_first_four([
        parse_number(tokens[0]),
        parse_number(tokens[1]),
        parse_number(tokens[2]),
        parse_number(tokens[3]),
    ])
}

impl FromStr for BoundingBox {
    type Err = Error;

    /// Makes a [`BoundingBox`] from text.
    ///
    /// The first matching one wins:
    ///
    /// 1. a JSON object with `bbox` array of 4 or more numbers,
    /// 2. a GeoJSON `Feature` of `Polygon`, the extent of the outer ring,
    /// 3. a JSON array of 4 or more numbers,
    /// 4. 4 or more comma-separated numbers,
    /// 5. 4 or more whitespace-separated numbers.
    ///
    /// Only the first 4 numbers are used, as `minLng, minLat, maxLng, maxLat`.
    /// This does not validate the result, see [`BoundingBox::validate`].
    ///
    /// # Errors
    ///
    /// If none of them matches.
    ///
    /// # Example
    ///
    /// ```
    /// # use coordtrans::*;
    /// let expected = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
    /// for s in [
    ///     r#"{"type": "FeatureCollection", "bbox": [1, 2, 3, 4], "features": []}"#,
    ///     "[1, 2, 3, 4]",
    ///     "1,2,3,4",
    ///     "1 2\t3\n4",
    /// ] {
    ///     assert_eq!(s.parse::<BoundingBox>()?, expected);
    /// }
    /// # Ok::<(), Error>(())
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();

        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            if let Some(bbox) = from_json(&value) {
                return Ok(bbox);
            }
        }

        from_separated(trimmed.split(','))
            .or_else(|| from_separated(trimmed.split_whitespace()))
            .ok_or_else(|| Error::new_format(s, Expected::BoundingBox))
    }
}

impl Display for BoundingBox {
    /// `[minLng, minLat, maxLng, maxLat]` with 6 decimal places.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}, {:.6}, {:.6}]",
            self.min_lng, self.min_lat, self.max_lng, self.max_lat
        )
    }
}

impl BoundingBox {
    /// Makes a [`BoundingBox`], this does not validate it.
    #[inline]
    pub const fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    /// Checks that the minimums are less than the maximums,
    /// and all of them are in the geographic range.
    ///
    /// # Errors
    ///
    /// If min >= max (or NaN) on either axis, or a value is out-of-range.
    ///
    /// # Example
    ///
    /// ```
    /// # use coordtrans::*;
    /// assert!(BoundingBox::new(-180.0, -90.0, 180.0, 90.0).validate().is_ok());
    /// assert!(BoundingBox::new(3.0, 2.0, 1.0, 4.0).validate().is_err());
    /// assert!(BoundingBox::new(1.0, 2.0, 3.0, 95.0).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if !(self.min_lng < self.max_lng) {
            return Err(Error::new_invalid_bbox(
                Axis::Longitude,
                self.min_lng,
                self.max_lng,
            ));
        }
        if !(self.min_lat < self.max_lat) {
            return Err(Error::new_invalid_bbox(
                Axis::Latitude,
                self.min_lat,
                self.max_lat,
            ));
        }

        Coordinate::new(self.min_lng, self.min_lat).validate()?;
        Coordinate::new(self.max_lng, self.max_lat).validate()
    }

    /// Returns the center.
    #[inline]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lng + self.max_lng) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Returns the approximate size on the sphere of radius [`EARTH_RADIUS_KM`].
    ///
    /// The width is measured along the center latitude.
    ///
    /// ```
    /// # use coordtrans::*;
    /// let dim = BoundingBox::new(0.0, -0.5, 1.0, 0.5).dimensions();
    /// assert!((dim.width - 111.19).abs() < 0.01);
    /// assert!((dim.height - 111.19).abs() < 0.01);
    /// assert!((dim.area() - 12364.31).abs() < 0.01);
    /// ```
    pub fn dimensions(&self) -> Dimensions {
        let to_rad = |deg: f64| deg * PI / 180.0;
        let center = self.center();

        let width = EARTH_RADIUS_KM * to_rad(self.max_lng - self.min_lng) * to_rad(center.latitude).cos();
        let height = EARTH_RADIUS_KM * to_rad(self.max_lat - self.min_lat);

        Dimensions {
            width: width.abs(),
            height: height.abs(),
        }
    }

    /// Returns a GeoJSON `Feature` of the closed `Polygon` ring,
    /// counter-clockwise from the south-west corner.
    ///
    /// ```
    /// # use coordtrans::*;
    /// # use coordtrans::bbox::BboxKind;
    /// let feature = BoundingBox::new(1.0, 2.0, 3.0, 4.0).to_feature(BboxKind::Preview);
    /// assert_eq!(feature["properties"]["type"], "preview");
    /// assert_eq!(feature["geometry"]["coordinates"][0].as_array().unwrap().len(), 5);
    ///
    /// // it parses back
    /// let bbox: BoundingBox = feature.to_string().parse()?;
    /// assert_eq!(bbox, BoundingBox::new(1.0, 2.0, 3.0, 4.0));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn to_feature(&self, kind: BboxKind) -> Value {
        json!({
            "type": "Feature",
            "properties": { "type": kind.as_str() },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [self.min_lng, self.min_lat],
                    [self.max_lng, self.min_lat],
                    [self.max_lng, self.max_lat],
                    [self.min_lng, self.max_lat],
                    [self.min_lng, self.min_lat],
                ]],
            },
        })
    }

    /// Returns `minLng,minLat,maxLng,maxLat` in the shortest notation.
    pub fn to_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lng, self.min_lat, self.max_lng, self.max_lat
        )
    }

    /// Makes a [`BoundingBox`] from `minLng,minLat,maxLng,maxLat`.
    ///
    /// Returns [`None`] unless it has exactly 4 finite numbers.
    pub fn from_param(s: &str) -> Option<Self> {
        let values: Vec<_> = s.split(',').map(parse_number).collect();
        match values[..] {
            [Some(a), Some(b), Some(c), Some(d)] => Some(Self::new(a, b, c, d)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const EXPECTED: BoundingBox = BoundingBox::new(116.3, 39.8, 116.5, 40.0);

    #[test]
    fn test_json_bbox() {
        let s = r#"{"type": "Feature", "bbox": [116.3, 39.8, 116.5, 40.0, 10.0], "geometry": null}"#;
        assert_eq!(s.parse::<BoundingBox>().unwrap(), EXPECTED);

        let s = r#"{"bbox": ["116.3", "39.8", "116.5", "40.0"]}"#;
        assert_eq!(s.parse::<BoundingBox>().unwrap(), EXPECTED);

        // the bbox member wins over the geometry
        let s = r#"{
            "type": "Feature",
            "bbox": [116.3, 39.8, 116.5, 40.0],
            "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]}
        }"#;
        assert_eq!(s.parse::<BoundingBox>().unwrap(), EXPECTED);

        // too short bbox falls through to the geometry
        let s = r#"{
            "type": "Feature",
            "bbox": [116.3, 39.8],
            "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]}
        }"#;
        assert_eq!(
            s.parse::<BoundingBox>().unwrap(),
            BoundingBox::new(0.0, 0.0, 1.0, 1.0)
        );
    }

    #[test]
    fn test_polygon_feature() {
        let s = r#"{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[116.5, 39.8], [116.3, 39.9], [116.4, 40.0], [116.5, 39.8]],
                    [[0, 0], [200, 0], [0, 100], [0, 0]]
                ]
            }
        }"#;
        assert_eq!(s.parse::<BoundingBox>().unwrap(), EXPECTED);

        // a ring of 3 is not a polygon
        let s = r#"{"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [0, 0]]]}}"#;
        assert!(s.parse::<BoundingBox>().unwrap_err().is_format());

        let s = r#"{"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]}}"#;
        assert!(s.parse::<BoundingBox>().unwrap_err().is_format());
    }

    #[test]
    fn test_array() {
        assert_eq!(
            "[116.3, 39.8, 116.5, 40.0, 99]".parse::<BoundingBox>().unwrap(),
            EXPECTED
        );
        assert_eq!(
            "  [116.3,39.8,116.5,40] ".parse::<BoundingBox>().unwrap(),
            EXPECTED
        );
    }

    #[test]
    fn test_separated() {
        assert_eq!(
            "116.3, 39.8, 116.5, 40.0".parse::<BoundingBox>().unwrap(),
            EXPECTED
        );
        assert_eq!(
            "116.3,,39.8,116.5,40.0,".parse::<BoundingBox>().unwrap(),
            EXPECTED
        );
        assert_eq!(
            "116.3 39.8 116.5 40.0 1 2".parse::<BoundingBox>().unwrap(),
            EXPECTED
        );
        assert_eq!(
            "116.3\n39.8\n116.5\n40.0".parse::<BoundingBox>().unwrap(),
            EXPECTED
        );
    }

    #[test]
    fn test_error() {
        for s in [
            "",
            "[1, 2, 3]",
            "1, 2, 3",
            "1 2 3",
            "a, b, c, d",
            "1, 2, 3, inf",
            r#"{"bbox": [1, 2, "x", 4]}"#,
            r#"{"type": "FeatureCollection", "features": []}"#,
        ] {
            let err = s.parse::<BoundingBox>().unwrap_err();
            assert!(err.is_format(), "{s:?}");
            assert!(err.to_string().contains("supported"), "{s:?}");
        }
    }

    #[test]
    fn test_validate() {
        assert!(EXPECTED.validate().is_ok());

        let err = BoundingBox::new(116.5, 39.8, 116.3, 40.0).validate().unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::ErrorImpl::InvalidBoundingBox {
                axis: Axis::Longitude,
                ..
            }
        ));

        let err = BoundingBox::new(116.3, 40.0, 116.5, 40.0).validate().unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::ErrorImpl::InvalidBoundingBox {
                axis: Axis::Latitude,
                ..
            }
        ));

        let err = BoundingBox::new(-181.0, 0.0, 0.0, 1.0).validate().unwrap_err();
        assert!(err.is_out_of_range());

        let err = BoundingBox::new(f64::NAN, 0.0, 0.0, 1.0).validate().unwrap_err();
        assert!(err.is_out_of_range());
    }

    #[test]
    fn test_dimensions() {
        let dim = EXPECTED.dimensions();
        // 0.2 deg at 39.9N
        let expected_width = 6371.0 * 0.2 * PI / 180.0 * (39.9 * PI / 180.0).cos();
        assert!((dim.width - expected_width).abs() < 1e-9);
        assert!((dim.height - 6371.0 * 0.2 * PI / 180.0).abs() < 1e-9);
        assert!((dim.area() - dim.width * dim.height).abs() < 1e-12);
    }

    #[test]
    fn test_param() {
        assert_eq!(EXPECTED.to_param(), "116.3,39.8,116.5,40");
        assert_eq!(BoundingBox::from_param(&EXPECTED.to_param()), Some(EXPECTED));

        for s in ["", "1,2,3", "1,2,3,4,5", "1,2,3,x", "1,,2,3,4"] {
            assert_eq!(BoundingBox::from_param(s), None, "{s:?}");
        }
    }
}
