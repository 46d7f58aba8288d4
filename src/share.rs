//! Provides the shareable URL state of the converter and the bounding box tool.
//!
//! Free text is percent-encoded twice, once as a value and again as a query value,
//! so that a link survives being pasted into another query string.
use log::warn;
use urlencoding::{decode, encode};

use crate::bbox::{BboxKind, BoundingBox};
use crate::convert::{convert_input, Conversion};
use crate::{Coordinate, CoordinateSystem, Result};

/// Appends `key=value` to `url`, encoding `value`.
fn push_param(url: &mut String, key: &str, value: &str) {
    if !url.is_empty() {
        url.push('&');
    }
    url.push_str(key);
    url.push('=');
    url.push_str(&encode(value));
}

/// Returns the decoded `(key, value)` pairs of `query`,
/// a leading `?` is ignored and `+` means a space.
///
/// A pair which is not valid UTF-8 after decoding is dropped.
fn query_pairs(query: &str) -> Vec<(String, String)> {
    let decode_component = |s: &str| -> Option<String> {
        decode(&s.replace('+', " ")).ok().map(|s| s.into_owned())
    };

    query
        .trim_start_matches('?')
        .split('&')
        .filter(|s| !s.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match (decode_component(key), decode_component(value)) {
                (Some(k), Some(v)) => Some((k, v)),
                _ => {
                    warn!("query parameter dropped: {pair}");
                    None
                }
            }
        })
        .collect()
}

fn find<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Returns the text from a value that was encoded before the query encoding.
fn decode_text(value: &str) -> Option<String> {
    decode(value).ok().map(|s| s.into_owned())
}

/// The state of the coordinate converter in a URL, `?coords=...&system=...`.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// # use coordtrans::share::ConverterShare;
/// let share = ConverterShare::new("39.9042, 116.4074", CoordinateSystem::Wgs84);
/// let url = share.to_url("https://example.com/coordinate-converter");
/// assert_eq!(
///     url,
///     "https://example.com/coordinate-converter?coords=39.9042%252C%2520116.4074&system=wgs84"
/// );
///
/// let query = url.split_once('?').unwrap().1;
/// assert_eq!(ConverterShare::from_query(query)?, Some(share));
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct ConverterShare {
    /// The input text, possibly multi-line.
    pub coords: String,
    pub system: CoordinateSystem,
}

impl ConverterShare {
    #[inline]
    pub fn new(coords: impl Into<String>, system: CoordinateSystem) -> Self {
        Self {
            coords: coords.into(),
            system,
        }
    }

    /// Returns the query string, without `?`.
    pub fn to_query(&self) -> String {
        let mut query = String::new();
        push_param(&mut query, "coords", &encode(&self.coords));
        push_param(&mut query, "system", self.system.id());
        query
    }

    /// Returns `base?query`.
    #[inline]
    pub fn to_url(&self, base: &str) -> String {
        format!("{base}?{}", self.to_query())
    }

    /// Restores from a query string.
    ///
    /// Returns [`None`] unless both `coords` and `system` are given.
    ///
    /// # Errors
    ///
    /// If `system` is not a known id.
    pub fn from_query(query: &str) -> Result<Option<Self>> {
        let pairs = query_pairs(query);
        let (Some(coords), Some(system)) = (find(&pairs, "coords"), find(&pairs, "system")) else {
            return Ok(None);
        };

        let Some(coords) = decode_text(coords) else {
            warn!("coords parameter is not valid UTF-8");
            return Ok(None);
        };

        Ok(Some(Self {
            coords,
            system: system.parse()?,
        }))
    }

    /// Converts the restored input, see [`convert_input`].
    ///
    /// # Errors
    ///
    /// See [`convert_input`].
    #[inline]
    pub fn convert(&self) -> Result<Conversion> {
        convert_input(&self.coords, self.system)
    }
}

/// A map viewport.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: f64,
}

/// The state of the bounding box tool in a URL,
/// `?bbox=...&type=drawn|preview&input=...&center=lng,lat&zoom=z`.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// # use coordtrans::bbox::BboxKind;
/// # use coordtrans::share::{BboxShare, MapView};
/// let share = BboxShare {
///     bbox: Some((BoundingBox::new(116.3, 39.8, 116.5, 40.0), BboxKind::Preview)),
///     input: Some("[116.3, 39.8, 116.5, 40.0]".to_string()),
///     view: Some(MapView { center: Coordinate::new(116.4, 39.9), zoom: 10.0 }),
/// };
///
/// let query = share.to_query();
/// assert!(query.starts_with("bbox=116.3%2C39.8%2C116.5%2C40&type=preview&input="));
/// assert!(query.ends_with("&center=116.400000%2C39.900000&zoom=10.00"));
///
/// assert_eq!(BboxShare::from_query(&query), share);
/// ```
#[derive(Debug, PartialEq, Clone, Default)]
pub struct BboxShare {
    pub bbox: Option<(BoundingBox, BboxKind)>,
    /// The preview input text, only kept with [`BboxKind::Preview`].
    pub input: Option<String>,
    pub view: Option<MapView>,
}

impl BboxShare {
    /// Returns the query string, without `?`.
    pub fn to_query(&self) -> String {
        let mut query = String::new();

        if let Some((bbox, kind)) = &self.bbox {
            push_param(&mut query, "bbox", &bbox.to_param());
            push_param(&mut query, "type", kind.as_str());
            if let (BboxKind::Preview, Some(input)) = (kind, &self.input) {
                push_param(&mut query, "input", &encode(input));
            }
        }

        if let Some(view) = &self.view {
            push_param(
                &mut query,
                "center",
                &format!("{:.6},{:.6}", view.center.longitude, view.center.latitude),
            );
            push_param(&mut query, "zoom", &format!("{:.2}", view.zoom));
        }

        query
    }

    /// Returns `base?query`, or `base` if nothing to share.
    pub fn to_url(&self, base: &str) -> String {
        let query = self.to_query();
        if query.is_empty() {
            base.to_string()
        } else {
            format!("{base}?{query}")
        }
    }

    /// Restores from a query string.
    ///
    /// A malformed parameter is ignored, e.g. `bbox` without exactly 4 numbers.
    /// The box is restored as a preview only if `type=preview` and `input` is given,
    /// otherwise as drawn.
    pub fn from_query(query: &str) -> Self {
        let pairs = query_pairs(query);

        let input = find(&pairs, "input").and_then(decode_text);

        let bbox = find(&pairs, "bbox").and_then(|s| {
            let bbox = BoundingBox::from_param(s);
            if bbox.is_none() {
                warn!("bbox parameter ignored: {s}");
            }
            bbox
        });

        let (bbox, input) = match (bbox, find(&pairs, "type"), input) {
            (Some(bbox), Some("preview"), Some(input)) => {
                (Some((bbox, BboxKind::Preview)), Some(input))
            }
            (Some(bbox), _, _) => (Some((bbox, BboxKind::Drawn)), None),
            (None, _, _) => (None, None),
        };

        let view = match (find(&pairs, "center"), find(&pairs, "zoom")) {
            (Some(center), Some(zoom)) => parse_view(center, zoom),
            _ => None,
        };

        Self { bbox, input, view }
    }
}

fn parse_view(center: &str, zoom: &str) -> Option<MapView> {
    let (lng, lat) = center.split_once(',')?;
    let lng = lng.trim().parse::<f64>().ok()?;
    let lat = lat.trim().parse::<f64>().ok()?;
    let zoom = zoom.trim().parse::<f64>().ok()?;
    [lng, lat, zoom]
        .iter()
        .all(|v| v.is_finite())
        .then(|| MapView {
            center: Coordinate::new(lng, lat),
            zoom,
        })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_converter_round_trip() {
        for (coords, system) in [
            ("39.9042, 116.4074", CoordinateSystem::Wgs84),
            ("39°54'15.12\"N, 116°24'26.64\"E", CoordinateSystem::Wgs84Dms),
            ("50T 447192.3 4417528.5", CoordinateSystem::Utm),
            ("39.9,116.4\n40.0,116.5", CoordinateSystem::Gcj02),
            ("a+b&c=d%20e", CoordinateSystem::WebMercator),
        ] {
            let share = ConverterShare::new(coords, system);
            let restored = ConverterShare::from_query(&share.to_query()).unwrap();
            assert_eq!(restored, Some(share), "{coords:?}");
        }
    }

    #[test]
    fn test_converter_from_browser() {
        // as URLSearchParams writes it, spaces are '+'
        let query = "?coords=39.9042%252C%2520116.4074&system=gcj02";
        let share = ConverterShare::from_query(query).unwrap().unwrap();
        assert_eq!(share.coords, "39.9042, 116.4074");
        assert_eq!(share.system, CoordinateSystem::Gcj02);

        let query = "coords=39.9%2C+116.4&system=wgs84";
        let share = ConverterShare::from_query(query).unwrap().unwrap();
        assert_eq!(share.coords, "39.9, 116.4");

        match share.convert().unwrap() {
            Conversion::Single { source, .. } => assert_eq!(source, Coordinate::new(116.4, 39.9)),
            Conversion::Batch(_) => panic!("expected single"),
        }
    }

    #[test]
    fn test_converter_missing() {
        assert_eq!(ConverterShare::from_query("").unwrap(), None);
        assert_eq!(ConverterShare::from_query("coords=1").unwrap(), None);
        assert_eq!(ConverterShare::from_query("system=wgs84").unwrap(), None);

        let err = ConverterShare::from_query("coords=1&system=epsg4326").unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn test_bbox_drawn() {
        let share = BboxShare {
            bbox: Some((BoundingBox::new(-1.5, -2.0, 3.25, 4.0), BboxKind::Drawn)),
            input: None,
            view: None,
        };
        assert_eq!(share.to_query(), "bbox=-1.5%2C-2%2C3.25%2C4&type=drawn");
        assert_eq!(BboxShare::from_query(&share.to_query()), share);

        // input is only kept with preview
        let share = BboxShare {
            input: Some("ignored".to_string()),
            ..share
        };
        assert!(!share.to_query().contains("input"));
    }

    #[test]
    fn test_bbox_from_query() {
        let share = BboxShare::from_query("bbox=1,2,3&center=0,0&zoom=2");
        assert_eq!(share.bbox, None);
        assert_eq!(
            share.view,
            Some(MapView {
                center: Coordinate::new(0.0, 0.0),
                zoom: 2.0
            })
        );

        // preview without input falls back to drawn
        let share = BboxShare::from_query("bbox=1,2,3,4&type=preview");
        assert_eq!(
            share.bbox,
            Some((BoundingBox::new(1.0, 2.0, 3.0, 4.0), BboxKind::Drawn))
        );

        let share = BboxShare::from_query("center=1,x&zoom=2");
        assert_eq!(share.view, None);
        let share = BboxShare::from_query("center=1,2");
        assert_eq!(share.view, None);

        assert_eq!(BboxShare::from_query(""), BboxShare::default());
        assert_eq!(BboxShare::default().to_url("https://example.com/bbox"), "https://example.com/bbox");
    }

    #[test]
    fn test_bbox_preview_input() {
        let input = r#"{"type": "Feature", "bbox": [1, 2, 3, 4]}"#;
        let share = BboxShare {
            bbox: Some((input.parse().unwrap(), BboxKind::Preview)),
            input: Some(input.to_string()),
            view: None,
        };
        let restored = BboxShare::from_query(&share.to_query());
        assert_eq!(restored, share);
        assert_eq!(
            restored.input.unwrap().parse::<BoundingBox>().unwrap(),
            BoundingBox::new(1.0, 2.0, 3.0, 4.0)
        );
    }
}
