//! Provides GeoJSON validation and preview links of [geojson.io].
//!
//! A small document is inlined into the link,
//! a large one goes through a gist and the link refers to it.
//! This module builds the requests and reads the responses,
//! the transport is up to the caller.
//!
//! [geojson.io]: https://geojson.io
use log::debug;
use serde_json::{json, Value};
use urlencoding::{decode, encode};

use crate::error::{GeoJsonErrorKind, Service};
use crate::{Error, Result};

/// The `type`s accepted as GeoJSON.
pub const GEOJSON_TYPES: [&str; 9] = [
    "Feature",
    "FeatureCollection",
    "Point",
    "LineString",
    "Polygon",
    "MultiPoint",
    "MultiLineString",
    "MultiPolygon",
    "GeometryCollection",
];

/// Max size \[byte\] of the input inlined into a link.
pub const INLINE_LIMIT: usize = 8000;

/// The gist creation endpoint.
pub const GIST_ENDPOINT: &str = "https://api.github.com/gists";

const GIST_DESCRIPTION: &str = "GeoJSON data for visualization";
const DEFAULT_FILE_NAME: &str = "geojson_data.geojson";
const FILE_STEM_LIMIT: usize = 50;

/// Parses and checks `text` as GeoJSON.
///
/// It must be a JSON object whose `type` is one of [`GEOJSON_TYPES`],
/// the geometry itself is not checked.
///
/// # Errors
///
/// If `text` is not JSON, not an object, or has no (or unknown) `type`.
///
/// # Example
///
/// ```
/// # use coordtrans::geojson::validate_geojson;
/// let value = validate_geojson(r#"{"type": "Point", "coordinates": [116.4, 39.9]}"#)?;
/// assert_eq!(value["type"], "Point");
///
/// assert!(validate_geojson("[1, 2]").is_err());
/// assert!(validate_geojson(r#"{"type": "Circle"}"#).is_err());
/// # Ok::<(), coordtrans::Error>(())
/// ```
pub fn validate_geojson(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::new_invalid_geojson(GeoJsonErrorKind::Syntax(e.to_string())))?;

    let object = value
        .as_object()
        .ok_or_else(|| Error::new_invalid_geojson(GeoJsonErrorKind::NotObject))?;

    match object.get("type") {
        None | Some(Value::Null) => Err(Error::new_invalid_geojson(GeoJsonErrorKind::MissingType)),
        Some(Value::String(t)) if GEOJSON_TYPES.contains(&t.as_str()) => Ok(value),
        Some(Value::String(t)) => Err(Error::new_invalid_geojson(
            GeoJsonErrorKind::UnknownType(t.clone()),
        )),
        Some(t) => Err(Error::new_invalid_geojson(
            GeoJsonErrorKind::UnknownType(t.to_string()),
        )),
    }
}

/// Returns the name of the document, from `name`, `properties.name`
/// or the first feature's `properties.name`.
///
/// An empty name falls through to the next one.
pub fn document_name(geojson: &Value) -> Option<&str> {
    ["/name", "/properties/name", "/features/0/properties/name"]
        .into_iter()
        .find_map(|pointer| {
            geojson
                .pointer(pointer)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
}

/// Returns the gist file name of the document.
///
/// The name is restricted to `[A-Za-z0-9_-]`, others are replaced by `_`,
/// and truncated to 50 characters.
///
/// ```
/// # use serde_json::json;
/// # use coordtrans::geojson::gist_file_name;
/// let value = json!({"type": "FeatureCollection", "name": "Tokyo wards (2024)", "features": []});
/// assert_eq!(gist_file_name(&value), "Tokyo_wards__2024_.geojson");
///
/// let value = json!({"type": "Point", "coordinates": [0, 0]});
/// assert_eq!(gist_file_name(&value), "geojson_data.geojson");
/// ```
pub fn gist_file_name(geojson: &Value) -> String {
    match document_name(geojson) {
        Some(name) => {
            let stem: String = name
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                        c
                    } else {
                        '_'
                    }
                })
                .take(FILE_STEM_LIMIT)
                .collect();
            format!("{stem}.geojson")
        }
        None => DEFAULT_FILE_NAME.to_string(),
    }
}

/// Returns the link which has the document inline.
///
/// ```
/// # use serde_json::json;
/// # use coordtrans::geojson::inline_preview_url;
/// let url = inline_preview_url(&json!({"type": "Point", "coordinates": [1, 2]}));
/// assert_eq!(
///     url,
///     "https://geojson.io/#data=data:application/json,\
///      %7B%22type%22%3A%22Point%22%2C%22coordinates%22%3A%5B1%2C2%5D%7D"
/// );
/// ```
pub fn inline_preview_url(geojson: &Value) -> String {
    inline_url_of(&geojson.to_string())
}

fn inline_url_of(json_text: &str) -> String {
    format!(
        "https://geojson.io/#data=data:application/json,{}",
        encode(json_text)
    )
}

/// Returns the link which refers to a gist, `path` is `<owner>/<id>`.
#[inline]
pub fn gist_preview_url(path: &str) -> String {
    format!("https://geojson.io/#id=gist:{path}")
}

/// Where a preview link keeps the document.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum StorageMethod {
    /// Inline, unless the input is larger than [`INLINE_LIMIT`].
    #[default]
    Url,
    /// Always through a gist.
    Gist,
}

/// A gist creation request, `POST` [`GIST_ENDPOINT`] with `body`.
#[derive(Debug, PartialEq, Clone)]
pub struct GistRequest {
    pub file_name: String,
    /// The JSON body.
    pub body: Value,
    /// The `Authorization` header value, if a token is given.
    pub authorization: Option<String>,
}

impl GistRequest {
    /// Makes a public gist request of one file, the pretty-printed `geojson`.
    ///
    /// A blank `token` means an anonymous request.
    ///
    /// ```
    /// # use serde_json::json;
    /// # use coordtrans::geojson::GistRequest;
    /// let geojson = json!({"type": "Feature", "properties": {"name": "park"}, "geometry": null});
    /// let req = GistRequest::new(&geojson, " ghp_xxx ");
    ///
    /// assert_eq!(req.file_name, "park.geojson");
    /// assert_eq!(req.body["public"], true);
    /// assert_eq!(req.authorization.as_deref(), Some("token ghp_xxx"));
    ///
    /// let content = req.body["files"]["park.geojson"]["content"].as_str().unwrap();
    /// assert_eq!(serde_json::from_str::<serde_json::Value>(content).unwrap(), geojson);
    /// ```
    pub fn new(geojson: &Value, token: &str) -> Self {
        let file_name = gist_file_name(geojson);
        let content = serde_json::to_string_pretty(geojson).unwrap_or_else(|_| geojson.to_string());

        let body = json!({
            "description": GIST_DESCRIPTION,
            "public": true,
            "files": {
                file_name.as_str(): { "content": content },
            },
        });

        let token = token.trim();
        Self {
            file_name,
            body,
            authorization: (!token.is_empty()).then(|| format!("token {token}")),
        }
    }
}

/// Reads the gist creation response, returns `<owner>/<id>`.
///
/// # Errors
///
/// If `status` is not success, or `body` lacks `owner.login` or `id`.
///
/// ```
/// # use coordtrans::geojson::parse_gist_response;
/// let body = r#"{"id": "aa5a315d61ae9438b18d", "owner": {"login": "octocat"}}"#;
/// assert_eq!(parse_gist_response(201, body)?, "octocat/aa5a315d61ae9438b18d");
///
/// let err = parse_gist_response(401, "").unwrap_err();
/// assert_eq!(err.to_string(), "gist failed (401): Invalid GitHub token");
/// # Ok::<(), coordtrans::Error>(())
/// ```
pub fn parse_gist_response(status: u16, body: &str) -> Result<String> {
    let fail = |message: &str| Error::new_external(Service::Gist, Some(status), message.to_string());

    match status {
        200..=299 => (),
        401 => return Err(fail("Invalid GitHub token")),
        403 => {
            return Err(fail(
                "GitHub API rate limit exceeded. Please login with GitHub or provide a token.",
            ))
        }
        _ => return Err(fail("Failed to create Gist")),
    }

    let value: Value = serde_json::from_str(body).map_err(|e| fail(&e.to_string()))?;
    let owner = value.pointer("/owner/login").and_then(Value::as_str);
    let id = value.get("id").and_then(Value::as_str);
    match (owner, id) {
        (Some(owner), Some(id)) => Ok(format!("{owner}/{id}")),
        _ => Err(fail("unexpected response")),
    }
}

/// The next step to get a preview link.
#[derive(Debug, PartialEq, Clone)]
pub enum PreviewPlan {
    /// The link is ready.
    Inline(String),
    /// Create the gist, then [`parse_gist_response`] and [`gist_preview_url`].
    Gist(GistRequest),
}

/// Validates `text` and chooses inline or gist.
///
/// The gist is chosen when `text` is larger than [`INLINE_LIMIT`] bytes,
/// or `method` is [`StorageMethod::Gist`].
///
/// # Errors
///
/// See [`validate_geojson`].
///
/// # Example
///
/// ```
/// # use coordtrans::geojson::*;
/// let text = r#"{"type": "Point", "coordinates": [116.4, 39.9]}"#;
///
/// let plan = plan_preview(text, StorageMethod::Url, "")?;
/// assert!(matches!(plan, PreviewPlan::Inline(_)));
///
/// let plan = plan_preview(text, StorageMethod::Gist, "")?;
/// assert!(matches!(plan, PreviewPlan::Gist(_)));
/// # Ok::<(), coordtrans::Error>(())
/// ```
pub fn plan_preview(text: &str, method: StorageMethod, token: &str) -> Result<PreviewPlan> {
    let geojson = validate_geojson(text)?;

    if text.len() > INLINE_LIMIT || method == StorageMethod::Gist {
        debug!("preview through gist, {} bytes", text.len());
        Ok(PreviewPlan::Gist(GistRequest::new(&geojson, token)))
    } else {
        Ok(PreviewPlan::Inline(inline_preview_url(&geojson)))
    }
}

/// Resolves the `result` parameter of a redirect into a preview link.
///
/// `result` is the query-decoded value, which is percent-encoded once more;
/// `gist:<owner>/<id>` refers to a gist, otherwise it is the JSON text.
///
/// Returns [`None`] if it is not valid UTF-8 after decoding.
///
/// ```
/// # use coordtrans::geojson::resolve_redirect;
/// assert_eq!(
///     resolve_redirect("gist%3Aoctocat%2Faa5a315d").as_deref(),
///     Some("https://geojson.io/#id=gist:octocat/aa5a315d")
/// );
/// assert_eq!(
///     resolve_redirect("%7B%22type%22%3A%22Point%22%7D").as_deref(),
///     Some("https://geojson.io/#data=data:application/json,%7B%22type%22%3A%22Point%22%7D")
/// );
/// ```
pub fn resolve_redirect(result: &str) -> Option<String> {
    let decoded = decode(result).ok()?;
    match decoded.strip_prefix("gist:") {
        Some(path) => Some(gist_preview_url(path)),
        None => Some(inline_url_of(&decoded)),
    }
}
