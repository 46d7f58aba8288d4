//! Provides the error type of this crate.
use std::fmt::{Display, Formatter};

/// Alias for a `Result<T, coordtrans::error::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents all possible errors that can occur by this crate.
#[derive(Debug, PartialEq)]
pub struct Error {
    pub err: Box<ErrorImpl>,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl Error {
    /// Returns a error kind.
    pub fn kind(&self) -> &ErrorImpl {
        &self.err
    }

    /// Returns `true` if the input text does not match any recognized convention.
    pub fn is_format(&self) -> bool {
        matches!(*self.err, ErrorImpl::Format { .. })
    }

    /// Returns `true` if a numeric value is outside of its valid domain.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            *self.err,
            ErrorImpl::OutOfRange { .. } | ErrorImpl::InvalidBoundingBox { .. }
        )
    }

    /// Returns `true` if a projection hits its singularity.
    pub fn is_numeric_domain(&self) -> bool {
        matches!(*self.err, ErrorImpl::NumericDomain { .. })
    }

    /// Returns `true` if a collaborating web service failed.
    pub fn is_external(&self) -> bool {
        matches!(*self.err, ErrorImpl::ExternalService { .. })
    }
}

impl Error {
    #[cold]
    pub(crate) fn new_format(input: &str, expected: Expected) -> Self {
        Self {
            err: Box::new(ErrorImpl::Format {
                input: input.to_string(),
                expected,
            }),
        }
    }

    #[cold]
    pub(crate) fn new_out_of_range(axis: Axis, value: f64) -> Self {
        let (low, high) = axis.bounds();
        Self {
            err: Box::new(ErrorImpl::OutOfRange {
                axis,
                value,
                low,
                high,
            }),
        }
    }

    #[cold]
    pub(crate) fn new_invalid_bbox(axis: Axis, min: f64, max: f64) -> Self {
        Self {
            err: Box::new(ErrorImpl::InvalidBoundingBox { axis, min, max }),
        }
    }

    #[cold]
    pub(crate) fn new_numeric_domain(operation: &'static str, value: f64) -> Self {
        Self {
            err: Box::new(ErrorImpl::NumericDomain { operation, value }),
        }
    }

    #[cold]
    pub(crate) fn new_invalid_geojson(reason: GeoJsonErrorKind) -> Self {
        Self {
            err: Box::new(ErrorImpl::InvalidGeoJson { reason }),
        }
    }

    #[cold]
    pub(crate) fn new_external(service: Service, status: Option<u16>, message: String) -> Self {
        Self {
            err: Box::new(ErrorImpl::ExternalService {
                service,
                status,
                message,
            }),
        }
    }

    #[cold]
    pub(crate) fn new_empty_input() -> Self {
        Self {
            err: Box::new(ErrorImpl::EmptyInput),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ErrorImpl {
    /// The input text does not match the expected convention.
    Format {
        /// Invalid data
        input: String,
        /// The convention tried
        expected: Expected,
    },
    /// Latitude or longitude out of its geographic range.
    OutOfRange {
        axis: Axis,
        value: f64,
        low: f64,
        high: f64,
    },
    /// The minimum is not less than the maximum.
    InvalidBoundingBox { axis: Axis, min: f64, max: f64 },
    /// Singularity of a projection, e.g. Mercator at the poles.
    NumericDomain {
        /// The failing operation
        operation: &'static str,
        /// The offending value
        value: f64,
    },
    InvalidGeoJson {
        reason: GeoJsonErrorKind,
    },
    /// Failure reported by (or while talking to) a web service.
    ExternalService {
        service: Service,
        /// HTTP status, if any
        status: Option<u16>,
        message: String,
    },
    /// Nothing but whitespace given.
    EmptyInput,
}

/// The convention which [`ErrorImpl::Format`] expected.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Expected {
    DecimalDegrees,
    DegreesMinutesSeconds,
    Utm,
    MercatorMeters,
    BoundingBox,
    SystemId,
}

impl Display for Expected {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Expected::DecimalDegrees => "coordinate, expected 'lat, lng'",
            Expected::DegreesMinutesSeconds => "DMS, expected 'D°M'S\"N, D°M'S\"E'",
            Expected::Utm => "UTM, expected '<zone><letter> <easting> <northing>'",
            Expected::MercatorMeters => "Web Mercator, expected 'x, y'",
            Expected::BoundingBox => {
                "bounding box, supported: array [minLng,minLat,maxLng,maxLat], \
                 GeoJSON with bbox, GeoJSON Polygon Feature, comma-separated values, \
                 space-separated values"
            }
            Expected::SystemId => "coordinate system id",
        };
        f.write_str(s)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Returns the inclusive geographic range of the axis.
    pub const fn bounds(&self) -> (f64, f64) {
        match self {
            Axis::Latitude => (-90.0, 90.0),
            Axis::Longitude => (-180.0, 180.0),
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        };
        f.write_str(s)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum GeoJsonErrorKind {
    /// Not parsable as JSON at all.
    Syntax(String),
    NotObject,
    MissingType,
    UnknownType(String),
}

impl Display for GeoJsonErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonErrorKind::Syntax(msg) => write!(f, "invalid JSON: {msg}"),
            GeoJsonErrorKind::NotObject => f.write_str("GeoJSON must be an object"),
            GeoJsonErrorKind::MissingType => f.write_str("GeoJSON must have a \"type\" property"),
            GeoJsonErrorKind::UnknownType(t) => write!(f, "invalid GeoJSON type: '{t}'"),
        }
    }
}

/// The web service collaborators.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Service {
    DeviceAuthorization,
    AccessToken,
    Gist,
}

impl Display for Service {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Service::DeviceAuthorization => "device authorization",
            Service::AccessToken => "access token",
            Service::Gist => "gist",
        };
        f.write_str(s)
    }
}

impl Display for ErrorImpl {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            ErrorImpl::Format { input, expected } => write!(f, "invalid {expected}: '{input}'"),
            ErrorImpl::OutOfRange {
                axis, low, high, ..
            } => write!(f, "invalid {axis}: must satisfy {low:?} <= and <= {high:?}"),
            ErrorImpl::InvalidBoundingBox { axis, .. } => {
                write!(f, "invalid bbox: min {axis} must be less than max {axis}")
            }
            ErrorImpl::NumericDomain { operation, value } => {
                write!(f, "{operation} is undefined at {value:?}")
            }
            ErrorImpl::InvalidGeoJson { reason } => write!(f, "{reason}"),
            ErrorImpl::ExternalService {
                service,
                status: Some(status),
                message,
            } => write!(f, "{service} failed ({status}): {message}"),
            ErrorImpl::ExternalService {
                service, message, ..
            } => write!(f, "{service} failed: {message}"),
            ErrorImpl::EmptyInput => f.write_str("please enter coordinates"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let e = Error::new_out_of_range(Axis::Latitude, 91.0);
        assert_eq!(
            e.to_string(),
            "invalid latitude: must satisfy -90.0 <= and <= 90.0"
        );
        assert!(e.is_out_of_range());
        assert!(!e.is_format());

        let e = Error::new_format("abc", Expected::MercatorMeters);
        assert_eq!(e.to_string(), "invalid Web Mercator, expected 'x, y': 'abc'");
        assert!(e.is_format());

        let e = Error::new_numeric_domain("Web Mercator projection", 90.0);
        assert_eq!(e.to_string(), "Web Mercator projection is undefined at 90.0");
        assert!(e.is_numeric_domain());

        let e = Error::new_external(Service::Gist, Some(401), "Invalid GitHub token".into());
        assert_eq!(e.to_string(), "gist failed (401): Invalid GitHub token");
        assert!(e.is_external());

        let e = Error::new_invalid_geojson(GeoJsonErrorKind::MissingType);
        assert_eq!(e.to_string(), "GeoJSON must have a \"type\" property");
    }
}
