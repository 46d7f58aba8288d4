//! # coordtrans
//!
//! Coordinate converter between WGS84, GCJ-02, BD-09, Web Mercator,
//! degrees-minutes-seconds and an approximate UTM notation.
//!
//! Every conversion goes through WGS84, so any pair of systems is supported.
//!
//! ```
//! use coordtrans::{transform, Coordinate, CoordinateSystem};
//!
//! # fn main() -> Result<(), coordtrans::Error> {
//! // Beijing in WGS84
//! let origin = Coordinate::new(116.4074, 39.9042);
//!
//! // Into GCJ-02, offset by a few hundred meters
//! let gcj02 = transform(origin, CoordinateSystem::Wgs84, CoordinateSystem::Gcj02)?;
//! assert!(gcj02.longitude - origin.longitude > 0.0);
//!
//! // and back, within the tolerance of the approximate inverse
//! let back = transform(gcj02, CoordinateSystem::Gcj02, CoordinateSystem::Wgs84)?;
//! assert!(back.max_abs_diff(&origin) < 1e-4);
//! # Ok(())}
//! ```
//!
//! Features:
//!
//! - Offset models of GCJ-02 ("Mars coordinates") and BD-09 (Baidu),
//!   identity outside China
//! - Parser and formatter of the textual conventions of each system
//! - Batch conversion which isolates a failure to its line
//! - Bounding box parsing (arrays, GeoJSON `bbox`/`Feature`/`Polygon`, separated numbers)
//! - Share URLs, GeoJSON preview links, and JSON/CSV export
//!
//! # Parsing, Converting and Formatting
//!
//! [`parse_coordinate_line`] reads one line in the convention of the source system,
//! [`convert_coordinate`] formats it in every system.
//!
//! ```
//! use coordtrans::{convert_coordinate, parse_coordinate_line, CoordinateSystem};
//!
//! # fn main() -> Result<(), coordtrans::Error> {
//! // Decimal degrees are written latitude first
//! let c = parse_coordinate_line("39.9042, 116.4074", CoordinateSystem::Wgs84)?;
//!
//! for result in convert_coordinate(c, CoordinateSystem::Wgs84) {
//!     // Prints e.g. wgs84_dms: 39°54'15.12"N, 116°24'26.64"E
//!     println!("{}: {}", result.system, result.formatted_text);
//! }
//! # Ok(())}
//! ```
//!
//! Multi-line input goes to [`BatchConverter`] (or [`convert_batch`]),
//! lines failing to parse are skipped, and out-of-range lines are flagged.
//!
//! ```
//! use coordtrans::{BatchConverter, BatchState, CoordinateSystem};
//!
//! let converter = BatchConverter::builder()
//!     .source(CoordinateSystem::Wgs84)
//!     .target(CoordinateSystem::Gcj02)
//!     .target(CoordinateSystem::WebMercator)
//!     .build();
//!
//! let report = converter.run("39.9,116.4\nnotacoord\n40.0,116.5");
//! assert_eq!(report.state, BatchState::Done);
//! assert_eq!(report.records.len(), 2);
//! assert_eq!(report.skipped_count(), 1);
//! ```
//!
//! # Serialization and Deserialization
//!
//! It supports (de)serialization by [`serde` crate](https://crates.io/crates/serde)
//! for the value types, e.g. [`Coordinate`] and [`ConversionResult`],
//! only if the feature `serde` is enabled.
//!
//! ```
//! # #[cfg(feature = "serde")]
//! # fn main() -> serde_json::Result<()> {
//! use coordtrans::{Coordinate, CoordinateSystem};
//!
//! let json = serde_json::to_string(&Coordinate::new(116.4074, 39.9042))?;
//! assert_eq!(json, r#"{"longitude":116.4074,"latitude":39.9042}"#);
//!
//! let system: CoordinateSystem = serde_json::from_str(r#""web_mercator""#)?;
//! assert_eq!(system, CoordinateSystem::WebMercator);
//! # Ok(())}
//! # #[cfg(not(feature = "serde"))]
//! # fn main() {}
//! ```

#[doc(inline)]
pub use bbox::BoundingBox;
#[doc(inline)]
pub use convert::{
    convert, convert_batch, convert_coordinate, convert_coordinate_to, convert_input,
    BatchConverter, BatchConverterBuilder, BatchRecord, BatchReport, BatchState, Conversion,
    ConversionResult,
};
#[doc(inline)]
pub use coordinate::{Coordinate, Offset};
#[doc(inline)]
pub use error::{Error, ErrorImpl, Result};
#[doc(inline)]
pub use parser::parse_coordinate_line;
#[doc(inline)]
pub use system::{CoordinateSystem, FormatKind};
#[doc(inline)]
pub use transform::transform;

pub mod bbox;
pub mod convert;
pub mod coordinate;
pub mod device;
pub mod dms;
pub mod error;
pub mod export;
pub mod format;
pub mod geojson;
pub mod parser;
pub mod share;
pub mod system;
pub mod transform;
pub mod utm;
