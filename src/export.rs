//! Provides JSON and CSV export of [`Conversion`].
//!
//! Only valid results are exported,
//! the CSV also omits batch lines with an error.
use std::io;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::{json, Value};

use crate::convert::{BatchRecord, Conversion, ConversionResult};
use crate::CoordinateSystem;

fn valid_results(results: &[ConversionResult]) -> impl Iterator<Item = &ConversionResult> {
    results.iter().filter(|r| r.valid)
}

fn json_results(results: &[ConversionResult]) -> Vec<Value> {
    valid_results(results)
        .map(|r| {
            json!({
                "system": r.system.id(),
                "systemName": r.system.name(),
                "coordinates": r.formatted_text,
            })
        })
        .collect()
}

/// Returns the JSON export of `conversion`.
///
/// `input` is the source text and `timestamp` the export time, e.g. ISO 8601,
/// both are written as is.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// # use coordtrans::export::to_json;
/// let conversion = convert_input("39.9042, 116.4074", CoordinateSystem::Wgs84)?;
/// let value = to_json(&conversion, CoordinateSystem::Wgs84, "39.9042, 116.4074", "2024-01-01T00:00:00.000Z");
///
/// assert_eq!(value["type"], "single");
/// assert_eq!(value["sourceSystem"], "wgs84");
/// assert_eq!(value["results"][0]["coordinates"], "39.904200, 116.407400");
/// # Ok::<(), Error>(())
/// ```
pub fn to_json(
    conversion: &Conversion,
    source_system: CoordinateSystem,
    input: &str,
    timestamp: &str,
) -> Value {
    match conversion {
        Conversion::Single { results, .. } => json!({
            "timestamp": timestamp,
            "sourceSystem": source_system.id(),
            "type": "single",
            "sourceCoordinates": input,
            "results": json_results(results),
        }),
        Conversion::Batch(report) => {
            let lines: Vec<_> = report
                .records
                .iter()
                .map(|record| {
                    json!({
                        "line": record.line_number,
                        "original": record.original_text,
                        "hasError": record.has_error,
                        "conversions": json_results(&record.results),
                    })
                })
                .collect();

            json!({
                "timestamp": timestamp,
                "sourceSystem": source_system.id(),
                "type": "batch",
                "totalLines": report.records.len(),
                "results": lines,
            })
        }
    }
}

/// Writes the CSV export of `conversion` into `wtr`.
///
/// Every cell is quoted, records end with `\n`.
///
/// # Errors
///
/// If writing to `wtr` fails.
pub fn write_csv<W: io::Write>(conversion: &Conversion, wtr: W) -> csv::Result<()> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(wtr);

    match conversion {
        Conversion::Single { results, .. } => {
            wtr.write_record(["System", "System Name", "Coordinates"])?;
            for r in valid_results(results) {
                wtr.write_record([r.system.id(), r.system.name(), r.formatted_text.as_str()])?;
            }
        }
        Conversion::Batch(report) => {
            wtr.write_record(["Line", "Original", "System", "System Name", "Coordinates"])?;
            for record in report.records.iter().filter(|r| !r.has_error) {
                write_batch_record(&mut wtr, record)?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

fn write_batch_record<W: io::Write>(wtr: &mut csv::Writer<W>, record: &BatchRecord) -> csv::Result<()> {
    let line = record.line_number.to_string();
    for r in valid_results(&record.results) {
        wtr.write_record([
            line.as_str(),
            record.original_text.as_str(),
            r.system.id(),
            r.system.name(),
            r.formatted_text.as_str(),
        ])?;
    }
    Ok(())
}

/// Returns the CSV export of `conversion`, see [`write_csv`].
///
/// ```
/// # use coordtrans::*;
/// # use coordtrans::export::to_csv;
/// let conversion = convert_input("39.9042, 116.4074", CoordinateSystem::Wgs84)?;
/// let text = to_csv(&conversion)?;
///
/// let mut lines = text.lines();
/// assert_eq!(lines.next(), Some(r#""System","System Name","Coordinates""#));
/// assert_eq!(lines.next(), Some(r#""wgs84","WGS84 (Decimal Degrees)","39.904200, 116.407400""#));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn to_csv(conversion: &Conversion) -> csv::Result<String> {
    let mut buf = Vec::new();
    write_csv(conversion, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Returns the download file name, `date` is e.g. `2024-01-01`.
///
/// ```
/// # use coordtrans::export::file_name;
/// assert_eq!(file_name("2024-01-01", "csv"), "coordinate-conversion-2024-01-01.csv");
/// ```
#[inline]
pub fn file_name(date: &str, extension: &str) -> String {
    format!("coordinate-conversion-{date}.{extension}")
}
