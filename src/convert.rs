//! Provides the conversion driver, single and batch.
//!
//! A line goes through parse → pivot to WGS84 → format into every target.
//! A failure is localized into the line's [`BatchRecord`]
//! or the target's [`ConversionResult`], it never aborts the batch.
use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::format::format_wgs84;
use crate::parser::{parse_coordinate_line, parse_lines, ParsedBatch, ParsedLine, SkippedLine};
use crate::transform::to_wgs84;
use crate::{Coordinate, CoordinateSystem, Error, Result};

/// A conversion into one target system.
///
/// `formatted_text` is empty iff `valid` is `false`.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConversionResult {
    pub system: CoordinateSystem,
    /// The coordinate in `system`, [`None`] on failure.
    pub coordinate: Option<Coordinate>,
    pub formatted_text: String,
    pub valid: bool,
    pub error_message: Option<String>,
}

impl ConversionResult {
    fn success(system: CoordinateSystem, coordinate: Coordinate, text: String) -> Self {
        Self {
            system,
            coordinate: Some(coordinate),
            formatted_text: text,
            valid: true,
            error_message: None,
        }
    }

    fn failure(system: CoordinateSystem, error: &Error) -> Self {
        Self {
            system,
            coordinate: None,
            formatted_text: String::new(),
            valid: false,
            error_message: Some(error.to_string()),
        }
    }

    /// Returns `lng, lat` (or `x, y`) of the coordinate in the shortest notation,
    /// empty if invalid.
    ///
    /// ```
    /// # use coordtrans::*;
    /// let results = convert_coordinate(Coordinate::new(116.4074, 39.9042), CoordinateSystem::Wgs84);
    /// assert_eq!(results[0].coordinates_text(), "116.4074, 39.9042");
    /// ```
    pub fn coordinates_text(&self) -> String {
        self.coordinate
            .map(|c| format!("{}, {}", c.longitude, c.latitude))
            .unwrap_or_default()
    }
}

/// The conversions of one input line.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatchRecord {
    /// The 1-based line number in the input.
    pub line_number: usize,
    pub original_text: String,
    /// One per target, empty if `has_error`.
    pub results: Vec<ConversionResult>,
    /// `true` if the line failed as a whole, e.g. out-of-range.
    pub has_error: bool,
    pub error_message: Option<String>,
}

/// The state of a [`BatchConverter`] run.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BatchState {
    Idle,
    Parsing,
    Converting,
    /// Terminal, the records are in input order.
    Done,
    /// Terminal, no line could be parsed.
    Failed,
}

/// The outcome of [`BatchConverter::run`].
#[derive(Debug, PartialEq)]
pub struct BatchReport {
    /// The terminal state, [`BatchState::Done`] or [`BatchState::Failed`].
    pub state: BatchState,
    pub records: Vec<BatchRecord>,
    /// Lines skipped by parse failure.
    pub skipped: Vec<SkippedLine>,
}

impl BatchReport {
    /// Returns the number of lines skipped by parse failure.
    #[inline]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Returns the number of records without error.
    pub fn success_count(&self) -> usize {
        self.records.iter().filter(|r| !r.has_error).count()
    }
}

/// Returns the conversions of `wgs84` into each `targets`.
fn format_all(wgs84: &Coordinate, targets: &[CoordinateSystem]) -> Vec<ConversionResult> {
    targets
        .iter()
        .map(|&system| match format_wgs84(wgs84, system) {
            Ok(f) => ConversionResult::success(system, f.coordinate, f.text),
            Err(e) => {
                debug!("conversion into {system} failed: {e}");
                ConversionResult::failure(system, &e)
            }
        })
        .collect()
}

/// Converts `coord` in `from` into every system.
///
/// This never fails, a failure is encoded in the [`ConversionResult`]s.
/// This does not check the geographic range of `coord`.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// let results = convert_coordinate(Coordinate::new(116.4074, 39.9042), CoordinateSystem::Wgs84);
/// assert_eq!(results.len(), 6);
/// assert!(results.iter().all(|r| r.valid));
/// assert_eq!(results[0].formatted_text, "39.904200, 116.407400");
///
/// // Mercator fails at the pole but siblings do not
/// let results = convert_coordinate(Coordinate::new(0.0, 90.0), CoordinateSystem::Wgs84);
/// assert!(!results[5].valid);
/// assert!(results[0].valid);
/// ```
pub fn convert_coordinate(coord: Coordinate, from: CoordinateSystem) -> Vec<ConversionResult> {
    convert_coordinate_to(coord, from, &CoordinateSystem::ALL)
}

/// Converts `coord` in `from` into each `targets`, see [`convert_coordinate`].
pub fn convert_coordinate_to(
    coord: Coordinate,
    from: CoordinateSystem,
    targets: &[CoordinateSystem],
) -> Vec<ConversionResult> {
    match to_wgs84(coord, from) {
        Ok(wgs84) => format_all(&wgs84, targets),
        Err(e) => targets
            .iter()
            .map(|&system| ConversionResult::failure(system, &e))
            .collect(),
    }
}

/// Returns the WGS84 coordinate of a parsed `coord`,
/// checking the range when `from` is geographic.
fn pivot(coord: Coordinate, from: CoordinateSystem) -> Result<Coordinate> {
    if from.is_geographic() {
        coord.validate()?;
    }
    to_wgs84(coord, from)
}

/// The batch driver.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// let converter = BatchConverter::builder()
///     .source(CoordinateSystem::Wgs84)
///     .targets([CoordinateSystem::Gcj02, CoordinateSystem::WebMercator])
///     .build();
///
/// let report = converter.run("39.9,116.4\nnotacoord\n40.0,116.5");
/// assert_eq!(report.state, BatchState::Done);
/// assert_eq!(report.records.len(), 2);
/// assert_eq!(report.records[1].line_number, 3);
/// assert_eq!(report.records[1].results.len(), 2);
/// assert_eq!(report.skipped_count(), 1);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct BatchConverter {
    source: CoordinateSystem,
    targets: Vec<CoordinateSystem>,
}

impl BatchConverter {
    /// Makes a [`BatchConverterBuilder`].
    #[inline]
    pub fn builder() -> BatchConverterBuilder {
        BatchConverterBuilder::new()
    }

    /// Makes a [`BatchConverter`] from `source` into every system.
    #[inline]
    pub fn new(source: CoordinateSystem) -> Self {
        Self {
            source,
            targets: CoordinateSystem::ALL.to_vec(),
        }
    }

    #[inline]
    pub const fn source(&self) -> CoordinateSystem {
        self.source
    }

    #[inline]
    pub fn targets(&self) -> &[CoordinateSystem] {
        &self.targets
    }

    fn convert_line(&self, line: ParsedLine) -> BatchRecord {
        match pivot(line.coordinate, self.source) {
            Ok(wgs84) => BatchRecord {
                line_number: line.line_number,
                original_text: line.original,
                results: format_all(&wgs84, &self.targets),
                has_error: false,
                error_message: None,
            },
            Err(e) => {
                warn!("line {} has error: {}", line.line_number, e);
                BatchRecord {
                    line_number: line.line_number,
                    original_text: line.original,
                    results: Vec::new(),
                    has_error: true,
                    error_message: Some(e.to_string()),
                }
            }
        }
    }

    fn convert_parsed(&self, parsed: ParsedBatch) -> BatchReport {
        if parsed.is_empty() {
            debug!(
                "batch {:?} -> {:?}, {} line(s) skipped",
                BatchState::Parsing,
                BatchState::Failed,
                parsed.skipped_count()
            );
            return BatchReport {
                state: BatchState::Failed,
                records: Vec::new(),
                skipped: parsed.skipped,
            };
        }

        debug!(
            "batch {:?} -> {:?}, {} line(s)",
            BatchState::Parsing,
            BatchState::Converting,
            parsed.entries.len()
        );
        let records = parsed
            .entries
            .into_iter()
            .map(|line| self.convert_line(line))
            .collect();
        debug!("batch {:?} -> {:?}", BatchState::Converting, BatchState::Done);

        BatchReport {
            state: BatchState::Done,
            records,
            skipped: parsed.skipped,
        }
    }

    /// Converts `lines`, one coordinate per line.
    ///
    /// Blank lines are ignored and unparsable lines are skipped,
    /// see [`parse_lines`].
    pub fn run_lines<'a, I>(&self, lines: I) -> BatchReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        debug!("batch {:?} -> {:?}", BatchState::Idle, BatchState::Parsing);
        self.convert_parsed(parse_lines(lines, self.source))
    }

    /// Converts multi-line `text`, see [`BatchConverter::run_lines`].
    #[inline]
    pub fn run(&self, text: &str) -> BatchReport {
        self.run_lines(text.lines())
    }
}

/// The builder of [`BatchConverter`].
///
/// The source defaults to [`CoordinateSystem::Wgs84`].
/// The targets default to all systems, in [`CoordinateSystem::ALL`] order,
/// only if neither [`target`](Self::target) nor [`targets`](Self::targets) is called;
/// an explicitly empty target list is kept empty.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// let converter = BatchConverter::builder()
///     .source(CoordinateSystem::Bd09)
///     .target(CoordinateSystem::Wgs84)
///     .target(CoordinateSystem::Wgs84Dms)
///     .build();
///
/// assert_eq!(converter.source(), CoordinateSystem::Bd09);
/// assert_eq!(
///     converter.targets(),
///     &[CoordinateSystem::Wgs84, CoordinateSystem::Wgs84Dms]
/// );
///
/// let converter = BatchConverter::builder().build();
/// assert_eq!(converter.source(), CoordinateSystem::Wgs84);
/// assert_eq!(converter.targets(), &CoordinateSystem::ALL);
///
/// let converter = BatchConverter::builder().targets([]).build();
/// assert!(converter.targets().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct BatchConverterBuilder {
    source: Option<CoordinateSystem>,
    targets: Option<Vec<CoordinateSystem>>,
}

impl BatchConverterBuilder {
    /// Makes a [`BatchConverterBuilder`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the source system.
    #[inline]
    pub const fn source(mut self, source: CoordinateSystem) -> Self {
        self.source = Some(source);
        self
    }

    /// Adds a target system, duplicates are ignored.
    #[inline]
    pub fn target(mut self, target: CoordinateSystem) -> Self {
        let targets = self.targets.get_or_insert_with(Vec::new);
        if !targets.contains(&target) {
            targets.push(target);
        }
        self
    }

    /// Adds target systems.
    ///
    /// An empty `targets` still overrides the default of all systems.
    #[inline]
    pub fn targets(mut self, targets: impl IntoIterator<Item = CoordinateSystem>) -> Self {
        self.targets.get_or_insert_with(Vec::new);
        targets.into_iter().fold(self, Self::target)
    }

    /// Builds [`BatchConverter`].
    pub fn build(self) -> BatchConverter {
        BatchConverter {
            source: self.source.unwrap_or(CoordinateSystem::Wgs84),
            targets: self
                .targets
                .unwrap_or_else(|| CoordinateSystem::ALL.to_vec()),
        }
    }
}

/// Converts `lines` in `source` into each `targets`.
///
/// Returns one [`BatchRecord`] per parsed line, in input order.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// let records = convert(
///     &["39.9, 116.4", "", "91.0, 116.4"],
///     CoordinateSystem::Wgs84,
///     &[CoordinateSystem::Gcj02],
/// );
/// assert_eq!(records.len(), 2);
/// assert!(!records[0].has_error);
/// assert!(records[1].has_error);
/// assert_eq!(records[1].line_number, 3);
/// ```
pub fn convert(
    lines: &[&str],
    source: CoordinateSystem,
    targets: &[CoordinateSystem],
) -> Vec<BatchRecord> {
    BatchConverter::builder()
        .source(source)
        .targets(targets.iter().copied())
        .build()
        .run_lines(lines.iter().copied())
        .records
}

/// Converts multi-line `text` in `from` into every system.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// let records = convert_batch("39.9,116.4\nnotacoord\n40.0,116.5", CoordinateSystem::Wgs84);
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].line_number, 1);
/// assert_eq!(records[1].line_number, 3);
/// ```
pub fn convert_batch(text: &str, from: CoordinateSystem) -> Vec<BatchRecord> {
    BatchConverter::new(from).run(text).records
}

/// The outcome of [`convert_input`].
#[derive(Debug, PartialEq)]
pub enum Conversion {
    Single {
        /// The parsed coordinate in the source system.
        source: Coordinate,
        results: Vec<ConversionResult>,
    },
    Batch(BatchReport),
}

/// Converts `text` in `from` into every system,
/// as a batch if it has two or more non-blank lines.
///
/// # Errors
///
/// - If `text` is blank,
/// - single: if the line does not parse, or is out-of-range for a geographic system,
/// - batch: if no line parses, the first parse error.
///
/// # Example
///
/// ```
/// # use coordtrans::*;
/// match convert_input("39.9042, 116.4074", CoordinateSystem::Wgs84)? {
///     Conversion::Single { source, results } => {
///         assert_eq!(source, Coordinate::new(116.4074, 39.9042));
///         assert_eq!(results.len(), 6);
///     }
///     Conversion::Batch(_) => unreachable!(),
/// }
///
/// assert!(matches!(
///     convert_input("39.9,116.4\n40.0,116.5", CoordinateSystem::Wgs84)?,
///     Conversion::Batch(_)
/// ));
///
/// assert!(convert_input("  \n ", CoordinateSystem::Wgs84).is_err());
/// assert!(convert_input("91.0, 116.4", CoordinateSystem::Wgs84).is_err());
/// # Ok::<(), Error>(())
/// ```
pub fn convert_input(text: &str, from: CoordinateSystem) -> Result<Conversion> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    match (lines.next(), lines.next()) {
        (None, _) => Err(Error::new_empty_input()),
        (Some(line), None) => {
            let source = parse_coordinate_line(line, from)?;
            let wgs84 = pivot(source, from)?;
            Ok(Conversion::Single {
                source,
                results: format_all(&wgs84, &CoordinateSystem::ALL),
            })
        }
        (Some(_), Some(_)) => {
            let report = BatchConverter::new(from).run(text);
            match report.state {
                BatchState::Failed => Err(report
                    .skipped
                    .into_iter()
                    .next()
                    .map(|s| s.error)
                    .unwrap_or_else(Error::new_empty_input)),
                _ => Ok(Conversion::Batch(report)),
            }
        }
    }
}
