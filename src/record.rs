//! Record sources, sinks and the read/load drivers
//!
//! A [`RecordSource`] hands over one wire-form geometry per row and a
//! [`RecordSink`] persists one per row. Connections, statements and fetch
//! mechanics live behind these traits; the drivers here only run the codec
//! and report on each row.
//!
//! # Example
//!
//! ```rust
//! use oracle_sdo::record::{load_geometries, read_geometries, ImageSink, ImageSource};
//! use oracle_sdo::{Config, PrintLevel};
//!
//! let mut sink = ImageSink::new();
//! let input = "1 2 2 10 20 30 40\n2 1 2 12.5 45\n";
//! let loaded = load_geometries(input.as_bytes(), &mut sink)?;
//! assert_eq!(loaded.rows_loaded, 2);
//!
//! let mut source = ImageSource::new(sink.into_rows().into_iter().map(|(_, image)| image));
//! let mut out = Vec::new();
//! let config = Config::new().print_level(PrintLevel::Silent);
//! let summary = read_geometries(&mut source, &config, &mut out)?;
//! assert_eq!(summary.rows, 2);
//! assert_eq!(summary.fetches, 1);
//! # Ok::<(), oracle_sdo::Error>(())
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::io::{BufRead, Write};

use bytes::Bytes;

use crate::codec;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::printer::{print_geometry, print_point, PrintLevel};
use crate::text::{TextReader, TextRecord};
use crate::types;
use crate::wire::WireGeometry;

// =============================================================================
// Collaborator traits
// =============================================================================

/// Supplies wire-form geometries, one per row
pub trait RecordSource {
    /// Fetch the next row
    ///
    /// Returns `Ok(None)` at end of data. An image error concerns the current
    /// row only and the source must have moved past it; any other error ends
    /// the fetch.
    fn fetch(&mut self) -> Result<Option<WireGeometry>>;

    /// Fetch up to `max` rows
    ///
    /// Row-level image errors are returned in place so the other rows of the
    /// batch are unaffected. A batch shorter than `max` is the last one.
    fn fetch_batch(&mut self, max: usize) -> Result<Vec<Result<WireGeometry>>> {
        let mut rows = Vec::with_capacity(max);
        while rows.len() < max {
            match self.fetch() {
                Ok(Some(row)) => rows.push(Ok(row)),
                Ok(None) => break,
                Err(e) if e.is_image_error() => rows.push(Err(e)),
                Err(e) => return Err(e),
            }
        }
        Ok(rows)
    }
}

/// Persists wire-form geometries, one per row
pub trait RecordSink {
    /// Store one row under the caller-assigned `id`
    fn store(&mut self, id: i64, geometry: &WireGeometry) -> Result<()>;
}

impl<S: RecordSource + ?Sized> RecordSource for &mut S {
    fn fetch(&mut self) -> Result<Option<WireGeometry>> {
        (**self).fetch()
    }

    fn fetch_batch(&mut self, max: usize) -> Result<Vec<Result<WireGeometry>>> {
        (**self).fetch_batch(max)
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn store(&mut self, id: i64, geometry: &WireGeometry) -> Result<()> {
        (**self).store(id, geometry)
    }
}

// =============================================================================
// In-memory collaborators
// =============================================================================

/// Source over wire-form values held in memory
#[derive(Debug, Default)]
pub struct MemorySource {
    rows: VecDeque<WireGeometry>,
}

impl MemorySource {
    /// Create a source yielding `rows` in order
    pub fn new(rows: impl IntoIterator<Item = WireGeometry>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
        }
    }

    /// Number of rows not yet fetched
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl RecordSource for MemorySource {
    fn fetch(&mut self) -> Result<Option<WireGeometry>> {
        Ok(self.rows.pop_front())
    }

    fn fetch_batch(&mut self, max: usize) -> Result<Vec<Result<WireGeometry>>> {
        let n = max.min(self.rows.len());
        Ok(self.rows.drain(..n).map(Ok).collect())
    }
}

/// Source over binary SDO_GEOMETRY images, decoded as they are fetched
///
/// An empty image is a NULL column value.
#[derive(Debug, Default)]
pub struct ImageSource {
    images: VecDeque<Bytes>,
}

impl ImageSource {
    /// Create a source yielding one row per image
    pub fn new(images: impl IntoIterator<Item = Bytes>) -> Self {
        Self {
            images: images.into_iter().collect(),
        }
    }
}

impl RecordSource for ImageSource {
    fn fetch(&mut self) -> Result<Option<WireGeometry>> {
        match self.images.pop_front() {
            Some(image) => types::decode_geometry(&image).map(Some),
            None => Ok(None),
        }
    }
}

/// Sink keeping wire-form values in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Vec<(i64, WireGeometry)>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows stored so far
    pub fn rows(&self) -> &[(i64, WireGeometry)] {
        &self.rows
    }

    /// Take the stored rows
    pub fn into_rows(self) -> Vec<(i64, WireGeometry)> {
        self.rows
    }
}

impl RecordSink for MemorySink {
    fn store(&mut self, id: i64, geometry: &WireGeometry) -> Result<()> {
        self.rows.push((id, geometry.clone()));
        Ok(())
    }
}

/// Sink encoding each row to a binary SDO_GEOMETRY image
#[derive(Debug, Default)]
pub struct ImageSink {
    rows: Vec<(i64, Bytes)>,
}

impl ImageSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows stored so far
    pub fn rows(&self) -> &[(i64, Bytes)] {
        &self.rows
    }

    /// Take the stored rows
    pub fn into_rows(self) -> Vec<(i64, Bytes)> {
        self.rows
    }
}

impl RecordSink for ImageSink {
    fn store(&mut self, id: i64, geometry: &WireGeometry) -> Result<()> {
        let image = types::encode_geometry(geometry)?;
        self.rows.push((id, image));
        Ok(())
    }
}

// =============================================================================
// Drivers
// =============================================================================

/// Outcome of [`read_geometries`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadSummary {
    /// Rows fetched
    pub rows: usize,
    /// Fetch calls made, including the final short one
    pub fetches: usize,
    /// Rows whose geometry was NULL
    pub nulls: usize,
    /// Rows that failed to decode
    pub failed: usize,
}

impl fmt::Display for ReadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows fetched in {} fetches", self.rows, self.fetches)
    }
}

/// Outcome of [`load_geometries`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Rows stored in the sink
    pub rows_loaded: usize,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows loaded", self.rows_loaded)
    }
}

/// Fetch, decode and print every row of `source`
///
/// Rows are fetched `config.array_size` at a time. Each row is decoded on its
/// own; a row that fails is logged, counted in [`ReadSummary::failed`] and
/// skipped. NULL geometries are counted but not printed. The summary line is
/// written to `out` at the end.
pub fn read_geometries<S, W>(source: &mut S, config: &Config, out: &mut W) -> Result<ReadSummary>
where
    S: RecordSource + ?Sized,
    W: Write + ?Sized,
{
    read_rows(source, config, out, |out, geometry, row| {
        print_geometry(out, geometry, row, config.print_level)
    })
}

/// Fetch every row of `source` and print only the inline points
///
/// Each row with an inline point is written as `row: (x, y)`; rows stored
/// without one are passed over. Fetching, skipping and the summary line work
/// as in [`read_geometries`]. [`PrintLevel::Silent`] suppresses the point
/// lines.
pub fn read_points<S, W>(source: &mut S, config: &Config, out: &mut W) -> Result<ReadSummary>
where
    S: RecordSource + ?Sized,
    W: Write + ?Sized,
{
    read_rows(source, config, out, |out, geometry, row| {
        if config.print_level == PrintLevel::Silent {
            return Ok(());
        }
        if !print_point(out, geometry, row)? {
            tracing::debug!(row, gtype = geometry.gtype, "No inline point");
        }
        Ok(())
    })
}

/// Array fetch loop shared by the read drivers
fn read_rows<S, W, F>(
    source: &mut S,
    config: &Config,
    out: &mut W,
    mut report: F,
) -> Result<ReadSummary>
where
    S: RecordSource + ?Sized,
    W: Write + ?Sized,
    F: FnMut(&mut W, &Geometry, usize) -> Result<()>,
{
    let options = config.decode_options();
    let array_size = config.array_size.max(1);
    let mut summary = ReadSummary::default();

    loop {
        let batch = source.fetch_batch(array_size)?;
        summary.fetches += 1;
        let batch_len = batch.len();
        tracing::debug!(fetch = summary.fetches, rows = batch_len, "Fetched batch");

        for row in batch {
            summary.rows += 1;
            let row_number = summary.rows;

            match row.and_then(|wire| codec::decode_with(&wire, &options)) {
                Ok(Some(geometry)) => report(&mut *out, &geometry, row_number)?,
                Ok(None) => {
                    tracing::debug!(row = row_number, "NULL geometry");
                    summary.nulls += 1;
                }
                Err(e) => {
                    tracing::warn!(row = row_number, error = %e, "Skipping row");
                    summary.failed += 1;
                }
            }
        }

        if batch_len < array_size {
            break;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", summary)?;
    Ok(summary)
}

/// Parse the text ingestion format and store every record in `sink`
///
/// Geometries get SRID 0; use [`load_records`] with a configured
/// [`TextReader`] for anything else.
pub fn load_geometries<R, S>(input: R, sink: &mut S) -> Result<LoadSummary>
where
    R: BufRead,
    S: RecordSink + ?Sized,
{
    load_records(TextReader::new(input), sink)
}

/// Encode and store parsed records, stopping at the first error
///
/// A record that cannot be encoded fails as [`Error::Parse`] on its line.
pub fn load_records<I, S>(records: I, sink: &mut S) -> Result<LoadSummary>
where
    I: IntoIterator<Item = Result<TextRecord>>,
    S: RecordSink + ?Sized,
{
    let mut summary = LoadSummary::default();
    for record in records {
        let record = record?;
        let wire = codec::encode(&record.geometry).map_err(|e| Error::Parse {
            line: record.line,
            message: e.to_string(),
        })?;
        sink.store(record.id, &wire)?;
        summary.rows_loaded += 1;
        tracing::debug!(
            id = record.id,
            line = record.line,
            gtype = record.geometry.gtype,
            "Stored geometry"
        );
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_string_rows(n: usize) -> Vec<WireGeometry> {
        (0..n)
            .map(|i| {
                let geometry =
                    crate::Geometry::line_string(2, 0, vec![i as f64, 0.0, 1.0, 1.0]).unwrap();
                codec::encode(&geometry).unwrap()
            })
            .collect()
    }

    fn read(source: &mut dyn RecordSource, config: &Config) -> (ReadSummary, String) {
        let mut out = Vec::new();
        let summary = read_geometries(source, config, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_fetch_counts() {
        let config = Config::new().print_level(PrintLevel::Silent);

        let (summary, out) = read(&mut MemorySource::new(line_string_rows(25)), &config);
        assert_eq!((summary.rows, summary.fetches), (25, 3));
        assert_eq!(out, "\n25 rows fetched in 3 fetches\n");

        let (summary, _) = read(&mut MemorySource::new(line_string_rows(20)), &config);
        assert_eq!((summary.rows, summary.fetches), (20, 3));

        let (summary, _) = read(&mut MemorySource::new(Vec::new()), &config);
        assert_eq!((summary.rows, summary.fetches), (0, 1));
    }

    #[test]
    fn test_row_by_row() {
        let config = Config::new().print_level(PrintLevel::Silent).array_size(1);
        let (summary, _) = read(&mut MemorySource::new(line_string_rows(3)), &config);
        assert_eq!((summary.rows, summary.fetches), (3, 4));
    }

    #[test]
    fn test_null_rows_are_not_printed() {
        let mut rows = line_string_rows(1);
        rows.insert(0, WireGeometry::null());
        let config = Config::new();
        let (summary, out) = read(&mut MemorySource::new(rows), &config);
        assert_eq!(summary.nulls, 1);
        assert!(out.starts_with("Row 2: Geometry\n"));
        assert!(!out.contains("Row 1:"));
    }

    #[test]
    fn test_bad_row_does_not_affect_neighbours() {
        let mut images: Vec<Bytes> = line_string_rows(3)
            .iter()
            .map(|wire| types::encode_geometry(wire).unwrap())
            .collect();
        images[1] = Bytes::from_static(&[0x84, 0x01, 0x05]);

        let config = Config::new().array_size(2);
        let (summary, out) = read(&mut ImageSource::new(images), &config);
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.failed, 1);
        assert!(out.contains("Row 1: Geometry"));
        assert!(out.contains("Row 3: Geometry"));
        assert!(!out.contains("Row 2: Geometry"));
    }

    #[test]
    fn test_conversion_failure_is_skipped() {
        let mut rows = line_string_rows(2);
        rows[0].srid = crate::wire::Field::Value(crate::OracleNumber::from_f64(0.5).unwrap());
        let config = Config::new().print_level(PrintLevel::Silent).bulk_ordinates(true);
        let (summary, _) = read(&mut MemorySource::new(rows), &config);
        assert_eq!((summary.rows, summary.failed), (2, 1));
    }

    #[test]
    fn test_load_then_read() {
        let mut sink = MemorySink::new();
        let summary =
            load_geometries("# sample\n10 2 2 10 20 30 40\n11 1 2 12.5 45\n".as_bytes(), &mut sink)
                .unwrap();
        assert_eq!(summary.rows_loaded, 2);
        assert_eq!(summary.to_string(), "2 rows loaded");

        let ids: Vec<i64> = sink.rows().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![10, 11]);

        let decoded = codec::decode(&sink.rows()[1].1).unwrap().unwrap();
        assert_eq!(decoded.point.unwrap().x, 12.5);
    }

    #[test]
    fn test_load_stops_at_bad_line() {
        let mut sink = MemorySink::new();
        let err = load_geometries("1 2 2 0 0 1 1\n2 9 2 0 0\n3 2 2 0 0 1 1\n".as_bytes(), &mut sink)
            .unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
        assert_eq!(sink.rows().len(), 1);
    }

    #[test]
    fn test_encode_failure_reports_line() {
        let mut sink = MemorySink::new();
        let record = TextRecord {
            line: 7,
            id: 1,
            geometry: Geometry {
                gtype: 2002,
                elem_info: Some(vec![1, 2, 1]),
                ordinates: Some(vec![0.0, 0.0, 1e300, 1.0]),
                ..Geometry::default()
            },
        };
        let err = load_records(vec![Ok(record)], &mut sink).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 7, .. }), "{:?}", err);
        assert!(sink.rows().is_empty());
    }

    #[test]
    fn test_read_points() {
        let mut rows = line_string_rows(1);
        rows.push(WireGeometry::null());
        rows.push(
            codec::encode(&Geometry::point(2, 8307, crate::Point::new(12.5, 45.0, 0.0))).unwrap(),
        );
        let mut out = Vec::new();
        let summary = read_points(&mut MemorySource::new(rows), &Config::new(), &mut out).unwrap();
        assert_eq!((summary.rows, summary.nulls), (3, 1));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "3: (12.500000, 45.000000)\n\n3 rows fetched in 1 fetches\n"
        );
    }

    #[test]
    fn test_load_with_srid() {
        let mut sink = ImageSink::new();
        let reader = TextReader::new("1 3 2 0 0 4 0 4 4 0 0".as_bytes()).srid(8307);
        load_records(reader, &mut sink).unwrap();

        let (_, image) = &sink.rows()[0];
        let geometry = codec::decode_image(image, &Default::default()).unwrap().unwrap();
        assert_eq!(geometry.srid, 8307);
        assert_eq!(geometry.gtype, 2003);
    }

    #[test]
    fn test_sink_error_propagates() {
        struct FailingSink;
        impl RecordSink for FailingSink {
            fn store(&mut self, id: i64, _geometry: &WireGeometry) -> Result<()> {
                Err(Error::Sink(format!("row {} rejected", id)))
            }
        }
        let err = load_geometries("5 1 2 0 0".as_bytes(), &mut FailingSink).unwrap_err();
        assert!(matches!(err, Error::Sink(_)));
    }
}
