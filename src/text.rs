//! Text ingestion format
//!
//! One geometry per line, whitespace separated:
//!
//! ```text
//! id type dim x1 y1 [z1] x2 y2 [z2] ...
//! ```
//!
//! | type | geometry                                               |
//! |------|--------------------------------------------------------|
//! | 1    | point (one vertex; inline shortcut for 2-D and 3-D)    |
//! | 2    | line string, elem_info `[1, 2, 1]`                     |
//! | 3    | polygon exterior ring, elem_info `[1, 1003, 1]`        |
//! | 5    | multi-point, elem_info `[1, 1, n]`                     |
//!
//! Blank lines and lines starting with `#` are skipped.

use std::io::BufRead;

use crate::error::{Error, Result};
use crate::geometry::{Geometry, Point, ShapeKind};

/// Smallest accepted dimensionality
const MIN_DIMS: i32 = 2;

/// Largest accepted dimensionality
const MAX_DIMS: i32 = 4;

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub struct TextRecord {
    /// 1-based line number in the input
    pub line: usize,
    /// Caller-assigned identifier
    pub id: i64,
    /// The geometry
    pub geometry: Geometry,
}

/// Parse one line
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(text: &str, line: usize, srid: i32) -> Result<Option<TextRecord>> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut fields = text.split_whitespace();
    let id: i64 = parse_field(fields.next(), "id", line)?;
    let kind: i32 = parse_field(fields.next(), "type", line)?;
    let dims: i32 = parse_field(fields.next(), "dim", line)?;

    if !(MIN_DIMS..=MAX_DIMS).contains(&dims) {
        return Err(parse_error(line, format!("unsupported dimension {}", dims)));
    }

    let ordinates = fields
        .map(|field| {
            field
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| parse_error(line, format!("invalid coordinate '{}'", field)))
        })
        .collect::<Result<Vec<f64>>>()?;

    let group = dims as usize;
    if ordinates.is_empty() || ordinates.len() % group != 0 {
        return Err(parse_error(
            line,
            format!(
                "{} coordinates do not form {}-D vertices",
                ordinates.len(),
                dims
            ),
        ));
    }
    let vertices = ordinates.len() / group;

    let geometry = match ShapeKind::try_from(kind) {
        Ok(ShapeKind::Point) => {
            if vertices != 1 {
                return Err(parse_error(
                    line,
                    format!("point needs 1 vertex, found {}", vertices),
                ));
            }
            if dims <= 3 {
                let z = ordinates.get(2).copied().unwrap_or(0.0);
                Geometry::point(dims, srid, Point::new(ordinates[0], ordinates[1], z))
            } else {
                let mut point = Geometry::multi_point(dims, srid, ordinates)?;
                point.gtype = Geometry::gtype_for(ShapeKind::Point, dims);
                point
            }
        }
        Ok(ShapeKind::LineString) => {
            require_vertices(vertices, 2, "line string", line)?;
            Geometry::line_string(dims, srid, ordinates)?
        }
        Ok(ShapeKind::Polygon) => {
            require_vertices(vertices, 4, "polygon", line)?;
            Geometry::polygon(dims, srid, vec![ordinates])?
        }
        Ok(ShapeKind::MultiPoint) => Geometry::multi_point(dims, srid, ordinates)?,
        _ => {
            return Err(parse_error(
                line,
                format!("unsupported geometry type {}", kind),
            ))
        }
    };

    Ok(Some(TextRecord { line, id, geometry }))
}

/// Iterator over the records of a text input
#[derive(Debug)]
pub struct TextReader<R> {
    reader: R,
    srid: i32,
    line: usize,
    buf: String,
}

impl<R: BufRead> TextReader<R> {
    /// Create a reader over `reader`
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            srid: 0,
            line: 0,
            buf: String::new(),
        }
    }

    /// Set the SRID given to every geometry (0 by default)
    pub fn srid(mut self, srid: i32) -> Self {
        self.srid = srid;
        self
    }

    /// Read the next record, or None at end of input
    pub fn next_record(&mut self) -> Result<Option<TextRecord>> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            if let Some(record) = parse_line(&self.buf, self.line, self.srid)? {
                return Ok(Some(record));
            }
        }
    }
}

impl<R: BufRead> Iterator for TextReader<R> {
    type Item = Result<TextRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, name: &str, line: usize) -> Result<T> {
    let field = field.ok_or_else(|| parse_error(line, format!("missing {}", name)))?;
    field
        .parse()
        .map_err(|_| parse_error(line, format!("invalid {} '{}'", name, field)))
}

fn require_vertices(found: usize, min: usize, what: &str, line: usize) -> Result<()> {
    if found < min {
        return Err(parse_error(
            line,
            format!("{} needs at least {} vertices, found {}", what, min, found),
        ));
    }
    Ok(())
}

fn parse_error(line: usize, message: String) -> Error {
    Error::Parse { line, message }
}
