//! Diagnostic geometry reports
//!
//! Renders a decoded geometry as text at one of three levels:
//!
//! ```text
//! Row 1: Geometry                      <- Summary and above
//!   Type: 2 (LINESTRING)
//!   Dimensions: 2
//!   Spatial reference system: 8307
//!   Elements: 1
//!   Points: 2
//! Detailed structure                   <- Detailed only
//!   SDO_GTYPE: 2002
//!   SDO_SRID: 8307
//!   SDO_ELEM_INFO (3 elements)
//!     [1]=1
//!     ...
//!   SDO_ORDINATES (4 elements)
//!     [1]=10.000000
//!     ...
//! ```
//!
//! [`print_point`] writes the one-line `row: (x, y)` form for geometries
//! stored with the inline point.
//!
//! Callers skip NULL geometries; there is nothing to report for them.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::geometry::{Geometry, ShapeKind};

/// Name shown for shape codes outside the known range
pub const UNKNOWN_SHAPE_NAME: &str = "UNKNOWN";

/// Report verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum PrintLevel {
    /// No output
    Silent,
    /// Shape, dimensionality, SRID and counts
    #[default]
    Summary,
    /// Summary plus every attribute and collection slot
    Detailed,
}

impl PrintLevel {
    /// Map a numeric level (0, 1, 2 or more)
    pub fn from_level(level: i64) -> Self {
        match level {
            i64::MIN..=0 => PrintLevel::Silent,
            1 => PrintLevel::Summary,
            _ => PrintLevel::Detailed,
        }
    }
}

impl From<u8> for PrintLevel {
    fn from(level: u8) -> Self {
        Self::from_level(level as i64)
    }
}

impl FromStr for PrintLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(level) = s.parse::<i64>() {
            return Ok(Self::from_level(level));
        }
        match s.to_ascii_lowercase().as_str() {
            "silent" | "none" => Ok(PrintLevel::Silent),
            "summary" => Ok(PrintLevel::Summary),
            "detailed" | "detail" => Ok(PrintLevel::Detailed),
            _ => Err(Error::InvalidConfig(format!("unknown print level '{}'", s))),
        }
    }
}

/// A printable report for one geometry row
#[derive(Debug, Clone, Copy)]
pub struct GeometryReport<'a> {
    geometry: &'a Geometry,
    row: usize,
    level: PrintLevel,
}

impl<'a> GeometryReport<'a> {
    /// Create a report for `geometry` at 1-based `row`
    pub fn new(geometry: &'a Geometry, row: usize, level: PrintLevel) -> Self {
        Self {
            geometry,
            row,
            level,
        }
    }

    /// Name of the shape kind, or the placeholder for unknown codes
    pub fn shape_name(&self) -> &'static str {
        self.geometry
            .shape_kind()
            .map(ShapeKind::name)
            .unwrap_or(UNKNOWN_SHAPE_NAME)
    }
}

impl fmt::Display for GeometryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.geometry;

        if self.level >= PrintLevel::Summary {
            writeln!(f, "Row {}: Geometry", self.row)?;
            writeln!(f, "  Type: {} ({})", g.shape_code(), self.shape_name())?;
            writeln!(f, "  Dimensions: {}", g.dimensions())?;
            writeln!(f, "  Spatial reference system: {}", g.srid)?;
            writeln!(f, "  Elements: {}", g.element_count())?;
            writeln!(f, "  Points: {}", g.point_count())?;
        }

        if self.level >= PrintLevel::Detailed {
            writeln!(f, "Detailed structure")?;
            writeln!(f, "  SDO_GTYPE: {}", g.gtype)?;
            writeln!(f, "  SDO_SRID: {}", g.srid)?;
            if let Some(p) = &g.point {
                writeln!(f, "  SDO_POINT: ({:.6}, {:.6}, {:.6})", p.x, p.y, p.z)?;
            }
            let elem_info = g.elem_info_slice();
            if !elem_info.is_empty() {
                writeln!(f, "  SDO_ELEM_INFO ({} elements)", elem_info.len())?;
            }
            for (i, value) in elem_info.iter().enumerate() {
                writeln!(f, "    [{}]={}", i + 1, value)?;
            }
            let ordinates = g.ordinate_slice();
            if !ordinates.is_empty() {
                writeln!(f, "  SDO_ORDINATES ({} elements)", ordinates.len())?;
            }
            for (i, value) in ordinates.iter().enumerate() {
                writeln!(f, "    [{}]={:.6}", i + 1, value)?;
            }
        }

        Ok(())
    }
}

/// Write the report for one geometry
pub fn print_geometry<W: Write + ?Sized>(
    out: &mut W,
    geometry: &Geometry,
    row: usize,
    level: PrintLevel,
) -> Result<()> {
    if level == PrintLevel::Silent {
        return Ok(());
    }
    if let Err(Error::UnknownShapeKind(code)) = geometry.shape_kind() {
        tracing::warn!(row, code, gtype = geometry.gtype, "Unknown shape kind");
    }
    write!(out, "{}", GeometryReport::new(geometry, row, level))?;
    Ok(())
}

/// Write the inline point of one geometry as `row: (x, y)`
///
/// Returns false without writing anything when the geometry has no point.
pub fn print_point<W: Write + ?Sized>(
    out: &mut W,
    geometry: &Geometry,
    row: usize,
) -> Result<bool> {
    match &geometry.point {
        Some(p) => {
            writeln!(out, "{}: ({:.6}, {:.6})", row, p.x, p.y)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
