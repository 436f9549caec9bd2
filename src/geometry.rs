//! Native SDO_GEOMETRY model
//!
//! A decoded geometry keeps the layout of the database value:
//! - `gtype` packs dimensionality and shape kind (`dims * 1000 + kind`)
//! - `elem_info` is the element directory, a flat list of
//!   `(offset, etype, interpretation)` triples
//! - `ordinates` is the flat ordinate buffer, one group of `dims` values per
//!   vertex
//! - `point` is the inline shortcut for simple points
//!
//! A NULL collection is `None` and stays distinct from an empty one; the
//! counting and slicing methods treat both as zero length.
//!
//! # Example
//!
//! ```rust
//! use oracle_sdo::{ElementRole, Geometry, ShapeKind};
//!
//! let polygon = Geometry::polygon(
//!     2,
//!     8307,
//!     vec![
//!         vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0, 0.0, 0.0],
//!         vec![2.0, 2.0, 2.0, 4.0, 4.0, 4.0, 4.0, 2.0, 2.0, 2.0],
//!     ],
//! )?;
//!
//! assert_eq!(polygon.gtype, 2003);
//! assert_eq!(polygon.shape_kind()?, ShapeKind::Polygon);
//! assert_eq!(polygon.element_count(), 2);
//! assert_eq!(polygon.point_count(), 10);
//!
//! let roles: Vec<_> = polygon.elements().map(|e| e.role()).collect();
//! assert_eq!(roles, vec![ElementRole::ExteriorRing, ElementRole::InteriorRing]);
//! # Ok::<(), oracle_sdo::Error>(())
//! ```

use std::fmt;

use crate::constants::{etype, ELEM_INFO_GROUP, GTYPE_DIM_FACTOR, INTERPRETATION_STRAIGHT};
use crate::error::{Error, Result};

// =============================================================================
// Shape kind
// =============================================================================

/// Geometry family encoded in `gtype mod 1000`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ShapeKind {
    /// Single point
    Point = 1,
    /// Line string
    LineString = 2,
    /// Polygon with optional holes
    Polygon = 3,
    /// Heterogeneous collection
    Collection = 4,
    /// Multiple points
    MultiPoint = 5,
    /// Multiple line strings
    MultiLineString = 6,
    /// Multiple polygons
    MultiPolygon = 7,
}

impl ShapeKind {
    /// Display name of the shape kind
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Point => "POINT",
            ShapeKind::LineString => "LINESTRING",
            ShapeKind::Polygon => "POLYGON",
            ShapeKind::Collection => "COLLECTION",
            ShapeKind::MultiPoint => "MULTI-POINT",
            ShapeKind::MultiLineString => "MULTI-LINESTRING",
            ShapeKind::MultiPolygon => "MULTI-POLYGON",
        }
    }

    /// Numeric code of the shape kind
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for ShapeKind {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            1 => Ok(ShapeKind::Point),
            2 => Ok(ShapeKind::LineString),
            3 => Ok(ShapeKind::Polygon),
            4 => Ok(ShapeKind::Collection),
            5 => Ok(ShapeKind::MultiPoint),
            6 => Ok(ShapeKind::MultiLineString),
            7 => Ok(ShapeKind::MultiPolygon),
            other => Err(Error::UnknownShapeKind(other)),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Element directory
// =============================================================================

/// Role of an element, derived from its etype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    /// Point or point cluster
    Point,
    /// Line string
    LineString,
    /// Polygon ring with unknown orientation
    Polygon,
    /// Exterior polygon ring
    ExteriorRing,
    /// Interior polygon ring (hole)
    InteriorRing,
    /// Compound line string header
    CompoundLineString,
    /// Compound exterior ring header
    CompoundExteriorRing,
    /// Compound interior ring header
    CompoundInteriorRing,
    /// Any other etype
    Unknown(u32),
}

impl ElementRole {
    /// Check if this is a compound header whose interpretation counts subelements
    pub fn is_compound(self) -> bool {
        matches!(
            self,
            ElementRole::CompoundLineString
                | ElementRole::CompoundExteriorRing
                | ElementRole::CompoundInteriorRing
        )
    }
}

impl From<u32> for ElementRole {
    fn from(code: u32) -> Self {
        match code {
            etype::POINT => ElementRole::Point,
            etype::LINE_STRING => ElementRole::LineString,
            etype::POLYGON => ElementRole::Polygon,
            etype::COMPOUND_LINE_STRING => ElementRole::CompoundLineString,
            etype::EXTERIOR_RING => ElementRole::ExteriorRing,
            etype::INTERIOR_RING => ElementRole::InteriorRing,
            etype::COMPOUND_EXTERIOR_RING => ElementRole::CompoundExteriorRing,
            etype::COMPOUND_INTERIOR_RING => ElementRole::CompoundInteriorRing,
            other => ElementRole::Unknown(other),
        }
    }
}

/// One element descriptor triple of the element directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementInfo {
    /// 1-based starting position in the ordinate buffer
    pub offset: u32,
    /// Element type code
    pub etype: u32,
    /// Interpretation (passed through)
    pub interpretation: u32,
}

impl ElementInfo {
    /// Role of the element
    pub fn role(&self) -> ElementRole {
        ElementRole::from(self.etype)
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Inline point shortcut (SDO_POINT)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X ordinate
    pub x: f64,
    /// Y ordinate
    pub y: f64,
    /// Z ordinate (0 for 2-D points)
    pub z: f64,
}

impl Point {
    /// Create a point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A decoded SDO_GEOMETRY value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    /// Packed dimensionality and shape kind
    pub gtype: i32,
    /// Spatial reference system id (0 if none)
    pub srid: i32,
    /// Inline point shortcut
    pub point: Option<Point>,
    /// Element directory, three slots per element (None when NULL)
    pub elem_info: Option<Vec<u32>>,
    /// Ordinate buffer, `dimensions()` values per vertex (None when NULL)
    pub ordinates: Option<Vec<f64>>,
}

impl Geometry {
    /// Compute the gtype for a shape kind and dimensionality
    pub fn gtype_for(kind: ShapeKind, dims: i32) -> i32 {
        dims * GTYPE_DIM_FACTOR + kind.code()
    }

    /// Create a point geometry using the inline shortcut
    pub fn point(dims: i32, srid: i32, point: Point) -> Self {
        Self {
            gtype: Self::gtype_for(ShapeKind::Point, dims),
            srid,
            point: Some(point),
            ..Self::default()
        }
    }

    /// Create a line string from its ordinates
    pub fn line_string(dims: i32, srid: i32, ordinates: Vec<f64>) -> Result<Self> {
        let geometry = Self {
            gtype: Self::gtype_for(ShapeKind::LineString, dims),
            srid,
            point: None,
            elem_info: Some(vec![1, etype::LINE_STRING, INTERPRETATION_STRAIGHT]),
            ordinates: Some(ordinates),
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Create a polygon from its rings
    ///
    /// The first ring is the exterior ring, all others are holes.
    pub fn polygon(dims: i32, srid: i32, rings: Vec<Vec<f64>>) -> Result<Self> {
        let mut elem_info = Vec::with_capacity(rings.len() * ELEM_INFO_GROUP);
        let mut ordinates = Vec::with_capacity(rings.iter().map(Vec::len).sum());

        for (index, ring) in rings.into_iter().enumerate() {
            let offset = ordinate_offset(ordinates.len())?;
            let ring_type = if index == 0 {
                etype::EXTERIOR_RING
            } else {
                etype::INTERIOR_RING
            };
            elem_info.extend_from_slice(&[offset, ring_type, INTERPRETATION_STRAIGHT]);
            ordinates.extend(ring);
        }

        let geometry = Self {
            gtype: Self::gtype_for(ShapeKind::Polygon, dims),
            srid,
            point: None,
            elem_info: Some(elem_info),
            ordinates: Some(ordinates),
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Create a multi-point as a single point cluster element
    pub fn multi_point(dims: i32, srid: i32, ordinates: Vec<f64>) -> Result<Self> {
        let mut geometry = Self {
            gtype: Self::gtype_for(ShapeKind::MultiPoint, dims),
            srid,
            point: None,
            elem_info: None,
            ordinates: Some(ordinates),
        };
        geometry.validate()?;
        let count = u32::try_from(geometry.point_count())
            .map_err(|_| Error::conversion("SDO_ELEM_INFO", "too many points"))?;
        geometry.elem_info = Some(vec![1, etype::POINT, count]);
        Ok(geometry)
    }

    /// Shape kind code (`gtype mod 1000`)
    pub fn shape_code(&self) -> i32 {
        self.gtype % GTYPE_DIM_FACTOR
    }

    /// Shape kind
    pub fn shape_kind(&self) -> Result<ShapeKind> {
        ShapeKind::try_from(self.shape_code())
    }

    /// Coordinate dimensionality (`gtype div 1000`)
    pub fn dimensions(&self) -> i32 {
        self.gtype / GTYPE_DIM_FACTOR
    }

    /// Element directory slots, empty when NULL
    pub fn elem_info_slice(&self) -> &[u32] {
        self.elem_info.as_deref().unwrap_or_default()
    }

    /// Ordinate buffer, empty when NULL
    pub fn ordinate_slice(&self) -> &[f64] {
        self.ordinates.as_deref().unwrap_or_default()
    }

    /// Number of element descriptors
    pub fn element_count(&self) -> usize {
        self.elem_info_slice().len() / ELEM_INFO_GROUP
    }

    /// Number of vertices in the ordinate buffer (0 without dimensionality)
    pub fn point_count(&self) -> usize {
        match self.dim_group() {
            Some(dims) => self.ordinate_slice().len() / dims,
            None => 0,
        }
    }

    /// Check the cardinality of the element directory and ordinate buffer
    pub fn validate(&self) -> Result<()> {
        let elem_info = self.elem_info_slice();
        if elem_info.len() % ELEM_INFO_GROUP != 0 {
            return Err(Error::CardinalityMismatch {
                what: "SDO_ELEM_INFO",
                len: elem_info.len(),
                group: ELEM_INFO_GROUP,
            });
        }
        if let Some(dims) = self.dim_group() {
            let ordinates = self.ordinate_slice();
            if ordinates.len() % dims != 0 {
                return Err(Error::CardinalityMismatch {
                    what: "SDO_ORDINATES",
                    len: ordinates.len(),
                    group: dims,
                });
            }
        }
        Ok(())
    }

    /// Iterate over the element descriptors
    pub fn elements(&self) -> impl Iterator<Item = ElementInfo> + '_ {
        self.elem_info_slice()
            .chunks_exact(ELEM_INFO_GROUP)
            .map(|slots| ElementInfo {
                offset: slots[0],
                etype: slots[1],
                interpretation: slots[2],
            })
    }

    /// Get the element descriptor at `index`
    pub fn element(&self, index: usize) -> Option<ElementInfo> {
        self.elements().nth(index)
    }

    /// Ordinates belonging to the element at `index`
    ///
    /// The slice runs from the element's offset up to the offset of the next
    /// element at the same level (compound headers span their subelements).
    /// Returns None for a missing element or inconsistent offsets.
    pub fn element_ordinates(&self, index: usize) -> Option<&[f64]> {
        let element = self.element(index)?;
        let start = usize::try_from(element.offset).ok()?.checked_sub(1)?;

        let next = if element.role().is_compound() {
            index + 1 + usize::try_from(element.interpretation).ok()?
        } else {
            index + 1
        };
        let ordinates = self.ordinate_slice();
        let end = match self.element(next) {
            Some(following) => usize::try_from(following.offset).ok()?.checked_sub(1)?,
            None => ordinates.len(),
        };

        if start > end || end > ordinates.len() {
            return None;
        }
        Some(&ordinates[start..end])
    }

    /// Iterate over the vertices of the ordinate buffer
    pub fn vertices(&self) -> impl Iterator<Item = &[f64]> + '_ {
        let (dims, len) = match self.dim_group() {
            Some(dims) => (dims, self.point_count() * dims),
            None => (1, 0),
        };
        self.ordinate_slice()[..len].chunks_exact(dims)
    }

    /// Dimensionality as a group size, None when it is not positive
    fn dim_group(&self) -> Option<usize> {
        usize::try_from(self.dimensions()).ok().filter(|&d| d > 0)
    }
}

/// 1-based offset for the next ordinate
fn ordinate_offset(len: usize) -> Result<u32> {
    u32::try_from(len + 1).map_err(|_| Error::conversion("SDO_ELEM_INFO", "offset out of range"))
}
