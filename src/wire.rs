//! Wire-form SDO_GEOMETRY values
//!
//! This module models the MDSYS.SDO_GEOMETRY object exactly as a record source
//! hands it over, before any native conversion:
//!
//! - every scalar attribute is an Oracle NUMBER that may be absent, NULL or set
//! - SDO_POINT is an embedded SDO_POINT_TYPE object with its own atomic null
//! - SDO_ELEM_INFO and SDO_ORDINATES are VARRAYs of NUMBER
//! - the whole value carries an atomic null indicator of its own
//!
//! # Example
//!
//! ```rust
//! use oracle_sdo::wire::{Field, Varray, WireGeometry};
//! use oracle_sdo::OracleNumber;
//!
//! let mut wire = WireGeometry::new();
//! wire.gtype = Field::Value(OracleNumber::from(2002));
//! wire.srid = Field::Value(OracleNumber::from(8307));
//! wire.elem_info = Field::Value(Varray::from_u32s(&[1, 2, 1]));
//! wire.ordinates = Field::Value(Varray::from_f64s(&[10.0, 20.0, 30.0, 40.0]).unwrap());
//! assert!(!wire.is_null());
//! ```

use crate::error::Result;
use crate::types::OracleNumber;

/// Three-state value of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    /// The attribute is not present at all
    #[default]
    Absent,
    /// The attribute is present with a NULL indicator
    Null,
    /// The attribute is present with a value
    Value(T),
}

impl<T> Field<T> {
    /// Get the value if present
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Take the value if present
    pub fn into_value(self) -> Option<T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Check if the attribute is present with a NULL indicator
    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    /// Check if the attribute is missing
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    /// Check if the attribute carries a value
    pub fn is_value(&self) -> bool {
        matches!(self, Field::Value(_))
    }

    /// Borrow the contents
    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Field::Absent => Field::Absent,
            Field::Null => Field::Null,
            Field::Value(v) => Field::Value(v),
        }
    }

    /// Map the value, keeping Absent and Null as they are
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Field<U> {
        match self {
            Field::Absent => Field::Absent,
            Field::Null => Field::Null,
            Field::Value(v) => Field::Value(f(v)),
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Value(v),
            None => Field::Null,
        }
    }
}

/// Atomic null indicator of an object value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indicator {
    /// The object exists
    #[default]
    NotNull,
    /// The whole object is NULL
    Null,
}

/// Random-access ordered collection
///
/// This is the only capability the codec needs from a collection, so any
/// client library's collection type can be adapted by implementing it.
pub trait Collection {
    /// Element type
    type Element;

    /// Number of elements
    fn len(&self) -> usize;

    /// Get the element at `index`, or None if no such element exists
    fn element_at(&self, index: usize) -> Option<&Self::Element>;

    /// Check if the collection has no elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append up to `count` elements starting at `start` to `out`
    ///
    /// Returns the number of elements copied. The default walks
    /// [`element_at`](Self::element_at); implementations backed by
    /// contiguous storage can do better.
    fn copy_elements<'a>(
        &'a self,
        start: usize,
        count: usize,
        out: &mut Vec<&'a Self::Element>,
    ) -> usize {
        let mut copied = 0;
        for index in start..start.saturating_add(count) {
            match self.element_at(index) {
                Some(element) => {
                    out.push(element);
                    copied += 1;
                }
                None => break,
            }
        }
        copied
    }
}

/// Element of a NUMBER collection (None is a NULL element)
pub type NumberElement = Option<OracleNumber>;

/// A VARRAY instance
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Varray<T> {
    elements: Vec<T>,
}

impl<T> Varray<T> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Create an empty collection sized for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Append an element
    pub fn append(&mut self, element: T) {
        self.elements.push(element);
    }

    /// Get the elements
    pub fn elements(&self) -> &[T] {
        &self.elements
    }
}

impl Varray<NumberElement> {
    /// Build a NUMBER collection from unsigned integers
    pub fn from_u32s(values: &[u32]) -> Self {
        values
            .iter()
            .map(|&v| Some(OracleNumber::from(v)))
            .collect()
    }

    /// Build a NUMBER collection from floats
    pub fn from_f64s(values: &[f64]) -> Result<Self> {
        values
            .iter()
            .map(|&v| OracleNumber::from_f64(v).map(Some))
            .collect()
    }
}

impl<T> FromIterator<T> for Varray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<T> Collection for Varray<T> {
    type Element = T;

    fn len(&self) -> usize {
        self.elements.len()
    }

    fn element_at(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    fn copy_elements<'a>(&'a self, start: usize, count: usize, out: &mut Vec<&'a T>) -> usize {
        let start = start.min(self.elements.len());
        let end = start.saturating_add(count).min(self.elements.len());
        out.extend(self.elements[start..end].iter());
        end - start
    }
}

impl<T> Collection for Vec<T> {
    type Element = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element_at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

/// MDSYS.SDO_POINT_TYPE
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WirePoint {
    /// X ordinate
    pub x: Field<OracleNumber>,
    /// Y ordinate
    pub y: Field<OracleNumber>,
    /// Z ordinate
    pub z: Field<OracleNumber>,
}

/// MDSYS.SDO_GEOMETRY
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WireGeometry {
    /// Atomic null indicator for the whole value
    pub indicator: Indicator,
    /// SDO_GTYPE
    pub gtype: Field<OracleNumber>,
    /// SDO_SRID
    pub srid: Field<OracleNumber>,
    /// SDO_POINT
    pub point: Field<WirePoint>,
    /// SDO_ELEM_INFO
    pub elem_info: Field<Varray<NumberElement>>,
    /// SDO_ORDINATES
    pub ordinates: Field<Varray<NumberElement>>,
}

impl WireGeometry {
    /// Create a non-null value with every attribute absent
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an atomically null value ("no geometry")
    pub fn null() -> Self {
        Self {
            indicator: Indicator::Null,
            ..Self::default()
        }
    }

    /// Check if the whole value is NULL
    pub fn is_null(&self) -> bool {
        self.indicator == Indicator::Null
    }
}
