//! Conversion between wire-form and native geometries
//!
//! Decoding turns a [`WireGeometry`] into an optional [`Geometry`]:
//! - a NULL value decodes to `None`
//! - NULL or absent scalars default to 0, a NULL point stays `None`
//! - NULL or absent collections decode to `None`, empty ones to empty vectors
//! - any conversion failure aborts the whole value
//!
//! Encoding is the inverse: scalars are always written, the point and the
//! collections only when present, so a NULL collection stays NULL and an
//! empty one stays an empty VARRAY.
//!
//! # Example
//!
//! ```rust
//! use oracle_sdo::{codec, Geometry};
//!
//! let line = Geometry::line_string(2, 8307, vec![10.0, 20.0, 30.0, 40.0])?;
//! let wire = codec::encode(&line)?;
//! assert_eq!(codec::decode(&wire)?, Some(line));
//! # Ok::<(), oracle_sdo::Error>(())
//! ```

use bytes::Bytes;

use crate::constants::attr;
use crate::error::{Error, Result};
use crate::geometry::{Geometry, Point};
use crate::types::{self, OracleNumber};
use crate::wire::{Collection, Field, Indicator, NumberElement, Varray, WireGeometry, WirePoint};

/// Options for decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// Extract the ordinate collection in one bulk copy instead of element by
    /// element
    pub bulk_ordinates: bool,
}

impl DecodeOptions {
    /// Create default options (element-by-element extraction)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bulk ordinate extraction toggle
    pub fn bulk_ordinates(mut self, enabled: bool) -> Self {
        self.bulk_ordinates = enabled;
        self
    }
}

// =============================================================================
// Decode
// =============================================================================

/// Decode a wire-form geometry with default options
pub fn decode(wire: &WireGeometry) -> Result<Option<Geometry>> {
    decode_with(wire, &DecodeOptions::default())
}

/// Decode a wire-form geometry
pub fn decode_with(wire: &WireGeometry, options: &DecodeOptions) -> Result<Option<Geometry>> {
    if wire.is_null() {
        tracing::trace!("SDO_GEOMETRY is NULL");
        return Ok(None);
    }

    let gtype = decode_integer(&wire.gtype, attr::SDO_GTYPE)?;
    let srid = decode_integer(&wire.srid, attr::SDO_SRID)?;
    tracing::trace!(gtype, srid, "Decoded scalar attributes");

    let point = match wire.point.value() {
        Some(p) => Some(Point {
            x: decode_float(&p.x, "SDO_POINT.X")?,
            y: decode_float(&p.y, "SDO_POINT.Y")?,
            z: decode_float(&p.z, "SDO_POINT.Z")?,
        }),
        None => None,
    };

    let elem_info = match wire.elem_info.value() {
        Some(collection) => Some(decode_elem_info(collection)?),
        None => None,
    };

    let ordinates = match wire.ordinates.value() {
        Some(collection) if options.bulk_ordinates => Some(decode_ordinates_bulk(collection)?),
        Some(collection) => Some(decode_ordinates(collection)?),
        None => None,
    };
    tracing::trace!(
        elem_info_len = elem_info.as_ref().map(Vec::len),
        ordinates_len = ordinates.as_ref().map(Vec::len),
        point = point.is_some(),
        bulk = options.bulk_ordinates,
        "Decoded collections"
    );

    let geometry = Geometry {
        gtype,
        srid,
        point,
        elem_info,
        ordinates,
    };
    geometry.validate()?;
    Ok(Some(geometry))
}

/// Decode an element directory collection in order
pub fn decode_elem_info<C>(collection: &C) -> Result<Vec<u32>>
where
    C: Collection<Element = NumberElement> + ?Sized,
{
    let mut values = Vec::with_capacity(collection.len());
    for index in 0..collection.len() {
        let number = element_number(collection.element_at(index), attr::SDO_ELEM_INFO, index)?;
        values.push(
            number
                .to_u32()
                .map_err(|e| e.in_field(element_label(attr::SDO_ELEM_INFO, index)))?,
        );
    }
    Ok(values)
}

/// Decode an ordinate collection element by element
pub fn decode_ordinates<C>(collection: &C) -> Result<Vec<f64>>
where
    C: Collection<Element = NumberElement> + ?Sized,
{
    let mut values = Vec::with_capacity(collection.len());
    for index in 0..collection.len() {
        let number = element_number(collection.element_at(index), attr::SDO_ORDINATES, index)?;
        values.push(ordinate_value(number, index)?);
    }
    Ok(values)
}

/// Decode an ordinate collection with a single bulk copy
///
/// Produces the same values as [`decode_ordinates`]. The scratch buffer is
/// local to the call.
pub fn decode_ordinates_bulk<C>(collection: &C) -> Result<Vec<f64>>
where
    C: Collection<Element = NumberElement> + ?Sized,
{
    let len = collection.len();
    let mut scratch: Vec<&NumberElement> = Vec::with_capacity(len);
    let copied = collection.copy_elements(0, len, &mut scratch);
    if copied != len {
        return Err(Error::conversion(
            attr::SDO_ORDINATES,
            format!("bulk copy returned {} of {} elements", copied, len),
        ));
    }

    scratch
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            let number = element_number(Some(element), attr::SDO_ORDINATES, index)?;
            ordinate_value(number, index)
        })
        .collect()
}

/// Decode a NUMBER attribute to i32 (NULL or absent is 0)
fn decode_integer(field: &Field<OracleNumber>, name: &str) -> Result<i32> {
    match field.value() {
        Some(number) => number.to_i32().map_err(|e| e.in_field(name)),
        None => Ok(0),
    }
}

/// Decode a NUMBER attribute to f64 (NULL or absent is 0)
fn decode_float(field: &Field<OracleNumber>, name: &str) -> Result<f64> {
    match field.value() {
        Some(number) => number.to_f64().map_err(|e| e.in_field(name)),
        None => Ok(0.0),
    }
}

fn element_number<'a>(
    element: Option<&'a NumberElement>,
    name: &str,
    index: usize,
) -> Result<&'a OracleNumber> {
    match element {
        Some(Some(number)) => Ok(number),
        Some(None) => Err(Error::conversion(
            element_label(name, index),
            "NULL collection element",
        )),
        None => Err(Error::conversion(
            element_label(name, index),
            "element missing from collection",
        )),
    }
}

fn ordinate_value(number: &OracleNumber, index: usize) -> Result<f64> {
    number
        .to_f64()
        .map_err(|e| e.in_field(element_label(attr::SDO_ORDINATES, index)))
}

/// Label of a collection element, 1-based like the printer
fn element_label(name: &str, index: usize) -> String {
    format!("{}[{}]", name, index + 1)
}

// =============================================================================
// Encode
// =============================================================================

/// Encode a geometry into a new wire-form value
pub fn encode(geometry: &Geometry) -> Result<WireGeometry> {
    let mut wire = WireGeometry::new();
    encode_into(geometry, &mut wire)?;
    Ok(wire)
}

/// Encode an optional geometry, `None` becoming a NULL value
pub fn encode_optional(geometry: Option<&Geometry>) -> Result<WireGeometry> {
    match geometry {
        Some(g) => encode(g),
        None => Ok(WireGeometry::null()),
    }
}

/// Populate an existing wire-form value from a geometry
///
/// `wire` is only modified when every attribute converted successfully.
pub fn encode_into(geometry: &Geometry, wire: &mut WireGeometry) -> Result<()> {
    geometry.validate()?;

    let point = match &geometry.point {
        Some(p) => Field::Value(WirePoint {
            x: Field::Value(encode_float(p.x, "SDO_POINT.X")?),
            y: Field::Value(encode_float(p.y, "SDO_POINT.Y")?),
            z: Field::Value(encode_float(p.z, "SDO_POINT.Z")?),
        }),
        None => Field::Null,
    };

    let elem_info = match &geometry.elem_info {
        Some(values) => Field::Value(Varray::from_u32s(values)),
        None => Field::Null,
    };

    let ordinates = match &geometry.ordinates {
        Some(values) => {
            let mut ordinates = Varray::with_capacity(values.len());
            for (index, &value) in values.iter().enumerate() {
                ordinates.append(Some(encode_float(
                    value,
                    &element_label(attr::SDO_ORDINATES, index),
                )?));
            }
            Field::Value(ordinates)
        }
        None => Field::Null,
    };

    *wire = WireGeometry {
        indicator: Indicator::NotNull,
        gtype: Field::Value(OracleNumber::from(geometry.gtype)),
        srid: Field::Value(OracleNumber::from(geometry.srid)),
        point,
        elem_info,
        ordinates,
    };
    tracing::trace!(
        gtype = geometry.gtype,
        elements = geometry.element_count(),
        ordinates = geometry.ordinate_slice().len(),
        "Encoded SDO_GEOMETRY"
    );
    Ok(())
}

fn encode_float(value: f64, name: &str) -> Result<OracleNumber> {
    OracleNumber::from_f64(value).map_err(|e| e.in_field(name))
}

// =============================================================================
// Images
// =============================================================================

/// Decode a binary SDO_GEOMETRY image straight to a native geometry
pub fn decode_image(data: &[u8], options: &DecodeOptions) -> Result<Option<Geometry>> {
    let wire = types::decode_geometry(data)?;
    decode_with(&wire, options)
}

/// Encode an optional native geometry straight to a binary image
pub fn encode_image(geometry: Option<&Geometry>) -> Result<Bytes> {
    let wire = encode_optional(geometry)?;
    types::encode_geometry(&wire)
}
