//! SDO_GEOMETRY object image encoding and decoding
//!
//! This module handles the "pickle" binary format Oracle uses for object and
//! collection values, specialised to MDSYS.SDO_GEOMETRY and its two VARRAYs.
//!
//! # Image Format Overview
//!
//! ```text
//! Object image (SDO_GEOMETRY):
//!   flags (1 byte): IS_VERSION_81 | NO_PREFIX_SEG = 0x84
//!   version (1 byte): IMAGE_VERSION (1)
//!   length (5 bytes): LONG_LENGTH_INDICATOR + u32 BE total image size
//!   body:
//!     ATOMIC_NULL (253)                   the whole value is NULL
//!     or, in attribute order:
//!     SDO_GTYPE      NUMBER | NULL (255)
//!     SDO_SRID       NUMBER | NULL
//!     SDO_POINT      ATOMIC_NULL | X Y Z (each NUMBER | NULL)
//!     SDO_ELEM_INFO  NULL | length + collection image
//!     SDO_ORDINATES  NULL | length + collection image
//!   Attributes past the end of the image are absent.
//!
//! Collection image (SDO_ELEM_INFO_ARRAY, SDO_ORDINATE_ARRAY):
//!   flags (1 byte): IS_VERSION_81 | IS_COLLECTION = 0x88
//!   version (1 byte): 1
//!   length (5 bytes): LONG_LENGTH_INDICATOR + u32 BE total image size
//!   prefix segment: [01] [01] (present whenever NO_PREFIX_SEG is clear)
//!   collection_type (1 byte): 1=IndexBy, 2=Nested, 3=Varray
//!   num_elements (length-encoded)
//!   elements[]: [index (4 bytes BE), IndexBy only] NUMBER | NULL
//!
//! NUMBER: length (1 byte) + Oracle NUMBER wire bytes
//! ```
//!
//! An empty collection and a NULL collection are different images and decode
//! to different values.

use bytes::Bytes;

use crate::buffer::{ReadBuffer, WriteBuffer};
use crate::constants::{attr, collection_type, length, obj_flags};
use crate::error::{Error, Result};
use crate::types::OracleNumber;
use crate::wire::{Collection, Field, NumberElement, Varray, WireGeometry, WirePoint};

/// Flags written on object images
const OBJECT_FLAGS: u8 = obj_flags::IS_VERSION_81 | obj_flags::NO_PREFIX_SEG;

/// Flags written on collection images
const COLLECTION_FLAGS: u8 = obj_flags::IS_VERSION_81 | obj_flags::IS_COLLECTION;

/// Decode an SDO_GEOMETRY object image
///
/// Empty input is a NULL column value and decodes to a NULL geometry.
pub fn decode_geometry(data: &[u8]) -> Result<WireGeometry> {
    if data.is_empty() {
        return Ok(WireGeometry::null());
    }

    let mut buf = ReadBuffer::from(data);
    let flags = read_header(&mut buf, data.len())?;
    if flags & obj_flags::IS_COLLECTION != 0 {
        return Err(Error::InvalidImage(
            "expected an object image, found a collection".to_string(),
        ));
    }

    if buf.remaining() > 0 && buf.peek_u8()? == obj_flags::ATOMIC_NULL {
        buf.skip(1)?;
        expect_consumed(&buf)?;
        return Ok(WireGeometry::null());
    }

    let geometry = WireGeometry {
        indicator: Default::default(),
        gtype: read_number(&mut buf, attr::SDO_GTYPE)?,
        srid: read_number(&mut buf, attr::SDO_SRID)?,
        point: read_point(&mut buf)?,
        elem_info: read_collection(&mut buf, attr::SDO_ELEM_INFO)?,
        ordinates: read_collection(&mut buf, attr::SDO_ORDINATES)?,
    };
    expect_consumed(&buf)?;

    tracing::trace!(
        image_len = data.len(),
        gtype_null = geometry.gtype.is_null(),
        point_present = geometry.point.is_value(),
        "Decoded SDO_GEOMETRY image"
    );
    Ok(geometry)
}

/// Encode an SDO_GEOMETRY object image
///
/// Absent attributes at the end of the value are left out of the image so
/// they decode as absent again; absent attributes followed by present ones
/// are written as NULL.
pub fn encode_geometry(geometry: &WireGeometry) -> Result<Bytes> {
    let mut buf = WriteBuffer::new();
    buf.write_u8(OBJECT_FLAGS)?;
    buf.write_u8(obj_flags::IMAGE_VERSION)?;
    let length_pos = write_length_placeholder(&mut buf)?;

    if geometry.is_null() {
        buf.write_u8(obj_flags::ATOMIC_NULL)?;
    } else {
        let present = [
            !geometry.gtype.is_absent(),
            !geometry.srid.is_absent(),
            !geometry.point.is_absent(),
            !geometry.elem_info.is_absent(),
            !geometry.ordinates.is_absent(),
        ];
        let written = present.iter().rposition(|&p| p).map_or(0, |i| i + 1);

        for index in 0..written {
            match index {
                0 => write_number(&mut buf, geometry.gtype.value())?,
                1 => write_number(&mut buf, geometry.srid.value())?,
                2 => write_point(&mut buf, geometry.point.value())?,
                3 => write_collection(&mut buf, geometry.elem_info.value())?,
                _ => write_collection(&mut buf, geometry.ordinates.value())?,
            }
        }
    }

    let total_len = buf.len() as u32;
    buf.patch_u32_be(length_pos + 1, total_len)?;
    Ok(buf.freeze())
}

/// Decode a collection of NUMBER from its image
pub fn decode_collection(data: &[u8]) -> Result<Varray<NumberElement>> {
    decode_collection_image(data, "COLLECTION")
}

/// Encode a collection of NUMBER as a VARRAY image
pub fn encode_collection<C>(collection: &C) -> Result<Vec<u8>>
where
    C: Collection<Element = NumberElement> + ?Sized,
{
    let mut buf = WriteBuffer::new();
    buf.write_u8(COLLECTION_FLAGS)?;
    buf.write_u8(obj_flags::IMAGE_VERSION)?;
    let length_pos = write_length_placeholder(&mut buf)?;

    // Prefix segment [01] [01], required whenever NO_PREFIX_SEG is clear
    buf.write_u8(1)?;
    buf.write_u8(1)?;

    buf.write_u8(collection_type::VARRAY)?;
    buf.write_length(collection.len())?;

    for index in 0..collection.len() {
        let element = collection.element_at(index).and_then(|e| e.as_ref());
        buf.write_value_bytes(element.map(OracleNumber::as_bytes))?;
    }

    let total_len = buf.len() as u32;
    buf.patch_u32_be(length_pos + 1, total_len)?;
    Ok(buf.as_slice().to_vec())
}

// =============================================================================
// Header
// =============================================================================

/// Read an image header and return its flags
fn read_header(buf: &mut ReadBuffer, image_len: usize) -> Result<u8> {
    let flags = buf.read_u8()?;
    let version = buf.read_u8()?;
    if version != obj_flags::IMAGE_VERSION {
        return Err(Error::InvalidImage(format!(
            "unsupported image version {}",
            version
        )));
    }

    let declared = buf.read_length()? as usize;
    if declared != image_len {
        return Err(Error::InvalidImage(format!(
            "declared length {} does not match image length {}",
            declared, image_len
        )));
    }

    if flags & obj_flags::IS_DEGENERATE != 0 {
        return Err(Error::FeatureNotSupported(
            "object image stored in LOB".to_string(),
        ));
    }

    if flags & obj_flags::NO_PREFIX_SEG == 0 {
        let prefix_len = buf.read_length()? as usize;
        buf.skip(prefix_len)?;
    }

    Ok(flags)
}

/// Write a long length field with a zero value and return its position
fn write_length_placeholder(buf: &mut WriteBuffer) -> Result<usize> {
    let pos = buf.len();
    buf.write_u8(length::LONG_INDICATOR)?;
    buf.write_u32_be(0)?;
    Ok(pos)
}

fn expect_consumed(buf: &ReadBuffer) -> Result<()> {
    if buf.remaining() > 0 {
        return Err(Error::InvalidImage(format!(
            "{} trailing bytes after last attribute",
            buf.remaining()
        )));
    }
    Ok(())
}

/// Check for either null marker without consuming it
fn at_null_marker(buf: &ReadBuffer) -> Result<bool> {
    let marker = buf.peek_u8()?;
    Ok(marker == obj_flags::ATOMIC_NULL || marker == length::NULL_INDICATOR)
}

// =============================================================================
// Attributes
// =============================================================================

fn read_number(buf: &mut ReadBuffer, name: &str) -> Result<Field<OracleNumber>> {
    if buf.remaining() == 0 {
        return Ok(Field::Absent);
    }
    if buf.peek_u8()? == obj_flags::ATOMIC_NULL {
        buf.skip(1)?;
        return Ok(Field::Null);
    }
    match buf.read_value_bytes()? {
        None => Ok(Field::Null),
        Some(bytes) if bytes.is_empty() => Ok(Field::Null),
        Some(bytes) => OracleNumber::from_wire(bytes)
            .map(Field::Value)
            .map_err(|e| e.in_field(name)),
    }
}

fn write_number(buf: &mut WriteBuffer, value: Option<&OracleNumber>) -> Result<()> {
    buf.write_value_bytes(value.map(OracleNumber::as_bytes))
}

fn read_point(buf: &mut ReadBuffer) -> Result<Field<WirePoint>> {
    if buf.remaining() == 0 {
        return Ok(Field::Absent);
    }
    // A leading NULL indicator belongs to X, only ATOMIC_NULL nulls the point
    if buf.peek_u8()? == obj_flags::ATOMIC_NULL {
        buf.skip(1)?;
        return Ok(Field::Null);
    }
    Ok(Field::Value(WirePoint {
        x: read_number(buf, "SDO_POINT.X")?,
        y: read_number(buf, "SDO_POINT.Y")?,
        z: read_number(buf, "SDO_POINT.Z")?,
    }))
}

fn write_point(buf: &mut WriteBuffer, point: Option<&WirePoint>) -> Result<()> {
    match point {
        None => buf.write_u8(obj_flags::ATOMIC_NULL),
        Some(p) => {
            write_number(buf, p.x.value())?;
            write_number(buf, p.y.value())?;
            write_number(buf, p.z.value())
        }
    }
}

fn read_collection(buf: &mut ReadBuffer, name: &str) -> Result<Field<Varray<NumberElement>>> {
    if buf.remaining() == 0 {
        return Ok(Field::Absent);
    }
    if at_null_marker(buf)? {
        buf.skip(1)?;
        return Ok(Field::Null);
    }
    let len = buf.read_length()? as usize;
    let image = buf.read_bytes_owned(len)?;
    decode_collection_image(&image, name).map(Field::Value)
}

fn write_collection(buf: &mut WriteBuffer, collection: Option<&Varray<NumberElement>>) -> Result<()> {
    match collection {
        None => buf.write_u8(length::NULL_INDICATOR),
        Some(c) => {
            let image = encode_collection(c)?;
            buf.write_value_bytes(Some(image.as_slice()))
        }
    }
}

fn decode_collection_image(data: &[u8], name: &str) -> Result<Varray<NumberElement>> {
    if data.is_empty() {
        return Ok(Varray::new());
    }

    let mut buf = ReadBuffer::from(data);
    let flags = read_header(&mut buf, data.len())?;
    if flags & obj_flags::IS_COLLECTION == 0 {
        return Err(Error::InvalidImage(format!(
            "{}: expected a collection image",
            name
        )));
    }

    let coll_type = buf.read_u8()?;
    if !matches!(
        coll_type,
        collection_type::PLSQL_INDEX_TABLE | collection_type::NESTED_TABLE | collection_type::VARRAY
    ) {
        return Err(Error::InvalidImage(format!(
            "{}: unknown collection type {}",
            name, coll_type
        )));
    }

    let num_elements = buf.read_length()? as usize;
    // Each element takes at least one byte, so a larger count is corrupt
    if num_elements > buf.remaining() {
        return Err(Error::InvalidImage(format!(
            "{}: {} elements declared but only {} bytes remain",
            name,
            num_elements,
            buf.remaining()
        )));
    }

    let mut elements = Varray::with_capacity(num_elements);
    for index in 0..num_elements {
        if coll_type == collection_type::PLSQL_INDEX_TABLE {
            let _index = buf.read_u32_be()?;
        }
        let element = match buf.read_value_bytes()? {
            None => None,
            Some(bytes) if bytes.is_empty() => None,
            Some(bytes) => Some(
                OracleNumber::from_wire(bytes)
                    .map_err(|e| e.in_field(format!("{}[{}]", name, index + 1)))?,
            ),
        };
        elements.append(element);
    }
    expect_consumed(&buf)?;

    Ok(elements)
}
