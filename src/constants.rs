//! Image format and SDO_GEOMETRY constants
//!
//! Flag bits and length indicators of the Oracle object image ("pickle")
//! format, plus the numeric codes used inside SDO_GEOMETRY values.

// =============================================================================
// Object Image Flags
// =============================================================================

/// Image header flags and markers
pub mod obj_flags {
    /// Object is version 8.1 format
    pub const IS_VERSION_81: u8 = 0x80;
    /// Object is degenerate (stored out of line in a LOB)
    pub const IS_DEGENERATE: u8 = 0x10;
    /// Object is a collection
    pub const IS_COLLECTION: u8 = 0x08;
    /// No prefix segment
    pub const NO_PREFIX_SEG: u8 = 0x04;
    /// Current image version
    pub const IMAGE_VERSION: u8 = 1;
    /// Atomic NULL indicator
    pub const ATOMIC_NULL: u8 = 253;
}

// =============================================================================
// Length Encoding
// =============================================================================

/// Length prefixes used inside images
pub mod length {
    /// Maximum length that fits in a single byte
    pub const MAX_SHORT: u8 = 245;
    /// Indicates a 4-byte big-endian length follows
    pub const LONG_INDICATOR: u8 = 254;
    /// Indicates a NULL value
    pub const NULL_INDICATOR: u8 = 255;
}

/// Collection type codes written after the collection prefix segment
pub mod collection_type {
    /// PL/SQL index-by table
    pub const PLSQL_INDEX_TABLE: u8 = 1;
    /// Nested table
    pub const NESTED_TABLE: u8 = 2;
    /// VARRAY (used by SDO_ELEM_INFO_ARRAY and SDO_ORDINATE_ARRAY)
    pub const VARRAY: u8 = 3;
}

// =============================================================================
// SDO_GEOMETRY
// =============================================================================

/// Attribute names of MDSYS.SDO_GEOMETRY, in image order
pub mod attr {
    /// Packed geometry type and dimensionality
    pub const SDO_GTYPE: &str = "SDO_GTYPE";
    /// Spatial reference system id
    pub const SDO_SRID: &str = "SDO_SRID";
    /// Inline point shortcut
    pub const SDO_POINT: &str = "SDO_POINT";
    /// Element directory
    pub const SDO_ELEM_INFO: &str = "SDO_ELEM_INFO";
    /// Flat ordinate buffer
    pub const SDO_ORDINATES: &str = "SDO_ORDINATES";
}

/// Divisor separating dimensionality from shape kind in an SDO_GTYPE
pub const GTYPE_DIM_FACTOR: i32 = 1000;

/// Number of slots per element descriptor in SDO_ELEM_INFO
pub const ELEM_INFO_GROUP: usize = 3;

/// Element type codes (second slot of each SDO_ELEM_INFO triple)
pub mod etype {
    /// Point or point cluster
    pub const POINT: u32 = 1;
    /// Line string
    pub const LINE_STRING: u32 = 2;
    /// Polygon ring of unknown orientation
    pub const POLYGON: u32 = 3;
    /// Compound line string (header triple)
    pub const COMPOUND_LINE_STRING: u32 = 4;
    /// Exterior polygon ring
    pub const EXTERIOR_RING: u32 = 1003;
    /// Interior polygon ring
    pub const INTERIOR_RING: u32 = 2003;
    /// Compound exterior ring (header triple)
    pub const COMPOUND_EXTERIOR_RING: u32 = 1005;
    /// Compound interior ring (header triple)
    pub const COMPOUND_INTERIOR_RING: u32 = 2005;
}

/// Straight-segment interpretation code
pub const INTERPRETATION_STRAIGHT: u32 = 1;
