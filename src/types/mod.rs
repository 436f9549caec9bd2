//! Oracle data type encoding and decoding
//!
//! This module provides the two wire encodings an SDO_GEOMETRY value is made
//! of: the Oracle NUMBER format and the object/collection image ("pickle")
//! format.

mod number;
mod pickle;

pub use number::{decode_oracle_number, encode_oracle_number, DecimalNumber, OracleNumber};
pub use pickle::{decode_collection, decode_geometry, encode_collection, encode_geometry};
