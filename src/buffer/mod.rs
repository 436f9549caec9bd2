//! Buffer abstractions for object image encoding/decoding
//!
//! This module provides bounds-checked buffer types for reading and writing
//! the binary images that carry SDO_GEOMETRY values.

mod read;
mod write;

pub use read::ReadBuffer;
pub use write::WriteBuffer;
