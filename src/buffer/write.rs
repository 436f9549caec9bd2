//! Write buffer for encoding object images
//!
//! Provides methods for writing bytes, big-endian integers and the
//! length-prefixed fields of the object image format.

use bytes::{BufMut, Bytes, BytesMut};

use crate::constants::length;
use crate::error::{Error, Result};

/// A buffer for writing image data
#[derive(Debug)]
pub struct WriteBuffer {
    /// The underlying byte buffer
    data: BytesMut,
    /// Maximum capacity (for bounded images)
    max_capacity: Option<usize>,
}

impl WriteBuffer {
    /// Create a new WriteBuffer with default capacity
    pub fn new() -> Self {
        Self {
            data: BytesMut::with_capacity(256),
            max_capacity: None,
        }
    }

    /// Create a new WriteBuffer with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            max_capacity: None,
        }
    }

    /// Create a new WriteBuffer with a maximum capacity limit
    pub fn with_max_capacity(capacity: usize, max_capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            max_capacity: Some(max_capacity),
        }
    }

    /// Get the current length of data in the buffer
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the buffer contents as a byte slice
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Freeze the buffer into immutable Bytes
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    #[inline]
    fn ensure_capacity(&self, n: usize) -> Result<()> {
        if let Some(max) = self.max_capacity {
            if self.data.len() + n > max {
                return Err(Error::BufferOverflow {
                    needed: n,
                    available: max.saturating_sub(self.data.len()),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Raw writes
    // =========================================================================

    /// Write a single byte
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.ensure_capacity(1)?;
        self.data.put_u8(value);
        Ok(())
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_capacity(bytes.len())?;
        self.data.put_slice(bytes);
        Ok(())
    }

    /// Write a 32-bit unsigned integer in big-endian format
    pub fn write_u32_be(&mut self, value: u32) -> Result<()> {
        self.ensure_capacity(4)?;
        self.data.put_u32(value);
        Ok(())
    }

    /// Overwrite 4 bytes at `pos` with a big-endian u32
    pub fn patch_u32_be(&mut self, pos: usize, value: u32) -> Result<()> {
        if pos + 4 > self.data.len() {
            return Err(Error::BufferOverflow {
                needed: 4,
                available: self.data.len().saturating_sub(pos),
            });
        }
        self.data[pos..pos + 4].copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    // =========================================================================
    // Image length fields
    // =========================================================================

    /// Write an image length (1 byte if <= 245, otherwise 254 + 4-byte BE)
    pub fn write_length(&mut self, len: usize) -> Result<()> {
        if len <= length::MAX_SHORT as usize {
            self.write_u8(len as u8)
        } else {
            let len = u32::try_from(len)
                .map_err(|_| Error::InvalidImage(format!("length {} exceeds u32", len)))?;
            self.write_u8(length::LONG_INDICATOR)?;
            self.write_u32_be(len)
        }
    }

    /// Write a length-prefixed value, or the NULL indicator for None
    pub fn write_value_bytes(&mut self, bytes: Option<&[u8]>) -> Result<()> {
        match bytes {
            None => self.write_u8(length::NULL_INDICATOR),
            Some(b) => {
                self.write_length(b.len())?;
                self.write_bytes(b)
            }
        }
    }
}

impl Default for WriteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[u8]> for WriteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_u8() {
        let mut buf = WriteBuffer::new();
        buf.write_u8(0x42).unwrap();
        assert_eq!(buf.as_slice(), &[0x42]);
    }

    #[test]
    fn test_write_u32_be() {
        let mut buf = WriteBuffer::new();
        buf.write_u32_be(0x01020304).unwrap();
        assert_eq!(buf.as_slice(), &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_length_encoding_short() {
        let mut buf = WriteBuffer::new();
        buf.write_length(100).unwrap();
        assert_eq!(buf.as_slice(), &[100u8]);
    }

    #[test]
    fn test_length_encoding_boundary() {
        let mut buf = WriteBuffer::new();
        buf.write_length(245).unwrap();
        assert_eq!(buf.as_slice(), &[245u8]);

        let mut buf = WriteBuffer::new();
        buf.write_length(246).unwrap();
        assert_eq!(buf.as_slice(), &[254, 0, 0, 0, 246]);
    }

    #[test]
    fn test_length_encoding_long() {
        let mut buf = WriteBuffer::new();
        buf.write_length(1000).unwrap();
        assert_eq!(buf.as_slice(), &[254, 0, 0, 3, 232]);
    }

    #[test]
    fn test_write_value_bytes() {
        let mut buf = WriteBuffer::new();
        buf.write_value_bytes(None).unwrap();
        buf.write_value_bytes(Some(&[0xc1, 0x02])).unwrap();
        assert_eq!(buf.as_slice(), &[0xff, 0x02, 0xc1, 0x02]);
    }

    #[test]
    fn test_patch_u32_be() {
        let mut buf = WriteBuffer::new();
        buf.write_u8(0xfe).unwrap();
        buf.write_u32_be(0).unwrap();
        buf.patch_u32_be(1, 0x0a0b0c0d).unwrap();
        assert_eq!(buf.as_slice(), &[0xfe, 0x0a, 0x0b, 0x0c, 0x0d]);
        assert!(buf.patch_u32_be(3, 1).is_err());
    }

    #[test]
    fn test_max_capacity() {
        let mut buf = WriteBuffer::with_max_capacity(4, 4);
        buf.write_u32_be(1).unwrap();
        assert!(matches!(
            buf.write_u8(0),
            Err(Error::BufferOverflow { needed: 1, available: 0 })
        ));
    }
}
