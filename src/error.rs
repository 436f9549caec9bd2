//! Error types for the SDO_GEOMETRY codec
//!
//! This module defines all error types that can occur while reading or writing
//! geometry images, converting Oracle NUMBER values, and moving geometries
//! between record sources and sinks.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the codec
#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum Error {
    // =========================================================================
    // Buffer Errors
    // =========================================================================
    /// Buffer underflow - not enough data to read
    #[error("buffer underflow: need {needed} bytes but only {available} available")]
    BufferUnderflow { needed: usize, available: usize },

    /// Buffer overflow - not enough space to write
    #[error("buffer overflow: need {needed} bytes but only {available} available")]
    BufferOverflow { needed: usize, available: usize },

    /// Invalid length indicator
    #[error("invalid length indicator: {0}")]
    InvalidLengthIndicator(u8),

    // =========================================================================
    // Image Errors
    // =========================================================================
    /// Malformed object or collection image
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Image uses a feature this codec does not handle
    #[error("feature not supported: {0}")]
    FeatureNotSupported(String),

    // =========================================================================
    // Codec Errors
    // =========================================================================
    /// A numeric field could not be converted to its native type
    #[error("conversion error in {field}: {message}")]
    Conversion { field: String, message: String },

    /// A flat sequence is not a whole multiple of its group size
    #[error("cardinality mismatch: {what} has {len} values, not a multiple of {group}")]
    CardinalityMismatch {
        what: &'static str,
        len: usize,
        group: usize,
    },

    /// Shape kind code outside the known range
    #[error("unknown shape kind: {0}")]
    UnknownShapeKind(i32),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Ingestion Errors
    // =========================================================================
    /// Malformed line in the text ingestion format
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Record sink rejected a row
    #[error("record sink error: {0}")]
    Sink(String),

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Underlying I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a conversion error for the named field
    pub fn conversion(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Conversion {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Re-label a conversion error with the attribute it occurred in
    ///
    /// Other errors pass through unchanged.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        match self {
            Error::Conversion { message, .. } => Error::Conversion {
                field: field.into(),
                message,
            },
            other => other,
        }
    }

    /// Check if this is a numeric conversion error
    pub fn is_conversion_error(&self) -> bool {
        matches!(self, Error::Conversion { .. })
    }

    /// Check if this is a cardinality error
    pub fn is_cardinality_error(&self) -> bool {
        matches!(self, Error::CardinalityMismatch { .. })
    }

    /// Check if this error came from a malformed image rather than bad data
    pub fn is_image_error(&self) -> bool {
        matches!(
            self,
            Error::BufferUnderflow { .. }
                | Error::BufferOverflow { .. }
                | Error::InvalidLengthIndicator(_)
                | Error::InvalidImage(_)
                | Error::FeatureNotSupported(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_error_display() {
        let err = Error::conversion("SDO_GTYPE", "Cannot parse as i64");
        assert_eq!(
            err.to_string(),
            "conversion error in SDO_GTYPE: Cannot parse as i64"
        );
    }

    #[test]
    fn test_in_field_relabels_conversion() {
        let err = Error::conversion("NUMBER", "bad").in_field("SDO_ORDINATES[3]");
        match err {
            Error::Conversion { field, message } => {
                assert_eq!(field, "SDO_ORDINATES[3]");
                assert_eq!(message, "bad");
            }
            _ => panic!("Expected Conversion"),
        }

        let err = Error::InvalidLengthIndicator(7).in_field("SDO_SRID");
        assert!(matches!(err, Error::InvalidLengthIndicator(7)));
    }

    #[test]
    fn test_cardinality_display() {
        let err = Error::CardinalityMismatch {
            what: "SDO_ORDINATES",
            len: 5,
            group: 2,
        };
        assert_eq!(
            err.to_string(),
            "cardinality mismatch: SDO_ORDINATES has 5 values, not a multiple of 2"
        );
        assert!(err.is_cardinality_error());
        assert!(!err.is_conversion_error());
    }

    #[test]
    fn test_is_image_error() {
        assert!(Error::InvalidImage("x".into()).is_image_error());
        assert!(Error::BufferUnderflow {
            needed: 4,
            available: 1
        }
        .is_image_error());
        assert!(!Error::UnknownShapeKind(9).is_image_error());
    }
}
