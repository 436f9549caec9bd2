//! Read and load configuration
//!
//! # Examples
//!
//! ```rust
//! use oracle_sdo::{Config, PrintLevel};
//!
//! let config = Config::new()
//!     .print_level(PrintLevel::Detailed)
//!     .array_size(100)
//!     .bulk_ordinates(true);
//!
//! assert_eq!(config.array_size, 100);
//! assert!(config.decode_options().bulk_ordinates);
//! ```

use std::fmt;

use crate::codec::DecodeOptions;
use crate::error::{Error, Result};
use crate::printer::PrintLevel;

/// Default number of rows per fetch
pub const DEFAULT_ARRAY_SIZE: usize = 10;

/// Settings for the read and load drivers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Report verbosity for each fetched geometry
    pub print_level: PrintLevel,
    /// Rows requested per fetch (1 fetches row by row)
    pub array_size: usize,
    /// Extract ordinates with a bulk copy
    pub bulk_ordinates: bool,
}

impl Config {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the print level
    pub fn print_level(mut self, level: PrintLevel) -> Self {
        self.print_level = level;
        self
    }

    /// Set the number of rows per fetch (0 is treated as 1)
    pub fn array_size(mut self, size: usize) -> Self {
        self.array_size = size.max(1);
        self
    }

    /// Set the bulk ordinate extraction toggle
    pub fn bulk_ordinates(mut self, enabled: bool) -> Self {
        self.bulk_ordinates = enabled;
        self
    }

    /// Parse and set the print level from text such as `"2"` or `"summary"`
    pub fn with_print_level_str(self, level: &str) -> Result<Self> {
        Ok(self.print_level(level.parse()?))
    }

    /// Parse and set the array size from text
    pub fn with_array_size_str(self, size: &str) -> Result<Self> {
        let size = size
            .trim()
            .parse::<usize>()
            .map_err(|_| Error::InvalidConfig(format!("invalid array size '{}'", size)))?;
        Ok(self.array_size(size))
    }

    /// Options for the codec
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::new().bulk_ordinates(self.bulk_ordinates)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            print_level: PrintLevel::Summary,
            array_size: DEFAULT_ARRAY_SIZE,
            bulk_ordinates: false,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "print_level={:?} array_size={} bulk_ordinates={}",
            self.print_level, self.array_size, self.bulk_ordinates
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.print_level, PrintLevel::Summary);
        assert_eq!(config.array_size, DEFAULT_ARRAY_SIZE);
        assert!(!config.bulk_ordinates);
        assert_eq!(config.decode_options(), DecodeOptions::default());
    }

    #[test]
    fn test_builder() {
        let config = Config::new()
            .print_level(PrintLevel::Silent)
            .array_size(0)
            .bulk_ordinates(true);
        assert_eq!(config.print_level, PrintLevel::Silent);
        assert_eq!(config.array_size, 1);
        assert!(config.decode_options().bulk_ordinates);
    }

    #[test]
    fn test_from_strings() {
        let config = Config::new()
            .with_print_level_str("2")
            .unwrap()
            .with_array_size_str(" 25 ")
            .unwrap();
        assert_eq!(config.print_level, PrintLevel::Detailed);
        assert_eq!(config.array_size, 25);

        assert!(Config::new().with_array_size_str("many").is_err());
        assert!(Config::new().with_print_level_str("verbose").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Config::default().to_string(),
            "print_level=Summary array_size=10 bulk_ordinates=false"
        );
    }
}
