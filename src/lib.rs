#![warn(missing_docs)]
//! # oracle-sdo
//!
//! A pure Rust codec for Oracle Spatial `MDSYS.SDO_GEOMETRY` values. No OCI
//! or ODPI-C dependencies required.
//!
//! This crate converts geometries between three forms:
//!
//! - the binary object image Oracle uses on the wire ([`types`])
//! - a wire-form value mirroring the object attributes, with three-state
//!   nullability on every field ([`wire`])
//! - a native geometry with plain integers, floats and vectors ([`Geometry`])
//!
//! ## Features
//!
//! - **Pure Rust** - Oracle NUMBER and object image formats implemented natively
//! - **Null-aware** - absent, NULL and present attributes are kept apart
//! - **Pluggable I/O** - record sources and sinks are small traits
//! - **Diagnostics** - summary and detailed geometry reports
//!
//! ## Quick Start
//!
//! ```rust
//! use oracle_sdo::{codec, types, Geometry, ShapeKind};
//!
//! # fn main() -> oracle_sdo::Result<()> {
//! // Build a geometry and encode it to a binary image
//! let line = Geometry::line_string(2, 8307, vec![10.0, 20.0, 30.0, 40.0])?;
//! let image = types::encode_geometry(&codec::encode(&line)?)?;
//!
//! // Decode it again
//! let wire = types::decode_geometry(&image)?;
//! let decoded = codec::decode(&wire)?.expect("not NULL");
//!
//! assert_eq!(decoded.shape_kind()?, ShapeKind::LineString);
//! assert_eq!(decoded.point_count(), 2);
//! assert_eq!(decoded, line);
//! # Ok(())
//! # }
//! ```
//!
//! ## Reading and Loading
//!
//! ```rust
//! use oracle_sdo::record::{load_geometries, read_geometries, MemorySink, MemorySource};
//! use oracle_sdo::{Config, PrintLevel};
//!
//! # fn main() -> oracle_sdo::Result<()> {
//! let mut sink = MemorySink::new();
//! load_geometries("1 2 2 10 20 30 40\n".as_bytes(), &mut sink)?;
//!
//! let mut source = MemorySource::new(sink.into_rows().into_iter().map(|(_, wire)| wire));
//! let mut out = Vec::new();
//! read_geometries(&mut source, &Config::new().print_level(PrintLevel::Summary), &mut out)?;
//!
//! let report = String::from_utf8(out).unwrap();
//! assert!(report.starts_with("Row 1: Geometry\n  Type: 2 (LINESTRING)\n"));
//! assert!(report.ends_with("1 rows fetched in 1 fetches\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Type Mapping
//!
//! | SDO_GEOMETRY attribute | Wire form | Native form |
//! |------------------------|-----------|-------------|
//! | SDO_GTYPE | `Field<OracleNumber>` | `i32` |
//! | SDO_SRID | `Field<OracleNumber>` | `i32` |
//! | SDO_POINT | `Field<WirePoint>` | `Option<Point>` |
//! | SDO_ELEM_INFO | `Field<Varray<Option<OracleNumber>>>` | `Option<Vec<u32>>` |
//! | SDO_ORDINATES | `Field<Varray<Option<OracleNumber>>>` | `Option<Vec<f64>>` |
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events and installs
//! no subscriber.

pub mod buffer;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod printer;
pub mod record;
pub mod text;
pub mod types;
pub mod wire;

// Re-export commonly used types
pub use codec::{decode, decode_with, encode, encode_into, DecodeOptions};
pub use config::Config;
pub use error::{Error, Result};
pub use geometry::{ElementInfo, ElementRole, Geometry, Point, ShapeKind};
pub use printer::{print_geometry, print_point, GeometryReport, PrintLevel};
pub use record::{LoadSummary, ReadSummary, RecordSink, RecordSource};
pub use types::OracleNumber;
pub use wire::{Collection, Field, Indicator, Varray, WireGeometry, WirePoint};
