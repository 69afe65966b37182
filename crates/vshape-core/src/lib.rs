//! # vshape-core — Foundational Types for vshape
//!
//! The types every other vshape crate speaks: field descriptors, attribute
//! records, geometry tags, bounding boxes, the [`ShapeSource`] contract and
//! the error hierarchy.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vshape-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Descriptors and records are immutable once built by a source or template.

pub mod error;
pub mod field;
pub mod geometry;
pub mod record;
pub mod source;

// Re-export primary types for ergonomic imports.
pub use error::{CompareError, ConfigError, SourceError, VshapeError};
pub use field::{CompareStrength, FieldDescriptor, FieldType};
pub use geometry::{BoundingBox, GeometryType, Shape};
pub use record::Record;
pub use source::{InMemorySource, ShapeSource};
