//! # vshape-schema — Schema Validation Engine
//!
//! Compares a declared [`Template`] against a loaded [`ShapeSource`] and
//! produces a [`ValidationReport`].
//!
//! ## Checks
//!
//! - [`compare`]: positional `compare_2`/`compare_3` primitives, whole-schema
//!   equality, and [`check_fields`], which applies each template field's own
//!   comparison strength under the template's [`MatchMode`].
//! - [`values`]: not-null and allow-list checks that collect every offending
//!   record instead of stopping at the first.
//! - [`geometry`]: geometry-type histogram and dataset extent.
//!
//! ## Crate Policy
//!
//! - Depends only on `vshape-core` internally; never reads shapefiles itself.
//! - Check failures are findings in the report, never errors.
//! - No process-wide state: the template is passed by reference into every check.
//!
//! [`ShapeSource`]: vshape_core::ShapeSource

pub mod compare;
pub mod geometry;
pub mod report;
pub mod template;
pub mod values;

pub use compare::{check_fields, FieldCheck, FieldFinding, MatchMode};
pub use geometry::GeometryCount;
pub use report::{validate, ValidationReport};
pub use template::{AllowList, Template, TemplateField};
pub use values::{AllowCheck, NullCheck, ValueViolation};
