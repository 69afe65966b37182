//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout vshape. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every error here is terminal for the current run. Nothing is retried.
//! - Check failures (field mismatch, null cell, disallowed value) are data
//!   findings carried in the validation report, never errors.
//! - Source and configuration errors carry the offending path or key.

use thiserror::Error;

/// Top-level error type for a validation run.
#[derive(Error, Debug)]
pub enum VshapeError {
    /// The shapefile path argument was not supplied.
    #[error("usage: {0}")]
    Usage(String),

    /// The shapefile path does not exist on disk.
    #[error("the shape file {0} was not found")]
    PathNotFound(String),

    /// The shapefile could not be opened or read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The template configuration is malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A comparator was called with a position outside the field sequences.
    #[error(transparent)]
    Compare(#[from] CompareError),
}

/// Error opening or reading a shapefile.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The path does not carry the `.shp` suffix.
    #[error("cannot connect to shapefile {path}: not a .shp path")]
    NotAShapefile {
        /// The rejected path.
        path: String,
    },

    /// One of the `.shp`/`.shx`/`.dbf` files is missing, corrupt or truncated.
    #[error("cannot read {path}: {reason}")]
    Read {
        /// The file that failed to read.
        path: String,
        /// Why the read failed.
        reason: String,
    },
}

/// Error loading the template configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The template file could not be read.
    #[error("cannot read template {path}: {reason}")]
    Read {
        /// Path to the template file.
        path: String,
        /// Underlying IO failure.
        reason: String,
    },

    /// The template document is not valid YAML or lacks a required section.
    #[error("invalid template document: {0}")]
    Parse(String),

    /// A `fields` entry is not decodable into `[name, type, length, decimal]`.
    #[error("malformed field entry '{key}': {reason}")]
    MalformedField {
        /// Template key of the entry.
        key: String,
        /// Why decoding failed.
        reason: String,
    },

    /// A `values` entry is not decodable into a list of strings.
    #[error("malformed allowed values for '{key}': {reason}")]
    MalformedValues {
        /// Template key of the entry.
        key: String,
        /// Why decoding failed.
        reason: String,
    },

    /// A `values` or `required` entry names a key not declared in `fields`.
    #[error("'{key}' in section '{section}' is not a declared field")]
    UnknownKey {
        /// Section the key appeared in.
        section: String,
        /// The undeclared key.
        key: String,
    },
}

/// Misuse of the field comparator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    /// `position` is beyond the end of the template or actual fields.
    #[error("field position {position} out of range (template has {template_len}, actual has {actual_len})")]
    IndexOutOfRange {
        /// Requested position.
        position: usize,
        /// Number of template fields.
        template_len: usize,
        /// Number of actual fields.
        actual_len: usize,
    },
}
