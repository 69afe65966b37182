//! # Attribute Records
//!
//! A record is one row of the attribute table, positionally aligned with the
//! source's field descriptors. Values are kept as the trimmed text of each
//! cell, which is what allow-lists are written against.

use serde::{Deserialize, Serialize};

/// One row of the attribute table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    values: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    deleted: bool,
}

impl Record {
    /// Build a live record from cell values.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            deleted: false,
        }
    }

    /// Mark this record as deleted (dBASE deletion flag `*`).
    pub fn into_deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    /// Whether the row carries the deletion flag.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Value at `position`, if the record has that many cells.
    pub fn get(&self, position: usize) -> Option<&str> {
        self.values.get(position).map(String::as_str)
    }

    /// True iff the cell at `position` exists and is not empty.
    ///
    /// Any text counts as a value, `?` included. Readers that know a column's
    /// type store an unknown logical as an empty cell.
    pub fn has_value(&self, position: usize) -> bool {
        matches!(self.get(position), Some(v) if !v.is_empty())
    }

    /// All cell values in field order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
