//! # Record Value Checks
//!
//! Not-null and allow-list checks over attribute records.
//!
//! Every check reports all offending records rather than stopping at the
//! first, and each field is evaluated independently of the others. Records
//! carrying the dBASE deletion flag are not data and are skipped. An empty
//! record sequence satisfies every check.

use serde::Serialize;
use vshape_core::Record;

use crate::compare::FieldCheck;
use crate::template::{AllowList, Template};

fn live(records: &[Record]) -> impl Iterator<Item = (usize, &Record)> {
    records.iter().enumerate().filter(|(_, r)| !r.is_deleted())
}

/// True iff every live record holds a value at `position`.
pub fn not_null(position: usize, records: &[Record]) -> bool {
    live(records).all(|(_, r)| r.has_value(position))
}

/// Indices of live records whose cell at `position` is null.
pub fn null_violations(position: usize, records: &[Record]) -> Vec<usize> {
    live(records)
        .filter(|(_, r)| !r.has_value(position))
        .map(|(i, _)| i)
        .collect()
}

/// True iff the record's value at `position` is one of `allowed`.
///
/// Matching is exact and case-sensitive.
pub fn value_in_allowlist(record: &Record, position: usize, allowed: &AllowList) -> bool {
    record.get(position).is_some_and(|v| allowed.contains(v))
}

/// An allow-list bound to a record position.
#[derive(Debug, Clone, Copy)]
pub struct AllowRule<'a> {
    pub position: usize,
    pub allowed: &'a AllowList,
}

/// True iff every live record satisfies every rule.
pub fn all_records_valid(records: &[Record], rules: &[AllowRule<'_>]) -> bool {
    live(records).all(|(_, r)| {
        rules
            .iter()
            .all(|rule| value_in_allowlist(r, rule.position, rule.allowed))
    })
}

/// A value outside its field's allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueViolation {
    pub record: usize,
    pub position: usize,
    /// `None` when the record has no cell at `position`.
    pub value: Option<String>,
}

/// Every (record, rule) pair that fails, in record order.
pub fn allowlist_violations(records: &[Record], rules: &[AllowRule<'_>]) -> Vec<ValueViolation> {
    let mut out = Vec::new();
    for (i, record) in live(records) {
        for rule in rules {
            if !value_in_allowlist(record, rule.position, rule.allowed) {
                out.push(ValueViolation {
                    record: i,
                    position: rule.position,
                    value: record.get(rule.position).map(str::to_string),
                });
            }
        }
    }
    out
}

/// Not-null outcome for one required field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NullCheck {
    pub key: String,
    /// Actual position, `None` if the field could not be located.
    pub position: Option<usize>,
    pub null_records: Vec<usize>,
}

impl NullCheck {
    pub fn passed(&self) -> bool {
        self.position.is_some() && self.null_records.is_empty()
    }
}

/// Allow-list outcome for one enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowCheck {
    pub key: String,
    pub position: Option<usize>,
    pub violations: Vec<ValueViolation>,
}

impl AllowCheck {
    pub fn passed(&self) -> bool {
        self.position.is_some() && self.violations.is_empty()
    }
}

/// Run the not-null check for every required template field.
///
/// Positions come from `fields`, so a field that was not located among the
/// actual fields fails its check instead of being read from the wrong column.
pub fn check_required(template: &Template, fields: &FieldCheck, records: &[Record]) -> Vec<NullCheck> {
    template
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| f.required)
        .map(|(index, f)| {
            let position = fields.position_of(index);
            NullCheck {
                key: f.key.clone(),
                position,
                null_records: position
                    .map(|p| null_violations(p, records))
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Run the allow-list check for every enumerated template field.
pub fn check_allowed(template: &Template, fields: &FieldCheck, records: &[Record]) -> Vec<AllowCheck> {
    template
        .fields()
        .iter()
        .enumerate()
        .filter_map(|(index, f)| template.allowed_values(&f.key).map(|list| (index, f, list)))
        .map(|(index, f, allowed)| {
            let position = fields.position_of(index);
            let violations = match position {
                Some(position) => allowlist_violations(records, &[AllowRule { position, allowed }]),
                None => Vec::new(),
            };
            AllowCheck {
                key: f.key.clone(),
                position,
                violations,
            }
        })
        .collect()
}
