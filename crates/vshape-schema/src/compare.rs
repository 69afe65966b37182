//! # Field Comparison
//!
//! Compares template descriptors against the descriptors actually present in
//! a shapefile.
//!
//! The primitive comparators (`compare_2`, `compare_3`, `compare_exact`) are
//! strictly positional: position `i` of the template is compared with
//! position `i` of the actual fields, so reordering either sequence changes
//! the result. [`check_fields`] applies each template field's own
//! [`CompareStrength`] under the template's [`MatchMode`], which is either
//! the same positional join or a join on descriptor name.

use std::fmt;

use serde::{Deserialize, Serialize};
use vshape_core::{CompareError, CompareStrength, FieldDescriptor};

use crate::template::Template;

/// How template fields are joined to actual fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Template field `i` is compared with actual field `i`.
    #[default]
    Positional,
    /// Template fields are looked up among actual fields by name.
    ByName,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional => f.write_str("positional"),
            Self::ByName => f.write_str("by_name"),
        }
    }
}

fn pair_at<'a>(
    position: usize,
    template: &'a [FieldDescriptor],
    actual: &'a [FieldDescriptor],
) -> Result<(&'a FieldDescriptor, &'a FieldDescriptor), CompareError> {
    match (template.get(position), actual.get(position)) {
        (Some(t), Some(a)) => Ok((t, a)),
        _ => Err(CompareError::IndexOutOfRange {
            position,
            template_len: template.len(),
            actual_len: actual.len(),
        }),
    }
}

/// Name and type agree at `position`.
///
/// # Errors
///
/// `CompareError::IndexOutOfRange` if either sequence is shorter than `position + 1`.
pub fn compare_2(
    position: usize,
    template: &[FieldDescriptor],
    actual: &[FieldDescriptor],
) -> Result<bool, CompareError> {
    compare_with(CompareStrength::NameType, position, template, actual)
}

/// Name, type and length agree at `position`.
///
/// # Errors
///
/// `CompareError::IndexOutOfRange` if either sequence is shorter than `position + 1`.
pub fn compare_3(
    position: usize,
    template: &[FieldDescriptor],
    actual: &[FieldDescriptor],
) -> Result<bool, CompareError> {
    compare_with(CompareStrength::NameTypeLength, position, template, actual)
}

/// All four attributes agree at `position`.
///
/// # Errors
///
/// `CompareError::IndexOutOfRange` if either sequence is shorter than `position + 1`.
pub fn compare_exact(
    position: usize,
    template: &[FieldDescriptor],
    actual: &[FieldDescriptor],
) -> Result<bool, CompareError> {
    compare_with(CompareStrength::Exact, position, template, actual)
}

/// Compare `position` under `strength`.
pub fn compare_with(
    strength: CompareStrength,
    position: usize,
    template: &[FieldDescriptor],
    actual: &[FieldDescriptor],
) -> Result<bool, CompareError> {
    let (t, a) = pair_at(position, template, actual)?;
    Ok(t.matches(a, strength))
}

/// Whole-schema equality: same length and every attribute of every position.
pub fn fields_equal(template: &[FieldDescriptor], actual: &[FieldDescriptor]) -> bool {
    template == actual
}

pub fn field_count_matches(template: &[FieldDescriptor], actual: &[FieldDescriptor]) -> bool {
    template.len() == actual.len()
}

/// A single disagreement between template and actual fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldFinding {
    /// The template field has no counterpart among the actual fields.
    Missing {
        key: String,
        expected: FieldDescriptor,
    },
    /// The counterpart exists but disagrees under the field's strength.
    Mismatch {
        key: String,
        position: usize,
        strength: CompareStrength,
        expected: FieldDescriptor,
        actual: FieldDescriptor,
    },
    /// An actual field no template field claims.
    Unexpected {
        position: usize,
        actual: FieldDescriptor,
    },
}

impl FieldFinding {
    /// Whether this finding makes the declared fields invalid. Unexpected
    /// extra fields only affect the field-count check.
    pub fn invalidates_fields(&self) -> bool {
        !matches!(self, Self::Unexpected { .. })
    }
}

impl fmt::Display for FieldFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { key, expected } => write!(f, "{key}: missing, expected {expected}"),
            Self::Mismatch {
                key,
                position,
                strength,
                expected,
                actual,
            } => write!(
                f,
                "{key}: position {position} is {actual}, expected {expected} ({strength})"
            ),
            Self::Unexpected { position, actual } => {
                write!(f, "position {position}: unexpected field {actual}")
            }
        }
    }
}

/// Outcome of comparing a template against actual fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCheck {
    pub match_mode: MatchMode,
    pub count_matches: bool,
    /// Every template field is present and matches under its strength.
    pub fields_valid: bool,
    /// Strict whole-schema equality.
    pub fields_equal: bool,
    pub findings: Vec<FieldFinding>,
    /// Actual position of each template field, in template order.
    #[serde(skip)]
    pub positions: Vec<Option<usize>>,
}

impl FieldCheck {
    /// Actual position resolved for template field `index`.
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.positions.get(index).copied().flatten()
    }
}

/// Resolve each template field to an actual position under the template's
/// match mode.
pub fn resolve_positions(template: &Template, actual: &[FieldDescriptor]) -> Vec<Option<usize>> {
    match template.match_mode() {
        MatchMode::Positional => (0..template.len())
            .map(|i| (i < actual.len()).then_some(i))
            .collect(),
        MatchMode::ByName => template
            .fields()
            .iter()
            .map(|f| actual.iter().position(|a| a.name == f.descriptor.name))
            .collect(),
    }
}

/// Compare every template field with its counterpart under its own strength.
pub fn check_fields(template: &Template, actual: &[FieldDescriptor]) -> FieldCheck {
    let positions = resolve_positions(template, actual);
    let mut findings = Vec::new();

    for (field, position) in template.fields().iter().zip(&positions) {
        match position {
            None => findings.push(FieldFinding::Missing {
                key: field.key.clone(),
                expected: field.descriptor.clone(),
            }),
            Some(p) => {
                let found = &actual[*p];
                if !field.descriptor.matches(found, field.strength) {
                    findings.push(FieldFinding::Mismatch {
                        key: field.key.clone(),
                        position: *p,
                        strength: field.strength,
                        expected: field.descriptor.clone(),
                        actual: found.clone(),
                    });
                }
            }
        }
    }

    for (position, found) in actual.iter().enumerate() {
        if !positions.contains(&Some(position)) {
            findings.push(FieldFinding::Unexpected {
                position,
                actual: found.clone(),
            });
        }
    }

    let expected = template.descriptors();
    let check = FieldCheck {
        match_mode: template.match_mode(),
        count_matches: field_count_matches(&expected, actual),
        fields_valid: !findings.iter().any(FieldFinding::invalidates_fields),
        fields_equal: fields_equal(&expected, actual),
        findings,
        positions,
    };

    tracing::debug!(
        match_mode = %check.match_mode,
        count_matches = check.count_matches,
        fields_valid = check.fields_valid,
        findings = check.findings.len(),
        "compared fields"
    );
    check
}
