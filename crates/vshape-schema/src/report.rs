//! # Validation Report
//!
//! Runs every check against one source and gathers the outcomes. A report is
//! derived data: it is recomputed on every run and never persisted.

use serde::Serialize;
use vshape_core::{BoundingBox, FieldDescriptor, ShapeSource};

use crate::compare::{check_fields, FieldFinding, MatchMode};
use crate::geometry::{self, GeometryCount};
use crate::template::Template;
use crate::values::{check_allowed, check_required, AllowCheck, NullCheck};

/// Outcome of validating one shapefile against a template.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub match_mode: MatchMode,
    pub template_fields: Vec<FieldDescriptor>,
    pub actual_fields: Vec<FieldDescriptor>,
    pub shape_count: usize,
    pub record_count: usize,
    pub geometry: Vec<GeometryCount>,
    pub bounding_box: Option<BoundingBox>,
    pub field_count_matches: bool,
    pub fields_valid: bool,
    pub fields_equal: bool,
    pub field_findings: Vec<FieldFinding>,
    pub not_null: bool,
    pub null_checks: Vec<NullCheck>,
    pub values_correct: bool,
    pub allow_checks: Vec<AllowCheck>,
}

impl ValidationReport {
    /// True iff the field count matches and every field, not-null and
    /// allow-list check passed.
    pub fn passed(&self) -> bool {
        self.field_count_matches && self.fields_valid && self.not_null && self.values_correct
    }
}

/// Validate `source` against `template`.
pub fn validate(template: &Template, source: &dyn ShapeSource) -> ValidationReport {
    let actual = source.fields();
    let records = source.records();

    let fields = check_fields(template, actual);
    let null_checks = check_required(template, &fields, records);
    let allow_checks = check_allowed(template, &fields, records);

    let report = ValidationReport {
        match_mode: fields.match_mode,
        template_fields: template.descriptors(),
        actual_fields: actual.to_vec(),
        shape_count: source.shapes().len(),
        record_count: records.len(),
        geometry: geometry::histogram(source.shapes()),
        bounding_box: geometry::bounding_box(source),
        field_count_matches: fields.count_matches,
        fields_valid: fields.fields_valid,
        fields_equal: fields.fields_equal,
        field_findings: fields.findings,
        not_null: null_checks.iter().all(NullCheck::passed),
        null_checks,
        values_correct: allow_checks.iter().all(AllowCheck::passed),
        allow_checks,
    };

    tracing::info!(
        passed = report.passed(),
        field_count_matches = report.field_count_matches,
        fields_valid = report.fields_valid,
        not_null = report.not_null,
        values_correct = report.values_correct,
        shapes = report.shape_count,
        "validation complete"
    );
    report
}
