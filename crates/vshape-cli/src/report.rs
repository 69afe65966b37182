//! # Report Rendering
//!
//! Text layout: correct fields, fields found, shape and geometry counts,
//! coordinates, then the four verdicts.
//! Offending records are listed after the verdicts when there are any.

use std::io::{self, Write};

use vshape_schema::ValidationReport;

const RULE: &str = "===========================================";

/// Write the human-readable report.
pub fn render_text(report: &ValidationReport, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\n{RULE}")?;
    writeln!(out, " Shapefile check report:")?;
    writeln!(out, "{RULE}")?;

    writeln!(out, "\nCorrect fields:\n")?;
    for field in &report.template_fields {
        writeln!(out, "{field}")?;
    }

    writeln!(out, "\nFields in the checked shapefile:\n")?;
    for field in &report.actual_fields {
        writeln!(out, "{field}")?;
    }

    writeln!(out, "\n{RULE}")?;
    writeln!(out, "Shapes and geometries:")?;
    writeln!(out, "{RULE}")?;
    writeln!(
        out,
        "\nTotal number of shapes in the shapefile: {}",
        report.shape_count
    )?;
    for entry in &report.geometry {
        writeln!(out, "Number of {}s: {}", entry.geometry, entry.count)?;
    }

    match &report.bounding_box {
        Some(bbox) => writeln!(out, "\nCoordinates: {bbox}")?,
        None => writeln!(out, "\nCoordinates: undefined")?,
    }

    writeln!(out, "\nMatch mode: {}", report.match_mode)?;
    writeln!(out, "Number of fields match: {}", report.field_count_matches)?;
    writeln!(out, "Fields are valid: {}", report.fields_valid)?;
    writeln!(out, "Values are not null: {}", report.not_null)?;
    writeln!(out, "Field values are correct: {}", report.values_correct)?;

    render_details(report, out)?;

    writeln!(
        out,
        "\nResult: {}\n",
        if report.passed() { "PASS" } else { "FAIL" }
    )
}

fn render_details(report: &ValidationReport, out: &mut impl Write) -> io::Result<()> {
    if !report.field_findings.is_empty() {
        writeln!(out, "\nField findings:")?;
        for finding in &report.field_findings {
            writeln!(out, "  {finding}")?;
        }
    }

    let failed_nulls: Vec<_> = report.null_checks.iter().filter(|c| !c.passed()).collect();
    if !failed_nulls.is_empty() {
        writeln!(out, "\nNull values:")?;
        for check in failed_nulls {
            match check.position {
                None => writeln!(out, "  {}: field not found", check.key)?,
                Some(p) => writeln!(
                    out,
                    "  {} (position {p}): records {:?}",
                    check.key, check.null_records
                )?,
            }
        }
    }

    let failed_values: Vec<_> = report.allow_checks.iter().filter(|c| !c.passed()).collect();
    if !failed_values.is_empty() {
        writeln!(out, "\nDisallowed values:")?;
        for check in failed_values {
            if check.position.is_none() {
                writeln!(out, "  {}: field not found", check.key)?;
                continue;
            }
            for v in &check.violations {
                match &v.value {
                    Some(value) => {
                        writeln!(out, "  {} record {}: '{value}'", check.key, v.record)?
                    }
                    None => writeln!(out, "  {} record {}: no value", check.key, v.record)?,
                }
            }
        }
    }

    Ok(())
}

/// Write the report as pretty-printed JSON.
pub fn render_json(report: &ValidationReport, out: &mut impl Write) -> io::Result<()> {
    let mut doc = serde_json::to_value(report).map_err(io::Error::other)?;
    if let Some(obj) = doc.as_object_mut() {
        obj.insert("passed".to_string(), serde_json::Value::Bool(report.passed()));
    }
    serde_json::to_writer_pretty(&mut *out, &doc).map_err(io::Error::other)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vshape_core::{
        BoundingBox, FieldDescriptor, FieldType, GeometryType, InMemorySource, Record, Shape,
    };
    use vshape_schema::{validate, Template};

    const TEMPLATE: &str = r#"
fields:
  name: ["NAME", "C", 10, 0]
  kind: ["KIND", "C", 2, 0]
values:
  kind: [FH, FR]
required: [name]
"#;

    fn render(records: Vec<Record>) -> String {
        let template = Template::from_yaml_str(TEMPLATE).unwrap();
        let src = records.into_iter().fold(
            InMemorySource::new(vec![
                FieldDescriptor::new("NAME", FieldType::Character, 10, 0),
                FieldDescriptor::new("KIND", FieldType::Character, 2, 0),
            ])
            .with_bounding_box(BoundingBox::new(1.0, 2.0, 3.0, 4.0)),
            |s, r| s.with_feature(Shape::new(GeometryType::Point), r),
        );
        let mut out = Vec::new();
        render_text(&validate(&template, &src), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn passing_report_sections() {
        let text = render(vec![Record::new(["a", "FH"])]);
        assert!(text.contains("Correct fields:"));
        assert!(text.contains("['NAME', 'C', 10, 0]"));
        assert!(text.contains("Total number of shapes in the shapefile: 1"));
        assert!(text.contains("Number of Points: 1"));
        assert!(text.contains("Coordinates: [1, 2, 3, 4]"));
        assert!(text.contains("Number of fields match: true"));
        assert!(text.contains("Field values are correct: true"));
        assert!(text.contains("Result: PASS"));
        assert!(!text.contains("Disallowed values:"));
    }

    #[test]
    fn failing_report_lists_offenders() {
        let text = render(vec![Record::new(["", "FH"]), Record::new(["b", "XX"])]);
        assert!(text.contains("Values are not null: false"));
        assert!(text.contains("name (position 0): records [0]"));
        assert!(text.contains("kind record 1: 'XX'"));
        assert!(text.contains("Result: FAIL"));
    }

    #[test]
    fn empty_dataset_has_undefined_coordinates() {
        let text = render(Vec::new());
        assert!(text.contains("Coordinates: undefined"));
    }

    #[test]
    fn json_report_carries_verdict() {
        let template = Template::from_yaml_str(TEMPLATE).unwrap();
        let report = validate(&template, &InMemorySource::default());
        let mut out = Vec::new();
        render_json(&report, &mut out).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["passed"], false);
        assert_eq!(doc["field_count_matches"], false);
    }
}
