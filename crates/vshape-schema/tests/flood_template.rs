//! Integration test: the shipped `vshape.yaml` flood map template against
//! in-memory sources.
//!
//! Covers the whole-run scenarios: a conforming dataset, a dataset missing
//! its last field, and a dataset with an empty mandatory cell.

use vshape_core::{
    BoundingBox, CompareError, FieldDescriptor, FieldType, GeometryType, InMemorySource, Record,
    Shape,
};
use vshape_schema::compare::{compare_2, compare_3};
use vshape_schema::{validate, FieldFinding, Template};

const TEMPLATE: &str = include_str!("../../../vshape.yaml");

fn template() -> Template {
    Template::from_yaml_str(TEMPLATE).expect("shipped template should parse")
}

fn flood_fields() -> Vec<FieldDescriptor> {
    use FieldType::{Character as C, Number as N};
    vec![
        FieldDescriptor::new("FEATUREID", C, 20, 0),
        FieldDescriptor::new("TYPECODE", C, 2, 0),
        FieldDescriptor::new("RBDCODE", C, 12, 0),
        FieldDescriptor::new("AREA", N, 24, 15),
        FieldDescriptor::new("EUUOMCODE", C, 20, 0),
        FieldDescriptor::new("SOURCECODE", C, 2, 0),
        FieldDescriptor::new("DEPTH", N, 19, 11),
        FieldDescriptor::new("SCENARIO", C, 2, 0),
        FieldDescriptor::new("RUNTYPE", C, 10, 0),
        FieldDescriptor::new("STATUS", C, 10, 0),
    ]
}

fn row(featureid: &str, area: &str) -> Record {
    Record::new([
        featureid, "FH", "IESE", area, "UOM_0701", "F", "0.75", "M", "CURRENT", "FINAL",
    ])
}

fn source(fields: Vec<FieldDescriptor>, records: Vec<Record>) -> InMemorySource {
    records.into_iter().fold(
        InMemorySource::new(fields)
            .with_bounding_box(BoundingBox::new(620000.0, 710000.0, 640000.0, 730000.0)),
        |src, r| src.with_feature(Shape::new(GeometryType::Polygon), r),
    )
}

#[test]
fn conforming_dataset_passes_every_check() {
    let src = source(
        flood_fields(),
        vec![row("F-001", "12.5"), row("F-002", "3.25"), row("F-003", "0.5")],
    );
    let report = validate(&template(), &src);

    assert!(report.field_count_matches);
    assert!(report.fields_valid);
    assert!(report.not_null);
    assert!(report.values_correct);
    assert!(report.passed());
    assert_eq!(report.shape_count, 3);
    assert_eq!(report.geometry.len(), 1);
    assert_eq!(report.geometry[0].geometry, GeometryType::Polygon);
}

#[test]
fn nine_field_dataset_fails_count_and_range_checks() {
    let mut fields = flood_fields();
    fields.pop();
    let records: Vec<Record> = (0..3)
        .map(|i| {
            let full = row(&format!("F-{i}"), "1.0");
            Record::new(full.values()[..9].iter().cloned())
        })
        .collect();
    let src = source(fields.clone(), records);
    let t = template();
    let report = validate(&t, &src);

    assert!(!report.field_count_matches);
    assert!(!report.fields_valid);
    assert!(matches!(
        report.field_findings.as_slice(),
        [FieldFinding::Missing { key, .. }] if key == "status"
    ));

    let expected = t.descriptors();
    for position in 9..expected.len() {
        assert!(matches!(
            compare_2(position, &expected, &fields),
            Err(CompareError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            compare_3(position, &expected, &fields),
            Err(CompareError::IndexOutOfRange { .. })
        ));
    }
    assert!(compare_3(8, &expected, &fields).unwrap());
}

#[test]
fn empty_mandatory_cell_fails_only_its_field() {
    let src = source(
        flood_fields(),
        vec![row("F-001", "12.5"), row("F-002", ""), row("F-003", "0.5")],
    );
    let report = validate(&template(), &src);

    assert!(!report.not_null);
    let failed: Vec<&str> = report
        .null_checks
        .iter()
        .filter(|c| !c.passed())
        .map(|c| c.key.as_str())
        .collect();
    assert_eq!(failed, ["area"]);
    let area = report.null_checks.iter().find(|c| c.key == "area").unwrap();
    assert_eq!(area.null_records, vec![1]);

    assert!(report.fields_valid);
    assert!(report.values_correct);
}

#[test]
fn disallowed_values_are_all_reported() {
    let mut bad_status = row("F-002", "1.0").values().to_vec();
    bad_status[9] = "final".to_string();
    let mut bad_scenario = row("F-003", "1.0").values().to_vec();
    bad_scenario[7] = "X".to_string();

    let src = source(
        flood_fields(),
        vec![row("F-001", "1.0"), Record::new(bad_status), Record::new(bad_scenario)],
    );
    let report = validate(&template(), &src);

    assert!(!report.values_correct);
    let failing: Vec<(&str, usize)> = report
        .allow_checks
        .iter()
        .flat_map(|c| c.violations.iter().map(move |v| (c.key.as_str(), v.record)))
        .collect();
    assert_eq!(failing, [("scenario", 2), ("status", 1)]);
}
