//! # ShapeSource Contract
//!
//! The read-only view of a loaded shapefile that the validation engine
//! consumes. Implementations load everything up front; every accessor is
//! side-effect free afterwards.

use crate::field::FieldDescriptor;
use crate::geometry::{BoundingBox, Shape};
use crate::record::Record;

/// Read-only access to a loaded shapefile.
pub trait ShapeSource {
    /// Attribute field descriptors, deletion flag excluded.
    fn fields(&self) -> &[FieldDescriptor];

    /// Shapes in file order.
    fn shapes(&self) -> &[Shape];

    /// Attribute records; record `i` describes shape `i`.
    fn records(&self) -> &[Record];

    /// Dataset extent, `None` when there are no shapes.
    fn bounding_box(&self) -> Option<BoundingBox>;
}

/// A [`ShapeSource`] held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    fields: Vec<FieldDescriptor>,
    shapes: Vec<Shape>,
    records: Vec<Record>,
    bounding_box: Option<BoundingBox>,
}

impl InMemorySource {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Append a shape and its attribute record.
    pub fn with_feature(mut self, shape: Shape, record: Record) -> Self {
        self.shapes.push(shape);
        self.records.push(record);
        self
    }

    pub fn with_bounding_box(mut self, bbox: BoundingBox) -> Self {
        self.bounding_box = Some(bbox);
        self
    }
}

impl ShapeSource for InMemorySource {
    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn records(&self) -> &[Record] {
        &self.records
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        if self.shapes.is_empty() {
            None
        } else {
            self.bounding_box
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;
    use crate::geometry::GeometryType;

    #[test]
    fn empty_source_has_no_extent() {
        let src = InMemorySource::new(vec![FieldDescriptor::new("ID", FieldType::Number, 9, 0)])
            .with_bounding_box(BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        assert!(src.bounding_box().is_none());
        assert_eq!(src.fields().len(), 1);
    }

    #[test]
    fn features_stay_aligned() {
        let src = InMemorySource::new(Vec::new())
            .with_feature(Shape::new(GeometryType::Point), Record::new(["a"]))
            .with_feature(Shape::new(GeometryType::Polygon), Record::new(["b"]));
        assert_eq!(src.shapes()[1].geometry, GeometryType::Polygon);
        assert_eq!(src.records()[1].get(0), Some("b"));
    }
}
