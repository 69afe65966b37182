//! # Geometry Summary
//!
//! Counts shapes by geometry type and reports the dataset extent. Extents
//! are never recomputed from coordinates; the source's value is used as is.

use std::collections::HashMap;

use serde::Serialize;
use vshape_core::{BoundingBox, GeometryType, Shape, ShapeSource};

/// Number of shapes of one geometry type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeometryCount {
    pub geometry: GeometryType,
    pub count: usize,
}

/// Shape counts per geometry type, most common first.
///
/// Ties keep the order in which the types first appear. Unknown tags are
/// counted under their literal tag.
pub fn histogram(shapes: &[Shape]) -> Vec<GeometryCount> {
    let mut counts: Vec<GeometryCount> = Vec::new();
    let mut slots: HashMap<&GeometryType, usize> = HashMap::new();

    for shape in shapes {
        match slots.get(&shape.geometry) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(&shape.geometry, counts.len());
                counts.push(GeometryCount {
                    geometry: shape.geometry.clone(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort: ties stay in first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// The source's precomputed extent.
pub fn bounding_box(source: &dyn ShapeSource) -> Option<BoundingBox> {
    source.bounding_box()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vshape_core::{InMemorySource, Record};

    fn shapes(tags: &[&str]) -> Vec<Shape> {
        tags.iter().map(|t| Shape::new(*t)).collect()
    }

    #[test]
    fn most_common_first() {
        let h = histogram(&shapes(&["Polygon", "Polygon", "Point"]));
        assert_eq!(
            h,
            vec![
                GeometryCount { geometry: GeometryType::Polygon, count: 2 },
                GeometryCount { geometry: GeometryType::Point, count: 1 },
            ]
        );
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let h = histogram(&shapes(&["Point", "MultiPolygon", "Polygon", "MultiPolygon", "Point"]));
        let order: Vec<&str> = h.iter().map(|c| c.geometry.as_str()).collect();
        assert_eq!(order, ["Point", "MultiPolygon", "Polygon"]);
    }

    #[test]
    fn unknown_tags_are_counted_literally() {
        let h = histogram(&shapes(&["MultiPatch", "Polygon", "MultiPatch"]));
        assert_eq!(h[0].geometry, GeometryType::Other("MultiPatch".to_string()));
        assert_eq!(h[0].count, 2);
    }

    #[test]
    fn empty_histogram() {
        assert!(histogram(&[]).is_empty());
    }

    #[test]
    fn bounding_box_comes_from_the_source() {
        let bbox = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        let src = InMemorySource::new(Vec::new())
            .with_feature(Shape::new(GeometryType::Point), Record::default())
            .with_bounding_box(bbox);
        assert_eq!(bounding_box(&src), Some(bbox));
        assert_eq!(bounding_box(&InMemorySource::default()), None);
    }
}
