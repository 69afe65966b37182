//! # Geometry Tags and Extents
//!
//! The validation engine never looks at coordinates. It needs the geometry
//! type of every shape (for the histogram) and the dataset extent that the
//! shapefile header already records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Geometry type of a single shape, named the GeoJSON way.
///
/// Multi-part polylines and polygons with more than one outer ring are
/// reported as their `Multi*` counterparts. Anything the engine does not
/// know by name keeps its literal tag in [`GeometryType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum GeometryType {
    /// A record with no geometry.
    Null,
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    /// Any other tag, kept verbatim.
    Other(String),
}

impl GeometryType {
    /// Returns the tag string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Null => "Null",
            Self::Point => "Point",
            Self::MultiPoint => "MultiPoint",
            Self::LineString => "LineString",
            Self::MultiLineString => "MultiLineString",
            Self::Polygon => "Polygon",
            Self::MultiPolygon => "MultiPolygon",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for GeometryType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Null" => Self::Null,
            "Point" => Self::Point,
            "MultiPoint" => Self::MultiPoint,
            "LineString" => Self::LineString,
            "MultiLineString" => Self::MultiLineString,
            "Polygon" => Self::Polygon,
            "MultiPolygon" => Self::MultiPolygon,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for GeometryType {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<GeometryType> for String {
    fn from(value: GeometryType) -> Self {
        match value {
            GeometryType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// A single geometry entity. Only its type tag is retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    /// Geometry type of this shape.
    pub geometry: GeometryType,
}

impl Shape {
    /// Build a shape with the given geometry type.
    pub fn new(geometry: impl Into<GeometryType>) -> Self {
        Self {
            geometry: geometry.into(),
        }
    }
}

/// Dataset extent: `(min_x, min_y, max_x, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_tags_parse_to_variants() {
        assert_eq!(GeometryType::from("Polygon"), GeometryType::Polygon);
        assert_eq!(GeometryType::from("MultiLineString"), GeometryType::MultiLineString);
    }

    #[test]
    fn unknown_tags_are_kept_literally() {
        let g = GeometryType::from("MultiPatch");
        assert_eq!(g, GeometryType::Other("MultiPatch".to_string()));
        assert_eq!(g.to_string(), "MultiPatch");
    }

    #[test]
    fn geometry_serializes_as_tag() {
        let json = serde_json::to_string(&GeometryType::MultiPolygon).unwrap();
        assert_eq!(json, "\"MultiPolygon\"");
    }

    #[test]
    fn bbox_display() {
        let b = BoundingBox::new(-1.5, 0.0, 2.0, 3.25);
        assert_eq!(b.to_string(), "[-1.5, 0, 2, 3.25]");
    }

    proptest! {
        #[test]
        fn tags_round_trip_through_strings(tag in "[A-Za-z]{1,16}") {
            let g = GeometryType::from(tag.as_str());
            prop_assert_eq!(g.as_str(), tag.as_str());
            prop_assert_eq!(String::from(g), tag);
        }
    }
}
