//! # vshape-source — Shapefile Reader
//!
//! [`ShapefileSource`] implements the [`ShapeSource`] contract over an ESRI
//! shapefile triad colocated at one base path:
//!
//! - `.shp`: geometry, decoded by the `shapefile` crate. Only each shape's
//!   geometry type and the header's precomputed extent are kept.
//! - `.shx`: the offset index; it must be present for the triad to be valid.
//! - `.dbf`: the attribute table, decoded by [`dbf::DbfTable`] so that field
//!   widths and decimal counts are available exactly as declared.
//!
//! All three files are read once in [`ShapefileSource::open`]. Nothing is
//! retried: any failure aborts the run.
//!
//! ## Crate Policy
//!
//! - Depends only on `vshape-core` internally.
//! - Format detection is the case-sensitive `.shp` suffix, checked before any
//!   byte is read.

pub mod dbf;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;

use std::path::{Path, PathBuf};

use vshape_core::{
    BoundingBox, FieldDescriptor, GeometryType, Record, Shape, ShapeSource, SourceError,
};

use crate::dbf::DbfTable;

/// A fully loaded shapefile.
#[derive(Debug, Clone)]
pub struct ShapefileSource {
    path: PathBuf,
    fields: Vec<FieldDescriptor>,
    shapes: Vec<Shape>,
    records: Vec<Record>,
    bounding_box: Option<BoundingBox>,
}

impl ShapefileSource {
    /// Open and read the triad whose `.shp` member is `path`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::NotAShapefile` if `path` does not end in `.shp`.
    /// Returns `SourceError::Read` if any member of the triad is missing or
    /// cannot be decoded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        if !is_shp_path(path) {
            return Err(SourceError::NotAShapefile {
                path: path.display().to_string(),
            });
        }

        let shx_path = path.with_extension("shx");
        let dbf_path = path.with_extension("dbf");
        for member in [path, shx_path.as_path(), dbf_path.as_path()] {
            if !member.is_file() {
                return Err(read_error(member, "file is missing"));
            }
        }

        let (shapes, bounding_box) = read_geometry(path)?;

        let dbf_bytes = std::fs::read(&dbf_path).map_err(|e| read_error(&dbf_path, e))?;
        let table = DbfTable::parse(&dbf_bytes).map_err(|e| read_error(&dbf_path, e))?;

        if table.records.len() != shapes.len() {
            tracing::warn!(
                path = %path.display(),
                shapes = shapes.len(),
                records = table.records.len(),
                "shape and record counts differ"
            );
        }

        tracing::debug!(
            path = %path.display(),
            fields = table.fields.len(),
            shapes = shapes.len(),
            records = table.records.len(),
            "loaded shapefile"
        );

        Ok(Self {
            path: path.to_path_buf(),
            fields: table.fields,
            shapes,
            records: table.records,
            bounding_box,
        })
    }

    /// Path of the `.shp` member.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ShapeSource for ShapefileSource {
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
        self.bounding_box
    }
}

/// True iff the path's extension is exactly `shp`.
pub fn is_shp_path(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("shp")
}

fn read_error(path: &Path, reason: impl ToString) -> SourceError {
    SourceError::Read {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn read_geometry(path: &Path) -> Result<(Vec<Shape>, Option<BoundingBox>), SourceError> {
    let reader = shapefile::ShapeReader::from_path(path).map_err(|e| read_error(path, e))?;

    let extent = {
        let bbox = &reader.header().bbox;
        BoundingBox::new(bbox.min.x, bbox.min.y, bbox.max.x, bbox.max.y)
    };

    let shapes: Vec<Shape> = reader
        .read()
        .map_err(|e| read_error(path, e))?
        .iter()
        .map(|s| Shape::new(geometry_of(s)))
        .collect();

    let bounding_box = if shapes.is_empty() { None } else { Some(extent) };
    Ok((shapes, bounding_box))
}

/// Map a decoded shape to its geometry tag.
fn geometry_of(shape: &shapefile::Shape) -> GeometryType {
    use shapefile::Shape as S;

    match shape {
        S::NullShape => GeometryType::Null,
        S::Point(_) | S::PointM(_) | S::PointZ(_) => GeometryType::Point,
        S::Multipoint(_) | S::MultipointM(_) | S::MultipointZ(_) => GeometryType::MultiPoint,
        S::Polyline(p) => line_geometry(p.parts().len()),
        S::PolylineM(p) => line_geometry(p.parts().len()),
        S::PolylineZ(p) => line_geometry(p.parts().len()),
        S::Polygon(p) => polygon_geometry(p.rings()),
        S::PolygonM(p) => polygon_geometry(p.rings()),
        S::PolygonZ(p) => polygon_geometry(p.rings()),
        S::Multipatch(_) => GeometryType::Other("MultiPatch".to_string()),
    }
}

fn line_geometry(parts: usize) -> GeometryType {
    if parts > 1 {
        GeometryType::MultiLineString
    } else {
        GeometryType::LineString
    }
}

fn polygon_geometry<P>(rings: &[shapefile::PolygonRing<P>]) -> GeometryType {
    let outer = rings
        .iter()
        .filter(|r| matches!(r, shapefile::PolygonRing::Outer(_)))
        .count();
    if outer > 1 {
        GeometryType::MultiPolygon
    } else {
        GeometryType::Polygon
    }
}
