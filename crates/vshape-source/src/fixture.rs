//! # Shapefile Fixtures
//!
//! Writes small, well-formed `.shp`/`.shx`/`.dbf` triads for tests. Only
//! compiled for this crate's tests or with the `fixtures` feature.

use std::io;
use std::path::{Path, PathBuf};

const SHP_HEADER_LEN: usize = 100;
const FILE_CODE: i32 = 9994;
const VERSION: i32 = 1000;
const NULL_TYPE: i32 = 0;
const POINT_TYPE: i32 = 1;
const POLYGON_TYPE: i32 = 5;

/// Geometry of one fixture feature.
#[derive(Debug, Clone)]
pub enum FixtureShape {
    Null,
    Point(f64, f64),
    /// Rings of `(x, y)`; clockwise rings are outer rings.
    Polygon(Vec<Vec<(f64, f64)>>),
}

impl FixtureShape {
    /// A clockwise unit square offset by `(dx, dy)`.
    pub fn square(dx: f64, dy: f64) -> Vec<(f64, f64)> {
        vec![
            (dx, dy),
            (dx, dy + 1.0),
            (dx + 1.0, dy + 1.0),
            (dx + 1.0, dy),
            (dx, dy),
        ]
    }

    fn points(&self) -> Vec<(f64, f64)> {
        match self {
            Self::Null => Vec::new(),
            Self::Point(x, y) => vec![(*x, *y)],
            Self::Polygon(rings) => rings.iter().flatten().copied().collect(),
        }
    }

    fn content(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Self::Null => out.extend_from_slice(&NULL_TYPE.to_le_bytes()),
            Self::Point(x, y) => {
                out.extend_from_slice(&POINT_TYPE.to_le_bytes());
                out.extend_from_slice(&x.to_le_bytes());
                out.extend_from_slice(&y.to_le_bytes());
            }
            Self::Polygon(rings) => {
                let points = self.points();
                out.extend_from_slice(&POLYGON_TYPE.to_le_bytes());
                for v in extent(&points) {
                    out.extend_from_slice(&v.to_le_bytes());
                }
                out.extend_from_slice(&(rings.len() as i32).to_le_bytes());
                out.extend_from_slice(&(points.len() as i32).to_le_bytes());
                let mut start = 0i32;
                for ring in rings {
                    out.extend_from_slice(&start.to_le_bytes());
                    start += ring.len() as i32;
                }
                for (x, y) in points {
                    out.extend_from_slice(&x.to_le_bytes());
                    out.extend_from_slice(&y.to_le_bytes());
                }
            }
        }
        out
    }

    fn shape_type(&self) -> i32 {
        match self {
            Self::Null => NULL_TYPE,
            Self::Point(..) => POINT_TYPE,
            Self::Polygon(_) => POLYGON_TYPE,
        }
    }
}

/// One attribute column: `(name, type code, length, decimal)`.
pub type FixtureField<'a> = (&'a str, char, u8, u8);

/// Write `<dir>/<stem>.shp|.shx|.dbf` and return the `.shp` path.
pub fn write_triad(
    dir: &Path,
    stem: &str,
    fields: &[FixtureField<'_>],
    features: &[(FixtureShape, Vec<&str>)],
) -> io::Result<PathBuf> {
    let shp_path = dir.join(format!("{stem}.shp"));

    let shape_type = features
        .iter()
        .map(|(s, _)| s.shape_type())
        .find(|t| *t != NULL_TYPE)
        .unwrap_or(NULL_TYPE);
    let all_points: Vec<(f64, f64)> = features.iter().flat_map(|(s, _)| s.points()).collect();
    let bbox = if all_points.is_empty() {
        [0.0; 4]
    } else {
        extent(&all_points)
    };

    let mut body = Vec::new();
    let mut index = Vec::new();
    for (i, (shape, _)) in features.iter().enumerate() {
        let content = shape.content();
        let offset_words = ((SHP_HEADER_LEN + body.len()) / 2) as i32;
        let length_words = (content.len() / 2) as i32;
        body.extend_from_slice(&(i as i32 + 1).to_be_bytes());
        body.extend_from_slice(&length_words.to_be_bytes());
        body.extend_from_slice(&content);
        index.extend_from_slice(&offset_words.to_be_bytes());
        index.extend_from_slice(&length_words.to_be_bytes());
    }

    let mut shp = shp_header(shape_type, SHP_HEADER_LEN + body.len(), bbox);
    shp.extend_from_slice(&body);
    std::fs::write(&shp_path, shp)?;

    let mut shx = shp_header(shape_type, SHP_HEADER_LEN + index.len(), bbox);
    shx.extend_from_slice(&index);
    std::fs::write(shp_path.with_extension("shx"), shx)?;

    let rows: Vec<&[&str]> = features.iter().map(|(_, cells)| cells.as_slice()).collect();
    std::fs::write(shp_path.with_extension("dbf"), dbf_bytes(fields, &rows))?;

    Ok(shp_path)
}

fn shp_header(shape_type: i32, total_len: usize, bbox: [f64; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity(SHP_HEADER_LEN);
    out.extend_from_slice(&FILE_CODE.to_be_bytes());
    out.extend_from_slice(&[0u8; 20]);
    out.extend_from_slice(&((total_len / 2) as i32).to_be_bytes());
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&shape_type.to_le_bytes());
    for v in bbox {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(&[0u8; 32]);
    out
}

fn extent(points: &[(f64, f64)]) -> [f64; 4] {
    points.iter().fold(
        [f64::MAX, f64::MAX, f64::MIN, f64::MIN],
        |[x0, y0, x1, y1], &(x, y)| [x0.min(x), y0.min(y), x1.max(x), y1.max(y)],
    )
}

/// Encode a dBASE III table with the given columns and live rows.
pub fn dbf_bytes(fields: &[FixtureField<'_>], rows: &[&[&str]]) -> Vec<u8> {
    let header_len = 32 + 32 * fields.len() + 1;
    let record_len = 1 + fields.iter().map(|f| f.2 as usize).sum::<usize>();

    let mut out = vec![0u8; 32];
    out[0] = 0x03;
    out[4..8].copy_from_slice(&(rows.len() as u32).to_le_bytes());
    out[8..10].copy_from_slice(&(header_len as u16).to_le_bytes());
    out[10..12].copy_from_slice(&(record_len as u16).to_le_bytes());

    for (name, code, len, dec) in fields {
        let mut d = [0u8; 32];
        d[..name.len()].copy_from_slice(name.as_bytes());
        d[11] = *code as u8;
        d[16] = *len;
        d[17] = *dec;
        out.extend_from_slice(&d);
    }
    out.push(0x0D);

    for cells in rows {
        out.push(b' ');
        for (i, (_, _, len, _)) in fields.iter().enumerate() {
            let mut cell = cells.get(i).copied().unwrap_or("").as_bytes().to_vec();
            cell.resize(*len as usize, b' ');
            out.extend_from_slice(&cell);
        }
    }
    out.push(0x1A);
    out
}
