//! # vshape-cli — Shapefile Checker
//!
//! Provides the `vshape` command-line interface:
//!
//! ```bash
//! vshape data/flood_extent.shp
//! vshape data/flood_extent.shp --template delivery.yaml --match-mode by-name
//! vshape data/flood_extent.shp --format json --strict
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: the run completed and a report was printed, whatever its verdict.
//! - `1`: usage error, missing path, unreadable shapefile, or bad template.
//! - `2`: `--strict` was given and at least one check failed.

pub mod report;
pub mod validate;
