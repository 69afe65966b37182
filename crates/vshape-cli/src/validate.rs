//! # Validate Command
//!
//! Loads the template and the shapefile, runs the engine, and writes the
//! report. A missing or nonexistent path is an error; any run that reaches
//! the checks produces a report.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use vshape_core::VshapeError;
use vshape_schema::{validate, MatchMode, Template};
use vshape_source::ShapefileSource;

use crate::report::{render_json, render_text};

/// Template used when `--template` is not given.
pub const DEFAULT_TEMPLATE: &str = "vshape.yaml";

/// Exit code for a completed run whose report failed under `--strict`.
pub const EXIT_FINDINGS: u8 = 2;

/// Arguments for validating one shapefile.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Shapefile to validate (the `.shp` member of the triad).
    #[arg(value_name = "SHAPEFILE")]
    pub shapefile: PathBuf,

    /// Template describing the expected fields and allowed values.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_TEMPLATE)]
    pub template: PathBuf,

    /// Override the template's field matching mode.
    #[arg(long, value_enum)]
    pub match_mode: Option<MatchModeArg>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Exit with status 2 when any check fails.
    #[arg(long)]
    pub strict: bool,
}

/// Field matching mode as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchModeArg {
    Positional,
    ByName,
}

impl From<MatchModeArg> for MatchMode {
    fn from(value: MatchModeArg) -> Self {
        match value {
            MatchModeArg::Positional => MatchMode::Positional,
            MatchModeArg::ByName => MatchMode::ByName,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Execute a validation run, writing the report to stdout.
///
/// Returns exit code: 0 when the run completes, or [`EXIT_FINDINGS`] when it
/// completes with failed checks under `--strict`. Operational errors are
/// returned as `Err`.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_validate_to(args, &mut out)
}

/// [`run_validate`] writing to an arbitrary sink.
pub fn run_validate_to(args: &ValidateArgs, out: &mut impl Write) -> Result<u8> {
    if !args.shapefile.exists() {
        return Err(VshapeError::PathNotFound(args.shapefile.display().to_string()).into());
    }

    let mut template = Template::load(&args.template).map_err(VshapeError::from)?;
    if let Some(mode) = args.match_mode {
        template = template.with_match_mode(mode.into());
    }
    tracing::info!(
        template = %args.template.display(),
        fields = template.len(),
        match_mode = %template.match_mode(),
        "loaded template"
    );

    let source = ShapefileSource::open(&args.shapefile).map_err(VshapeError::from)?;
    tracing::info!(shapefile = %args.shapefile.display(), "opened shapefile");

    let report = validate(&template, &source);

    match args.format {
        OutputFormat::Text => render_text(&report, out),
        OutputFormat::Json => render_json(&report, out),
    }
    .context("failed to write report")?;

    if args.strict && !report.passed() {
        Ok(EXIT_FINDINGS)
    } else {
        Ok(0)
    }
}
