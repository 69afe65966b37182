//! # vshape CLI entry point
//!
//! Parses command-line arguments, configures logging, and runs one
//! validation.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vshape_cli::validate::{run_validate, ValidateArgs};

/// Check a shapefile's attribute schema, values and geometry against a
/// YAML template.
#[derive(Parser, Debug)]
#[command(name = "vshape", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    args: ValidateArgs,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "vshape starting");

    match run_validate(&cli.args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use vshape_cli::validate::{MatchModeArg, OutputFormat};

    #[test]
    fn cli_parse_defaults() {
        let cli = Cli::try_parse_from(["vshape", "data/flood.shp"]).unwrap();
        assert_eq!(cli.args.shapefile, PathBuf::from("data/flood.shp"));
        assert_eq!(cli.args.template, PathBuf::from("vshape.yaml"));
        assert!(cli.args.match_mode.is_none());
        assert_eq!(cli.args.format, OutputFormat::Text);
        assert!(!cli.args.strict);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parse_all_options() {
        let cli = Cli::try_parse_from([
            "vshape",
            "flood.shp",
            "--template",
            "delivery.yaml",
            "--match-mode",
            "by-name",
            "--format",
            "json",
            "--strict",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.args.template, PathBuf::from("delivery.yaml"));
        assert_eq!(cli.args.match_mode, Some(MatchModeArg::ByName));
        assert_eq!(cli.args.format, OutputFormat::Json);
        assert!(cli.args.strict);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_parse_requires_shapefile() {
        let err = Cli::try_parse_from(["vshape"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn cli_parse_rejects_unknown_match_mode() {
        let err = Cli::try_parse_from(["vshape", "a.shp", "--match-mode", "fuzzy"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }
}
