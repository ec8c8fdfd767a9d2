//! Command-line surface of the `xproc` binary.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};
use xproc_common::ProcessingOptions;
use xproc_common::options::parse_assignment;
use xproc_processing::BackendKind;
use xproc_symbols::Fixture;

use crate::describe::{RoundReport, default_queries, describe_round, render_text};

#[derive(Parser, Debug)]
#[command(
    name = "xproc",
    version,
    about = "Describe types and declarations of a fixture through either symbol back end"
)]
pub struct CliArgs {
    /// JSON fixture describing the source files of one round.
    pub fixture: PathBuf,

    /// Symbol back end to load the fixture into.
    #[arg(short = 'b', long, value_enum, ignore_case = true, default_value_t = BackendArg::Eager)]
    pub backend: BackendArg,

    /// Qualified type name to describe. Repeatable.
    #[arg(short = 't', long = "type")]
    pub types: Vec<String>,

    /// Qualified declaration name to describe. Repeatable.
    #[arg(short = 'd', long = "declaration")]
    pub declarations: Vec<String>,

    /// Extra processing option, overriding the fixture's. Repeatable.
    #[arg(short = 'O', long = "option", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub options: Vec<(String, String)>,

    /// Report format.
    #[arg(short = 'f', long, value_enum, ignore_case = true, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Eager,
    Resolved,
}

impl From<BackendArg> for BackendKind {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Eager => BackendKind::Eager,
            BackendArg::Resolved => BackendKind::Resolved,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

pub fn read_fixture(path: &Path) -> Result<Fixture> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    Fixture::from_json(&text).with_context(|| format!("failed to parse fixture {}", path.display()))
}

/// Load the fixture, run the queries and return the report. With no
/// `--type` or `--declaration` given, every top-level class-like
/// declaration is described.
pub fn run(args: &CliArgs) -> Result<RoundReport> {
    let fixture = read_fixture(&args.fixture)?;
    let options: ProcessingOptions = args.options.iter().cloned().collect();
    let backend = BackendKind::from(args.backend);
    let _span = info_span!("round", %backend, fixture = %args.fixture.display()).entered();

    let env = crate::build_env(&fixture, backend, &options);
    let declarations = if args.types.is_empty() && args.declarations.is_empty() {
        default_queries(&fixture)
    } else {
        args.declarations.clone()
    };
    debug!(types = args.types.len(), declarations = declarations.len(), "describing");
    Ok(describe_round(&env, &args.types, &declarations))
}

pub fn render(report: &RoundReport, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(render_text(report)),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
            json.push('\n');
            Ok(json)
        }
    }
}
