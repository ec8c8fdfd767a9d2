#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::{IsTerminal, Write};

use xproc::cli::{CliArgs, Format, render, run};

/// Exit status when at least one query produced a diagnostic.
const EXIT_DIAGNOSTICS: i32 = 1;

fn main() -> Result<()> {
    // XPROC_LOG / RUST_LOG enable tracing; XPROC_LOG_FORMAT picks text|tree|json.
    xproc::tracing_config::init_tracing();

    let args = CliArgs::parse();
    if args.format == Format::Json || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let report = run(&args)?;
    let output = render(&report, args.format)?;
    std::io::stdout().lock().write_all(output.as_bytes())?;

    let diagnostics = report.diagnostics().count();
    if diagnostics > 0 {
        eprintln!("{diagnostics} diagnostic(s) reported");
        std::process::exit(EXIT_DIAGNOSTICS);
    }
    Ok(())
}
