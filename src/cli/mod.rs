//! Command-line interface for tabappend
//!
//! Parses targets and flags into an [`Args`] layer, merges it over the
//! `.tabappend` dotfile and runs the append.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_config, resolve_sources};
use crate::domain::{Args, ConfigLayer, SaveAs, Targets};
use crate::error::AppendError;

/// Append CSV, XLS and XLSX files into one table tagged by source filename
#[derive(Parser, Debug)]
#[command(name = "tabappend")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Files, wildcard patterns such as '*.csv', or '.' for every eligible file
    #[arg(value_name = "TARGETS")]
    pub targets: Vec<String>,

    /// Worksheet to read from Excel files (defaults to the first sheet)
    #[arg(long, value_name = "NAME")]
    pub sheet_name: Option<String>,

    /// Rows to skip before the header, for both CSV and Excel files
    #[arg(long, value_name = "ROW", value_parser = parse_header_row)]
    pub header_row: Option<usize>,

    /// Rows to skip before the header in CSV files
    #[arg(long, value_name = "ROW", value_parser = parse_header_row)]
    pub csv_header_row: Option<usize>,

    /// Rows to skip before the header in Excel files
    #[arg(long, value_name = "ROW", value_parser = parse_header_row)]
    pub excel_header_row: Option<usize>,

    /// Output format: 'csv', 'xls', 'xlsx' or 'excel'
    #[arg(long, value_name = "FORMAT", value_parser = parse_save_as)]
    pub save_as: Option<SaveAs>,

    /// Include files in subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Skip paths containing this fragment (repeatable or comma-separated)
    #[arg(long, value_name = "FRAGMENT", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Log each appended file (sets log level to DEBUG)
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a config file (defaults to .tabappend in the working directory)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration in .tabappend format and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// The layer contributed by command-line flags. Flags that were not
    /// given stay unset so lower-priority sources can fill them.
    pub fn to_args(&self) -> Args {
        let targets =
            if self.targets.is_empty() { Targets::default() } else { Targets::new(&self.targets) };

        let ignore: Vec<String> =
            self.ignore.iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();

        let config = ConfigLayer {
            sheet_name: self.sheet_name.clone(),
            csv_header_row: self.csv_header_row.or(self.header_row),
            excel_header_row: self.excel_header_row.or(self.header_row),
            save_as: self.save_as,
            verbose: self.verbose.then_some(true),
            recursive: self.recursive.then_some(true),
            ignore: (!ignore.is_empty()).then_some(ignore),
        };

        Args::new(targets, config)
    }
}

fn parse_header_row(value: &str) -> Result<usize, String> {
    value.trim().parse::<usize>().map_err(|_| AppendError::invalid_value("header row", value).to_string())
}

fn parse_save_as(value: &str) -> Result<SaveAs, String> {
    value
        .parse::<SaveAs>()
        .map_err(|_| AppendError::invalid_value("--save-as", value).to_string())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    run_in(&cli, &cwd, Args::default())
}

/// Run `cli` against `directory`, with `overrides` taking priority over flags.
pub fn run_in(cli: &Cli, directory: &Path, overrides: Args) -> Result<()> {
    let file_layer = load_config(directory, cli.config.as_deref())
        .with_context(|| format!("Failed loading config for {}", directory.display()))?;

    let args =
        resolve_sources(overrides, cli.to_args(), Args::new(Targets::default(), file_layer));
    let config = args.config.resolve();

    init_tracing(config.verbose);
    tracing::debug!("Effective config: {}", config);

    if cli.print_config {
        println!("{}", config.as_config_file());
        return Ok(());
    }

    let targets = args.targets.resolve();
    let summary = crate::run_resolved(directory, &targets, &config)
        .with_context(|| format!("Failed appending {}", targets.join(" ")))?;

    tracing::info!(
        "Appended {} file(s) into {} ({} rows, {} columns)",
        summary.files.len(),
        summary.output.display(),
        summary.rows,
        summary.columns
    );

    Ok(())
}

/// Wire the effective verbose setting to the tracing log level.
/// RUST_LOG in the environment is read first; verbose falls back to DEBUG.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
