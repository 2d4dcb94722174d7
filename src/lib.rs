//! tabappend: append CSV, XLS and XLSX files into one table
//!
//! Files are resolved from target patterns, read with per-format header
//! offsets, tagged with their source filename and written back out as a
//! single `tabappend.<ext>` result.

pub mod append;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod scan;
pub mod table;
pub mod utils;

pub use append::append;
pub use domain::{Args, Config, ConfigLayer, FileExtension, SaveAs, Targets};
pub use error::{AppendError, AppendResult};

use std::path::{Path, PathBuf};

/// Outcome of one append run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub files: Vec<PathBuf>,
    pub rows: usize,
    pub columns: usize,
    pub output: PathBuf,
}

/// Expand, append and save for an already resolved configuration.
pub fn run_resolved(directory: &Path, targets: &[String], config: &Config) -> AppendResult<RunSummary> {
    let files = scan::expand(
        targets,
        directory,
        &config.ignore,
        config.recursive,
        &FileExtension::ALL,
    )?;
    if files.is_empty() {
        tracing::warn!("No files to append in {}", directory.display());
    }

    let table = append(&files, config)?;
    let output = table::save_result(&table, config, directory)?;
    let (rows, columns) = table.shape();

    Ok(RunSummary { files, rows, columns, output })
}

/// Run with `overrides` layered over the `.tabappend` file in `directory`.
///
/// This is the library entry point for callers that do not go through the
/// command line; override fields left unset fall back to the file, then to
/// the built-in defaults.
pub fn run_with_overrides(directory: &Path, overrides: Args) -> AppendResult<RunSummary> {
    let file = Args::new(Targets::default(), config::load_config(directory, None)?);
    let args = config::merge(overrides, file);
    run_resolved(directory, &args.targets.resolve(), &args.config.resolve())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rerun_does_not_append_previous_result() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("f1.csv"), "a,b\n1,2\n3,4\n").unwrap();
        fs::write(tmp.path().join("f2.csv"), "a,b\n5,6\n").unwrap();

        let first = run_with_overrides(tmp.path(), Args::default()).unwrap();
        let second = run_with_overrides(tmp.path(), Args::default()).unwrap();

        assert_eq!(first.rows, 3);
        assert_eq!(first.columns, 3);
        assert_eq!(second.rows, first.rows);
        assert_eq!(second.files.len(), 2);
        assert_eq!(
            fs::read_to_string(&first.output).unwrap(),
            fs::read_to_string(&second.output).unwrap()
        );
    }

    #[test]
    fn test_overrides_beat_config_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("f1.csv"), "skip\na\n1\n").unwrap();
        fs::write(tmp.path().join(".tabappend"), "CSV_HEADER_ROW=1\nSAVE_AS=xlsx\n").unwrap();

        let overrides = Args::new(
            Targets::default(),
            ConfigLayer { save_as: Some(SaveAs::Csv), ..Default::default() },
        );
        let summary = run_with_overrides(tmp.path(), overrides).unwrap();

        assert!(summary.output.ends_with("tabappend.csv"));
        assert_eq!(summary.rows, 1);
        assert!(!tmp.path().join("tabappend.xlsx").exists());
    }
}
