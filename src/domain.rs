//! Core data types shared by the loader, resolver, expander and append engine.

use crate::error::AppendError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Name used for the result file and the config dotfile.
pub const TOOL_NAME: &str = "tabappend";

/// Config dotfile discovered in the working directory.
pub const CONFIG_FILENAME: &str = ".tabappend";

/// Column appended to every table, holding the source file's base name.
pub const FILENAME_COLUMN: &str = "filename";

pub const DEFAULT_CSV_HEADER_ROW: usize = 0;
pub const DEFAULT_EXCEL_HEADER_ROW: usize = 0;
pub const DEFAULT_SAVE_AS: SaveAs = SaveAs::Csv;

/// Input formats the append engine can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileExtension {
    Csv,
    Xls,
    Xlsx,
}

impl FileExtension {
    pub const ALL: [FileExtension; 3] = [FileExtension::Csv, FileExtension::Xls, FileExtension::Xlsx];

    /// Dotted lowercase form, e.g. `.csv`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileExtension::Csv => ".csv",
            FileExtension::Xls => ".xls",
            FileExtension::Xlsx => ".xlsx",
        }
    }

    /// Recognize the extension of `path`, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str())?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(FileExtension::Csv),
            "xls" => Some(FileExtension::Xls),
            "xlsx" => Some(FileExtension::Xlsx),
            _ => None,
        }
    }
}

impl fmt::Display for FileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result filenames that are never read back in, so re-runs stay idempotent.
pub fn reserved_result_filenames() -> Vec<String> {
    FileExtension::ALL.iter().map(|ext| format!("{}{}", TOOL_NAME, ext)).collect()
}

/// Whether `path` names one of the tool's own result files.
pub fn is_reserved_result_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_ascii_lowercase();
    reserved_result_filenames().iter().any(|reserved| *reserved == name)
}

/// Output format of the result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveAs {
    Csv,
    Xls,
    Xlsx,
}

impl SaveAs {
    /// Dotted extension used for the result filename.
    pub fn extension(&self) -> &'static str {
        match self {
            SaveAs::Csv => ".csv",
            SaveAs::Xls => ".xls",
            SaveAs::Xlsx => ".xlsx",
        }
    }
}

impl FromStr for SaveAs {
    type Err = AppendError;

    /// Accepts `csv`, `xls`, `xlsx` and `excel` (alias of `xlsx`), with or
    /// without a leading dot, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "csv" => Ok(SaveAs::Csv),
            "xls" => Ok(SaveAs::Xls),
            "xlsx" | "excel" => Ok(SaveAs::Xlsx),
            _ => Err(AppendError::UnsupportedSaveFormat(s.to_string())),
        }
    }
}

impl fmt::Display for SaveAs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One configuration source. `None` means the source left the field unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub sheet_name: Option<String>,
    pub csv_header_row: Option<usize>,
    pub excel_header_row: Option<usize>,
    pub save_as: Option<SaveAs>,
    pub verbose: Option<bool>,
    pub recursive: Option<bool>,
    pub ignore: Option<Vec<String>>,
}

impl ConfigLayer {
    /// Fill every unset field with the built-in default.
    pub fn resolve(&self) -> Config {
        Config {
            sheet_name: self.sheet_name.clone(),
            csv_header_row: self.csv_header_row.unwrap_or(DEFAULT_CSV_HEADER_ROW),
            excel_header_row: self.excel_header_row.unwrap_or(DEFAULT_EXCEL_HEADER_ROW),
            save_as: self.save_as.unwrap_or(DEFAULT_SAVE_AS),
            verbose: self.verbose.unwrap_or(false),
            recursive: self.recursive.unwrap_or(false),
            ignore: self.ignore.clone().unwrap_or_default(),
        }
    }
}

/// Effective formatting and behaviour options for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Worksheet to read from Excel files; the first sheet when `None`.
    pub sheet_name: Option<String>,
    /// Records skipped before the CSV header.
    pub csv_header_row: usize,
    /// Rows skipped before the Excel header.
    pub excel_header_row: usize,
    pub save_as: SaveAs,
    pub verbose: bool,
    pub recursive: bool,
    /// Path fragments; any candidate path containing one is skipped.
    pub ignore: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        ConfigLayer::default().resolve()
    }
}

impl Config {
    /// Render as `.tabappend` dotfile content that the loader reads back.
    pub fn as_config_file(&self) -> String {
        let mut lines = Vec::new();
        if let Some(sheet) = &self.sheet_name {
            lines.push(format!("SHEET_NAME={}", sheet));
        }
        lines.push(format!("CSV_HEADER_ROW={}", self.csv_header_row));
        lines.push(format!("EXCEL_HEADER_ROW={}", self.excel_header_row));
        lines.push(format!("SAVE_AS={}", self.save_as));
        lines.push(format!("VERBOSE={}", if self.verbose { "True" } else { "False" }));
        lines.push(format!("RECURSIVE={}", if self.recursive { "True" } else { "False" }));
        lines.push(format!("IGNORE={}", self.ignore.join(",")));
        lines.join("\n")
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sheet_name: {}, excel_header_row: {}, csv_header_row: {}, save_as: {}, verbose: {}, recursive: {}, ignore: {:?}",
            self.sheet_name.as_deref().unwrap_or("<first sheet>"),
            self.excel_header_row,
            self.csv_header_row,
            self.save_as,
            self.verbose,
            self.recursive,
            self.ignore
        )
    }
}

/// Target patterns as supplied by one source; `None` means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    pub values: Option<Vec<String>>,
}

impl Targets {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { values: Some(values.into_iter().map(Into::into).collect()) }
    }

    /// Patterns to expand; `.` (the whole working directory) when unset.
    pub fn resolve(&self) -> Vec<String> {
        match &self.values {
            Some(values) if !values.is_empty() => values.clone(),
            _ => vec![".".to_string()],
        }
    }
}

/// A `(Targets, ConfigLayer)` pair contributed by one configuration source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub targets: Targets,
    pub config: ConfigLayer,
}

impl Args {
    pub fn new(targets: Targets, config: ConfigLayer) -> Self {
        Self { targets, config }
    }

    pub fn is_default(&self) -> bool {
        *self == Args::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_save_as_aliases() {
        assert_eq!("csv".parse::<SaveAs>().unwrap(), SaveAs::Csv);
        assert_eq!(".CSV".parse::<SaveAs>().unwrap(), SaveAs::Csv);
        assert_eq!("xls".parse::<SaveAs>().unwrap(), SaveAs::Xls);
        assert_eq!(".xlsx".parse::<SaveAs>().unwrap(), SaveAs::Xlsx);
        assert_eq!("excel".parse::<SaveAs>().unwrap(), SaveAs::Xlsx);
    }

    #[test]
    fn test_save_as_rejects_unknown() {
        let err = "foo".parse::<SaveAs>().unwrap_err();
        assert!(matches!(err, AppendError::UnsupportedSaveFormat(ref v) if v == "foo"));
    }

    #[test]
    fn test_file_extension_is_case_insensitive() {
        assert_eq!(FileExtension::from_path(Path::new("a/B.CSV")), Some(FileExtension::Csv));
        assert_eq!(FileExtension::from_path(Path::new("report.Xlsx")), Some(FileExtension::Xlsx));
        assert_eq!(FileExtension::from_path(Path::new("notes.txt")), None);
        assert_eq!(FileExtension::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_reserved_result_files() {
        assert!(is_reserved_result_file(&PathBuf::from("/tmp/x/tabappend.csv")));
        assert!(is_reserved_result_file(Path::new("TabAppend.XLSX")));
        assert!(!is_reserved_result_file(Path::new("tabappend_old.csv")));
    }

    #[test]
    fn test_default_layer_resolves_to_builtin_defaults() {
        let config = ConfigLayer::default().resolve();
        assert_eq!(config.sheet_name, None);
        assert_eq!(config.csv_header_row, 0);
        assert_eq!(config.excel_header_row, 0);
        assert_eq!(config.save_as, SaveAs::Csv);
        assert!(!config.verbose);
        assert!(!config.recursive);
        assert!(config.ignore.is_empty());
    }

    #[test]
    fn test_unset_targets_resolve_to_working_directory() {
        assert_eq!(Targets::default().resolve(), vec!["."]);
        assert_eq!(Targets::new(Vec::<String>::new()).resolve(), vec!["."]);
        assert_eq!(Targets::new(["a.csv"]).resolve(), vec!["a.csv"]);
    }
}
