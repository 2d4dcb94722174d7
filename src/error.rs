//! Error kinds surfaced by loading, expansion, reading and writing.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AppendError {
    #[error("file {} is not one of .csv, .xls, .xlsx", .0.display())]
    UnsupportedExtension(PathBuf),

    #[error("could not save file as '{0}': expected csv, xls, xlsx or excel")]
    UnsupportedSaveFormat(String),

    #[error("invalid value '{value}' for {key}")]
    InvalidConfigValue { key: String, value: String },

    #[error("target not found: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("sheet '{sheet}' not found in {}", .path.display())]
    SheetNotFound { path: PathBuf, sheet: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: {source}", .path.display())]
    Excel {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("{}: {source}", .path.display())]
    Xlsx {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("invalid target pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl AppendError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppendError::Io { path: path.into(), source }
    }

    pub(crate) fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        AppendError::InvalidConfigValue { key: key.into(), value: value.into() }
    }
}

pub type AppendResult<T> = Result<T, AppendError>;
