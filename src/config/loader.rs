//! Config dotfile loading

use crate::domain::{ConfigLayer, SaveAs, CONFIG_FILENAME};
use crate::error::{AppendError, AppendResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Load the config layer for `dir`.
///
/// An explicit `config_path` must exist. Without one, `.tabappend` in `dir`
/// is used when present and an empty layer is returned otherwise.
pub fn load_config(dir: &Path, config_path: Option<&Path>) -> AppendResult<ConfigLayer> {
    let config_file = match config_path {
        Some(path) => {
            let path = if path.is_absolute() { path.to_path_buf() } else { dir.join(path) };
            if !path.is_file() {
                return Err(AppendError::TargetNotFound(path));
            }
            path
        }
        None => match discover_config(dir) {
            Some(path) => path,
            None => {
                tracing::debug!("No {} found in {}", CONFIG_FILENAME, dir.display());
                return Ok(ConfigLayer::default());
            }
        },
    };

    let content =
        fs::read_to_string(&config_file).map_err(|e| AppendError::io(&config_file, e))?;
    tracing::debug!("Loading config from {}", config_file.display());

    parse_config_file(&content)
}

/// Parse `KEY=VALUE` dotfile content into a layer.
///
/// Follows dotenv conventions: blank lines and `#` comments are skipped, an
/// `export ` prefix is allowed, surrounding quotes are stripped and an empty
/// value leaves the field unset.
pub fn parse_config_file(content: &str) -> AppendResult<ConfigLayer> {
    let mut layer = ConfigLayer::default();

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((key, value)) = line.split_once('=') else {
            tracing::debug!("Skipping config line without '=': {}", line);
            continue;
        };
        let key = key.trim();
        let value = unquote(value.trim());
        if value.is_empty() {
            continue;
        }

        match key {
            "SHEET_NAME" => layer.sheet_name = Some(value.to_string()),
            "CSV_HEADER_ROW" => layer.csv_header_row = Some(parse_row(key, value)?),
            "EXCEL_HEADER_ROW" => layer.excel_header_row = Some(parse_row(key, value)?),
            "SAVE_AS" => layer.save_as = Some(value.parse::<SaveAs>()?),
            "VERBOSE" => layer.verbose = Some(parse_flag(value)),
            "RECURSIVE" => layer.recursive = Some(parse_flag(value)),
            "IGNORE" => layer.ignore = Some(split_list(value)),
            other => tracing::debug!("Ignoring unknown config key {}", other),
        }
    }

    Ok(layer)
}

/// Parse a header-row offset.
fn parse_row(key: &str, value: &str) -> AppendResult<usize> {
    value.trim().parse::<usize>().map_err(|_| AppendError::invalid_value(key, value))
}

/// `1` and `True` (any case) enable a flag; anything else disables it.
fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Split a comma-separated list, trimming whitespace and dropping empty parts.
fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|part| !part.is_empty()).map(String::from).collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn discover_config(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(CONFIG_FILENAME);
    path.is_file().then_some(path)
}
