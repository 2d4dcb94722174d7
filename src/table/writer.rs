//! Result file writer

use super::{Cell, Table};
use crate::domain::{Config, SaveAs, TOOL_NAME};
use crate::error::{AppendError, AppendResult};
use rust_xlsxwriter::{Workbook, XlsxError};
use std::fs;
use std::path::{Path, PathBuf};

/// Path of the result file for `save_as` inside `directory`.
pub fn result_path(directory: &Path, save_as: SaveAs) -> PathBuf {
    directory.join(format!("{}{}", TOOL_NAME, save_as.extension()))
}

/// Save `table` as `tabappend<ext>` in `directory`, replacing any previous result.
pub fn save_result(table: &Table, config: &Config, directory: &Path) -> AppendResult<PathBuf> {
    let path = result_path(directory, config.save_as);

    if path.exists() {
        fs::remove_file(&path).map_err(|e| AppendError::io(&path, e))?;
    }

    let (rows, columns) = table.shape();
    tracing::info!(
        "Saving appended data ({} rows, {} columns) to {}",
        rows,
        columns,
        path.display()
    );

    match config.save_as {
        SaveAs::Csv => write_csv(table, &path)?,
        SaveAs::Xls | SaveAs::Xlsx => {
            if config.save_as == SaveAs::Xls {
                tracing::debug!("Writing {} as an Office Open XML workbook", path.display());
            }
            let mut workbook = Workbook::new();
            fill_workbook(table, &mut workbook)
                .and_then(|_| workbook.save(&path))
                .map_err(|source| AppendError::Xlsx { path: path.clone(), source })?;
        }
    }

    Ok(path)
}

fn write_csv(table: &Table, path: &Path) -> AppendResult<()> {
    let csv_err = |source| AppendError::Csv { path: path.to_path_buf(), source };

    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
    if !table.columns().is_empty() {
        wtr.write_record(table.columns()).map_err(csv_err)?;
    }
    for row in table.rows() {
        wtr.write_record(row.iter().map(|cell| cell.to_string())).map_err(csv_err)?;
    }
    wtr.flush().map_err(|e| AppendError::io(path, e))
}

fn fill_workbook(table: &Table, workbook: &mut Workbook) -> Result<(), XlsxError> {
    let worksheet = workbook.add_worksheet();

    for (c, name) in table.columns().iter().enumerate() {
        worksheet.write_string(0, col_num(c)?, name)?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let row_num = u32::try_from(r + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (c, cell) in row.iter().enumerate() {
            let col = col_num(c)?;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => match numeric_text(s) {
                    Some(n) => {
                        worksheet.write_number(row_num, col, n)?;
                    }
                    None => {
                        worksheet.write_string(row_num, col, s)?;
                    }
                },
                Cell::Int(i) => {
                    worksheet.write_number(row_num, col, *i as f64)?;
                }
                Cell::Float(f) => {
                    worksheet.write_number(row_num, col, *f)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
            }
        }
    }
    Ok(())
}

fn col_num(c: usize) -> Result<u16, XlsxError> {
    u16::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)
}

/// Numeric value of text read from CSV, keeping identifiers such as `007` as text.
fn numeric_text(s: &str) -> Option<f64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let first = digits.chars().next()?;
    if !first.is_ascii_digit() {
        return None;
    }
    if digits.len() > 1 && first == '0' && !digits[1..].starts_with('.') {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}
