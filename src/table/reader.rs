//! CSV and Excel readers

use super::{Cell, Table};
use crate::domain::{is_reserved_result_file, Config, FileExtension};
use crate::error::{AppendError, AppendResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::{ByteRecord, ReaderBuilder};
use std::fs;
use std::path::Path;

/// Read a CSV, XLS or XLSX file using the header offsets in `config`.
///
/// The tool's own result files read as an empty table so re-runs over the
/// same directory never append a previous result.
pub fn read_file(path: &Path, config: &Config) -> AppendResult<Table> {
    if is_reserved_result_file(path) {
        tracing::warn!("Cannot read reserved result filename ({})", path.display());
        return Ok(Table::default());
    }

    let ext = FileExtension::from_path(path)
        .ok_or_else(|| AppendError::UnsupportedExtension(path.to_path_buf()))?;

    match ext {
        FileExtension::Csv => read_csv(path, config.csv_header_row),
        FileExtension::Xls | FileExtension::Xlsx => {
            read_excel(path, config.sheet_name.as_deref(), config.excel_header_row)
        }
    }
}

/// Read a CSV file, skipping `header_row` physical lines before the header.
///
/// Blank lines in the skipped preamble count toward the offset.
pub fn read_csv(path: &Path, header_row: usize) -> AppendResult<Table> {
    let csv_err = |source| AppendError::Csv { path: path.to_path_buf(), source };

    let bytes = fs::read(path).map_err(|e| AppendError::io(path, e))?;
    let body = skip_lines(&bytes, header_row);

    let mut rdr = ReaderBuilder::new().has_headers(false).flexible(true).from_reader(body);

    let mut records = rdr.byte_records();
    let header = match records.next() {
        Some(record) => record_strings(&record.map_err(csv_err)?),
        None => {
            tracing::debug!("{} has no header after skipping {} rows", path.display(), header_row);
            return Ok(Table::default());
        }
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(csv_err)?;
        rows.push(record_strings(&record).into_iter().map(Cell::text).collect());
    }

    Ok(Table::from_records(header, rows))
}

fn skip_lines(bytes: &[u8], n: usize) -> &[u8] {
    let mut rest = bytes;
    for _ in 0..n {
        match rest.iter().position(|&b| b == b'\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return &[],
        }
    }
    rest
}

fn record_strings(record: &ByteRecord) -> Vec<String> {
    record.iter().map(|field| String::from_utf8_lossy(field).into_owned()).collect()
}

/// Read one worksheet, skipping `header_row` sheet rows before the header.
///
/// Uses the first sheet when `sheet_name` is `None`.
pub fn read_excel(path: &Path, sheet_name: Option<&str>, header_row: usize) -> AppendResult<Table> {
    let excel_err = |source| AppendError::Excel { path: path.to_path_buf(), source };

    let mut workbook = open_workbook_auto(path).map_err(excel_err)?;
    let sheet_names = workbook.sheet_names();

    let sheet = match sheet_name {
        Some(name) if sheet_names.iter().any(|s| s == name) => name.to_string(),
        Some(name) => {
            return Err(AppendError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: name.to_string(),
            })
        }
        None => sheet_names.first().cloned().ok_or_else(|| AppendError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: "<first sheet>".to_string(),
        })?,
    };

    let range = workbook.worksheet_range(&sheet).map_err(excel_err)?;

    // Ranges start at the first used cell, while the offset counts sheet rows.
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let skip = header_row.saturating_sub(first_row);

    let mut rows = range.rows().skip(skip);
    let header = match rows.next() {
        Some(cells) => cells.iter().map(|data| excel_cell(data).to_string()).collect(),
        None => {
            tracing::debug!("{}:{} has no header row", path.display(), sheet);
            return Ok(Table::default());
        }
    };
    let rows = rows.map(|cells| cells.iter().map(excel_cell).collect()).collect();

    Ok(Table::from_records(header, rows))
}

fn excel_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => Cell::Text(datetime.to_string()),
            None => Cell::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}
