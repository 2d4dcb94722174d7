//! Append engine: read, tag and concatenate resolved files

use crate::domain::{Config, FILENAME_COLUMN};
use crate::error::AppendResult;
use crate::table::{read_file, Cell, Table};
use crate::utils::base_name;
use std::path::PathBuf;

/// Read every file in order, tag its rows with the file's base name and
/// concatenate the results over the union of their columns.
///
/// Fails on the first file that cannot be read.
pub fn append(files: &[PathBuf], config: &Config) -> AppendResult<Table> {
    let mut tables = Vec::with_capacity(files.len());

    for path in files {
        if config.verbose {
            tracing::info!("Appending {}", path.display());
        }
        let table = read_file(path, config)?;
        tracing::debug!("Read {} rows from {}", table.shape().0, path.display());
        // Tagging a row-less table would put the tag column ahead of real data columns.
        if table.rows().is_empty() {
            tables.push(table);
        } else {
            tables.push(table.with_column(FILENAME_COLUMN, Cell::text(base_name(path))));
        }
    }

    Ok(Table::concat(tables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppendError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_append_sums_rows_and_adds_filename_column() {
        let tmp = TempDir::new().unwrap();
        let f1 = tmp.path().join("f1.csv");
        let f2 = tmp.path().join("f2.csv");
        fs::write(&f1, "a,b\n1,2\n3,4\n").unwrap();
        fs::write(&f2, "a,b\n5,6\n").unwrap();

        let table = append(&[f1, f2], &Config::default()).unwrap();
        assert_eq!(table.shape(), (3, 3));
        assert_eq!(table.columns(), &["a", "b", "filename"]);
        assert_eq!(table.rows()[0][2], Cell::text("f1.csv"));
        assert_eq!(table.rows()[2][2], Cell::text("f2.csv"));
    }

    #[test]
    fn test_append_differing_columns() {
        let tmp = TempDir::new().unwrap();
        let f1 = tmp.path().join("f1.csv");
        let f2 = tmp.path().join("f2.csv");
        fs::write(&f1, "a,b\n1,2\n").unwrap();
        fs::write(&f2, "b,c\n3,4\n").unwrap();

        let table = append(&[f1, f2], &Config::default()).unwrap();
        assert_eq!(table.columns(), &["a", "b", "filename", "c"]);
        assert_eq!(
            table.rows()[1],
            vec![Cell::Empty, Cell::text("3"), Cell::text("f2.csv"), Cell::text("4")]
        );
    }

    #[test]
    fn test_append_uses_csv_header_row() {
        let tmp = TempDir::new().unwrap();
        let f1 = tmp.path().join("f1.csv");
        fs::write(&f1, "report\ngenerated today\nx,y\n1,2\n").unwrap();

        let config = Config { csv_header_row: 2, ..Config::default() };
        let table = append(&[f1], &config).unwrap();
        assert_eq!(table.columns(), &["x", "y", "filename"]);
        assert_eq!(table.shape(), (1, 3));
    }

    #[test]
    fn test_append_skips_reserved_result_file() {
        let tmp = TempDir::new().unwrap();
        let f1 = tmp.path().join("f1.csv");
        let previous = tmp.path().join("tabappend.csv");
        fs::write(&f1, "a\n1\n").unwrap();
        fs::write(&previous, "a,filename\n1,f1.csv\n").unwrap();

        let table = append(&[f1, previous], &Config::default()).unwrap();
        assert_eq!(table.shape(), (1, 2));
    }

    #[test]
    fn test_append_fails_on_unsupported_extension() {
        let tmp = TempDir::new().unwrap();
        let notes = tmp.path().join("notes.txt");
        fs::write(&notes, "hello").unwrap();

        let err = append(&[notes], &Config::default()).unwrap_err();
        assert!(matches!(err, AppendError::UnsupportedExtension(_)));
    }

    #[test]
    fn test_append_empty_file_keeps_tag_column_last() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("a_empty.csv");
        let f1 = tmp.path().join("f1.csv");
        fs::write(&empty, "").unwrap();
        fs::write(&f1, "a,b\n1,2\n").unwrap();

        let table = append(&[empty, f1], &Config::default()).unwrap();
        assert_eq!(table.columns(), &["a", "b", "filename"]);
        assert_eq!(table.shape(), (1, 3));
    }
}
