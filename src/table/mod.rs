//! In-memory table model with outer-union concatenation

use std::collections::{HashMap, HashSet};
use std::fmt;

pub mod reader;
pub mod writer;

pub use reader::read_file;
pub use writer::save_result;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    /// Text cell, or `Empty` for an empty string.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
        }
    }
}

/// Rectangular table: every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table from a raw header and rows.
    ///
    /// Blank header cells become `Unnamed: <index>`, repeated names get a
    /// `.<n>` suffix, short rows are padded and long rows widen the header.
    pub fn from_records(header: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(header.len());
        let columns = normalize_header(header, width);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Set `name` to `value` on every row, adding the column when missing.
    pub fn with_column(mut self, name: &str, value: Cell) -> Self {
        match self.columns.iter().position(|c| c == name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.clone();
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(value.clone());
                }
            }
        }
        self
    }

    /// Stack tables vertically over the union of their columns.
    ///
    /// Columns keep the order of first appearance; cells a table lacks are
    /// left empty.
    pub fn concat<I>(tables: I) -> Table
    where
        I: IntoIterator<Item = Table>,
    {
        let mut result = Table::default();
        let mut index: HashMap<String, usize> = HashMap::new();

        for table in tables {
            let positions: Vec<usize> = table
                .columns
                .iter()
                .map(|name| {
                    *index.entry(name.clone()).or_insert_with(|| {
                        result.columns.push(name.clone());
                        result.columns.len() - 1
                    })
                })
                .collect();

            for row in table.rows {
                let mut out = vec![Cell::Empty; result.columns.len()];
                for (cell, &pos) in row.into_iter().zip(&positions) {
                    out[pos] = cell;
                }
                result.rows.push(out);
            }
        }

        let width = result.columns.len();
        for row in &mut result.rows {
            row.resize(width, Cell::Empty);
        }
        result
    }
}

fn normalize_header(header: Vec<String>, width: usize) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::with_capacity(width);

    for i in 0..width {
        let raw = header.get(i).map(String::as_str).unwrap_or("");
        let base = if raw.trim().is_empty() { format!("Unnamed: {}", i) } else { raw.to_string() };

        let mut name = base.clone();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, n);
            n += 1;
        }
        seen.insert(name.clone());
        columns.push(name);
    }
    columns
}
