//! Core table types for representing input records

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An in-memory table of entity records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Row data; a row's position is its record index
    pub rows: Vec<Row>,
    /// Source file path (or a descriptive name for in-memory tables)
    pub source_path: PathBuf,
}

impl Table {
    /// Build a table from in-memory string rows
    ///
    /// Rows are padded with empty cells or truncated to the header width.
    pub fn from_strings<H, C>(source_name: &str, headers: &[H], rows: &[Vec<C>]) -> Self
    where
        H: AsRef<str>,
        C: AsRef<str>,
    {
        let columns: Vec<Column> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| Column::new(name.as_ref().to_string(), i))
            .collect();

        let rows = rows
            .iter()
            .map(|raw| {
                let cells = raw.iter().map(|c| CellValue::text(c.as_ref())).collect();
                Row::new(cells).fit_to(columns.len())
            })
            .collect();

        Self {
            columns,
            rows,
            source_path: PathBuf::from(source_name),
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a row by record index
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Column names in their original order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// A column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name (e.g., "Email")
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }
}

/// A row of data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    /// Cell values for each column
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// Pad with empty cells or truncate to exactly `width` cells
    pub(crate) fn fit_to(mut self, width: usize) -> Self {
        if self.cells.len() < width {
            self.cells.resize(width, CellValue::Empty);
        } else {
            self.cells.truncate(width);
        }
        self
    }
}

/// A cell value
///
/// Cells loaded from text keep their raw text unchanged; `Integer` and
/// `Float` exist for callers that build tables from typed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    String(String),
    /// Empty/null cell
    Empty,
}

impl CellValue {
    /// Wrap raw text without any type detection
    ///
    /// Leading zeros, signs and number formatting are preserved exactly.
    pub fn text(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::String(s.to_string())
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Empty, or text made only of whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::String(s) => s.trim().is_empty(),
            CellValue::Empty => true,
            _ => false,
        }
    }

    /// Convert to a display string
    pub fn to_string_value(&self) -> String {
        match self {
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}
