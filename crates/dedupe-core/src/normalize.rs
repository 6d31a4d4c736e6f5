//! Field normalization and column resolution

use crate::config::DedupeConfig;
use crate::error::{Error, Result};
use crate::table::{CellValue, Row, Table};
use serde::Serialize;

/// Placeholder for an absent record identifier
pub const RECORD_ID_SENTINEL: &str = "N/A";

/// Lower-case and strip surrounding whitespace
pub fn normalize_text(value: &str) -> String {
    value.to_lowercase().trim().to_string()
}

/// Coerce a cell to text, then normalize it
pub fn normalize_value(value: &CellValue) -> String {
    normalize_text(&value.to_string_value())
}

/// Column positions of the compared fields and the record ID in one table
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// Column index per compared field, in configured order
    pub field_columns: Vec<usize>,
    /// Column index of the record ID, if the table has one
    pub record_id_column: Option<usize>,
}

impl FieldSchema {
    /// Resolve configured field names against a table's header
    pub fn resolve(table: &Table, config: &DedupeConfig) -> Result<Self> {
        let field_columns = config
            .fields
            .iter()
            .map(|field| {
                table
                    .find_column(&field.name)
                    .map(|c| c.index)
                    .ok_or_else(|| Error::MissingColumn {
                        column: field.name.clone(),
                        path: table.source_path.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let record_id_column = table
            .find_column(&config.record_id_column)
            .map(|c| c.index);

        Ok(Self {
            field_columns,
            record_id_column,
        })
    }

    /// A row's record ID as written, or the sentinel when absent or blank
    pub fn record_id(&self, row: &Row) -> String {
        self.record_id_column
            .and_then(|i| row.get(i))
            .filter(|v| !v.is_blank())
            .map(CellValue::to_string_value)
            .unwrap_or_else(|| RECORD_ID_SENTINEL.to_string())
    }
}

/// A record's comparison view: normalized compared fields plus identity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    /// Position in the source table
    pub index: usize,
    /// External record ID, or the sentinel
    pub record_id: String,
    /// Normalized values, one per compared field in configured order
    pub values: Vec<String>,
}

/// Normalize one row
pub fn normalize_record(index: usize, row: &Row, schema: &FieldSchema) -> NormalizedRecord {
    let values = schema
        .field_columns
        .iter()
        .map(|&col| row.get(col).map(normalize_value).unwrap_or_default())
        .collect();

    NormalizedRecord {
        index,
        record_id: schema.record_id(row),
        values,
    }
}

/// Normalize every row of a table
pub fn normalize_table(table: &Table, schema: &FieldSchema) -> Vec<NormalizedRecord> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| normalize_record(index, row, schema))
        .collect()
}
