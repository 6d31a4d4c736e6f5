//! CSV reader for input record tables

use crate::error::{Error, Result};
use crate::table::{CellValue, Column, Row, Table};
use log::warn;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Parse a CSV file into a Table
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    read_table(BufReader::new(file), path.to_path_buf())
}

/// Parse CSV from a string (useful for testing)
pub fn parse_csv_str(content: &str, source_name: &str) -> Result<Table> {
    read_table(content.as_bytes(), PathBuf::from(source_name))
}

fn read_table<R: Read>(reader: R, path: PathBuf) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Allow varying number of fields
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| Error::Csv {
        path: path.clone(),
        source: e,
    })?;

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| Column::new(name.trim().to_string(), i))
        .collect();

    if columns.is_empty() {
        return Err(Error::CsvParse {
            path,
            message: "no columns found in CSV".to_string(),
        });
    }

    let mut rows = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;

        let cells: Vec<CellValue> = record.iter().map(CellValue::text).collect();

        if cells.len() > columns.len() {
            warn!(
                "row {} in {} has more cells than columns, truncating",
                row_idx + 1,
                path.display()
            );
        }

        rows.push(Row::new(cells).fit_to(columns.len()));
    }

    Ok(Table {
        columns,
        rows,
        source_path: path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let csv = "Record ID,First Name,Email\nR1,Ann,ann@x.com\nR2,Bob,bob@x.com\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[0].name, "Record ID");
        assert_eq!(table.columns[2].name, "Email");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[1].cells[1],
            CellValue::String("Bob".to_string())
        );
    }

    #[test]
    fn test_parse_with_empty_cells() {
        let csv = "First Name,Phone Number\nAnn,\n,5551234\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.rows[0].cells[1], CellValue::Empty);
        assert_eq!(table.rows[1].cells[0], CellValue::Empty);
        assert_eq!(table.rows[1].cells[1], CellValue::text("5551234"));
    }

    #[test]
    fn test_parse_short_and_long_rows() {
        let csv = "A,B\n1\n1,2,3\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.rows[0].cells, vec![CellValue::text("1"), CellValue::Empty]);
        assert_eq!(table.rows[1].cells.len(), 2);
    }

    #[test]
    fn test_parse_keeps_numeric_looking_text() {
        let csv = "Record ID,Phone Number,Zip\n007,0123456789,02134\n+1.50, 555 ,1e3\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        let raw: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.to_string_value()).collect())
            .collect();
        assert_eq!(raw[0], vec!["007", "0123456789", "02134"]);
        assert_eq!(raw[1], vec!["+1.50", " 555 ", "1e3"]);
    }

    #[test]
    fn test_parse_header_only() {
        let table = parse_csv_str("First Name,Last Name\n", "test.csv").unwrap();

        assert_eq!(table.column_count(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_csv("/nonexistent/records.csv").unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
