//! dedupe-core: Core library for finding fuzzy duplicate records
//!
//! This library provides functionality to:
//! - Load record tables from CSV (or build them in memory)
//! - Normalize compared fields and partition records into blocks
//! - Score candidate pairs with a weighted fuzzy similarity ratio
//! - Group matching records into connected components
//! - Produce group summary and per-record detail reports

pub mod blocking;
pub mod candidates;
pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod parser;
pub mod report;
pub mod similarity;
pub mod table;

pub use blocking::{blocking_key, build_blocks, Block};
pub use candidates::{generate_edges, Progress, SimilarityEdge};
pub use cluster::{build_clusters, Cluster};
pub use config::{DedupeConfig, FieldWeight};
pub use engine::{find_duplicates, DedupeOutcome, Deduplicator};
pub use error::{Error, Result};
pub use normalize::{normalize_table, normalize_text, FieldSchema, NormalizedRecord, RECORD_ID_SENTINEL};
pub use parser::{parse_csv, parse_csv_str};
pub use report::{
    DedupeReport, DetailRow, DetailTable, DuplicateGroup, GroupSummary, RunStats,
    DETAILS_FILE_NAME, JSON_REPORT_FILE_NAME, SUMMARY_FILE_NAME,
};
pub use similarity::{ratio, FieldScore, Scorer};
pub use table::{CellValue, Column, Row, Table};
