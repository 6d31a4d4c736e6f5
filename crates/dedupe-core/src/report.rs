//! Report aggregation and output writers
//!
//! Turns clusters and edges into the group summary and per-record detail
//! tables, and persists them as CSV or JSON.

use crate::candidates::SimilarityEdge;
use crate::cluster::Cluster;
use crate::error::{Error, Result};
use crate::normalize::{FieldSchema, RECORD_ID_SENTINEL};
use crate::table::Table;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default file name for the group summary
pub const SUMMARY_FILE_NAME: &str = "Duplicate_Groups_Summary.csv";

/// Default file name for the per-record detail table
pub const DETAILS_FILE_NAME: &str = "Duplicate_Details.csv";

/// Default file name for the JSON report
pub const JSON_REPORT_FILE_NAME: &str = "Duplicate_Report.json";

/// Leading columns of the detail table
pub const DETAIL_KEY_COLUMNS: [&str; 3] = ["Duplicate_Group_ID", "Similarity_Score", "Record_ID"];

/// A fully scored duplicate group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    pub group_id: usize,
    /// Member record indices, ascending
    pub members: Vec<usize>,
    /// Mean score over all edges internal to the group
    pub average_score: f64,
    /// Distinct non-sentinel record IDs seen on internal edges
    pub record_ids: Vec<String>,
}

/// One row of the group summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    #[serde(rename = "Duplicate_Group_ID")]
    pub group_id: usize,
    #[serde(rename = "Number_of_Records")]
    pub record_count: usize,
    #[serde(rename = "Average_Similarity")]
    pub average_similarity: f64,
    /// Comma-joined record IDs
    #[serde(rename = "Record_IDs")]
    pub record_ids: String,
}

/// One row of the detail table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub group_id: usize,
    pub similarity_score: f64,
    pub record_id: String,
    /// The record's original cells, in original column order
    pub values: Vec<String>,
}

/// Per-record detail table with its header
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailTable {
    /// Key columns followed by every original column
    pub columns: Vec<String>,
    pub rows: Vec<DetailRow>,
}

impl DetailTable {
    /// Cells of one row, aligned with `columns`
    pub fn record(&self, row: &DetailRow) -> Vec<String> {
        let mut out = Vec::with_capacity(self.columns.len());
        out.push(row.group_id.to_string());
        out.push(row.similarity_score.to_string());
        out.push(row.record_id.clone());
        out.extend(row.values.iter().cloned());
        out
    }
}

/// Counters describing one engine run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub record_count: usize,
    pub block_count: usize,
    pub compared_block_count: usize,
    pub pairs_compared: usize,
    pub edge_count: usize,
    pub group_count: usize,
    pub records_in_groups: usize,
}

/// Everything a run produces when duplicates exist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DedupeReport {
    pub groups: Vec<DuplicateGroup>,
    pub summary: Vec<GroupSummary>,
    pub details: DetailTable,
    pub edges: Vec<SimilarityEdge>,
    pub stats: RunStats,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    stats: &'a RunStats,
    summary: &'a [GroupSummary],
    details: &'a DetailTable,
}

/// Score each cluster from its internal edges
pub fn aggregate_groups(clusters: &[Cluster], edges: &[SimilarityEdge]) -> Vec<DuplicateGroup> {
    let owner: HashMap<usize, usize> = clusters
        .iter()
        .enumerate()
        .flat_map(|(slot, c)| c.members.iter().map(move |&m| (m, slot)))
        .collect();

    let mut internal: Vec<Vec<&SimilarityEdge>> = vec![Vec::new(); clusters.len()];
    for edge in edges {
        match (owner.get(&edge.index_a), owner.get(&edge.index_b)) {
            (Some(a), Some(b)) if a == b => internal[*a].push(edge),
            _ => {}
        }
    }

    clusters
        .iter()
        .zip(internal)
        .map(|(cluster, edges)| {
            let average_score = if edges.is_empty() {
                0.0
            } else {
                edges.iter().map(|e| e.score).sum::<f64>() / edges.len() as f64
            };

            let mut seen: HashSet<&str> = HashSet::new();
            let mut record_ids = Vec::new();
            for edge in &edges {
                for id in [edge.record_id_a.as_str(), edge.record_id_b.as_str()] {
                    if id != RECORD_ID_SENTINEL && seen.insert(id) {
                        record_ids.push(id.to_string());
                    }
                }
            }

            DuplicateGroup {
                group_id: cluster.group_id,
                members: cluster.members.clone(),
                average_score,
                record_ids,
            }
        })
        .collect()
}

/// One summary row per group
pub fn build_summary(groups: &[DuplicateGroup]) -> Vec<GroupSummary> {
    groups
        .iter()
        .map(|g| GroupSummary {
            group_id: g.group_id,
            record_count: g.members.len(),
            average_similarity: g.average_score,
            record_ids: g.record_ids.join(", "),
        })
        .collect()
}

/// One detail row per group member, carrying all original fields
pub fn build_details(table: &Table, schema: &FieldSchema, groups: &[DuplicateGroup]) -> DetailTable {
    let columns = DETAIL_KEY_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(table.columns.iter().map(|c| c.name.clone()))
        .collect();

    let rows = groups
        .iter()
        .flat_map(|g| g.members.iter().map(move |&m| (g, m)))
        .filter_map(|(group, index)| {
            let row = table.row(index)?;
            Some(DetailRow {
                group_id: group.group_id,
                similarity_score: group.average_score,
                record_id: schema.record_id(row),
                values: row.cells.iter().map(|c| c.to_string_value()).collect(),
            })
        })
        .collect();

    DetailTable { columns, rows }
}

impl DedupeReport {
    /// Write the group summary as CSV
    pub fn write_summary_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = csv_writer(path)?;
        for row in &self.summary {
            writer.serialize(row).map_err(|e| csv_error(path, e))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the per-record detail table as CSV
    pub fn write_details_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = csv_writer(path)?;
        writer
            .write_record(&self.details.columns)
            .map_err(|e| csv_error(path, e))?;
        for row in &self.details.rows {
            writer
                .write_record(self.details.record(row))
                .map_err(|e| csv_error(path, e))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write both CSV files into `dir` under their default names
    pub fn write_csv_files<P: AsRef<Path>>(&self, dir: P) -> Result<(PathBuf, PathBuf)> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let summary = dir.join(SUMMARY_FILE_NAME);
        let details = dir.join(DETAILS_FILE_NAME);
        self.write_summary_csv(&summary)?;
        self.write_details_csv(&details)?;
        Ok((summary, details))
    }

    /// Write summary, details and stats as one JSON document
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let doc = JsonReport {
            generated_at: Utc::now(),
            stats: &self.stats,
            summary: &self.summary,
            details: &self.details,
        };
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &doc)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

fn csv_writer(path: &Path) -> Result<csv::Writer<File>> {
    csv::Writer::from_path(path).map_err(|e| csv_error(path, e))
}

fn csv_error(path: &Path, source: csv::Error) -> Error {
    Error::Csv {
        path: path.to_path_buf(),
        source,
    }
}
