//! Engine entry point: normalize, block, score, cluster, report

use crate::blocking::build_blocks;
use crate::candidates::{generate_edges, Progress, ProgressHook};
use crate::cluster::build_clusters;
use crate::config::DedupeConfig;
use crate::error::{Error, Result};
use crate::normalize::{normalize_record, normalize_table, FieldSchema};
use crate::report::{aggregate_groups, build_details, build_summary, DedupeReport, RunStats};
use crate::similarity::{FieldScore, Scorer};
use crate::table::Table;
use log::{debug, info};

/// Result of a run
///
/// `NoDuplicates` is a normal outcome, not a failure; no report tables are
/// produced for it.
#[derive(Debug, Clone, PartialEq)]
pub enum DedupeOutcome {
    NoDuplicates(RunStats),
    Duplicates(DedupeReport),
}

impl DedupeOutcome {
    /// Whether at least one duplicate group was found
    pub fn has_duplicates(&self) -> bool {
        matches!(self, DedupeOutcome::Duplicates(_))
    }

    /// The report, if duplicates were found
    pub fn report(&self) -> Option<&DedupeReport> {
        match self {
            DedupeOutcome::Duplicates(report) => Some(report),
            DedupeOutcome::NoDuplicates(_) => None,
        }
    }

    /// Consume the outcome, keeping only the report
    pub fn into_report(self) -> Option<DedupeReport> {
        match self {
            DedupeOutcome::Duplicates(report) => Some(report),
            DedupeOutcome::NoDuplicates(_) => None,
        }
    }

    /// Run counters; present for both outcomes
    pub fn stats(&self) -> &RunStats {
        match self {
            DedupeOutcome::Duplicates(report) => &report.stats,
            DedupeOutcome::NoDuplicates(stats) => stats,
        }
    }
}

/// A configured, validated deduplication run
pub struct Deduplicator<'a> {
    config: DedupeConfig,
    scorer: Scorer,
    progress: Option<ProgressHook<'a>>,
}

impl<'a> Deduplicator<'a> {
    /// Validate the configuration up front
    pub fn new(config: DedupeConfig) -> Result<Self> {
        config.validate()?;
        let scorer = Scorer::new(&config);
        Ok(Self {
            config,
            scorer,
            progress: None,
        })
    }

    /// Receive progress snapshots while blocks are scored
    pub fn with_progress(mut self, hook: &'a (dyn Fn(Progress) + Sync)) -> Self {
        self.progress = Some(hook);
        self
    }

    /// The validated configuration this run uses
    pub fn config(&self) -> &DedupeConfig {
        &self.config
    }

    /// Find duplicate groups in `table`
    pub fn run(&self, table: &Table) -> Result<DedupeOutcome> {
        let schema = FieldSchema::resolve(table, &self.config)?;

        info!("Loading and preprocessing {} records...", table.row_count());
        let records = normalize_table(table, &schema);

        info!("Creating blocking structure...");
        let blocks = build_blocks(&records);
        debug!(
            "{} blocks, largest has {} records",
            blocks.len(),
            blocks.iter().map(|b| b.len()).max().unwrap_or(0)
        );

        info!("Finding duplicates...");
        let candidates = generate_edges(
            &blocks,
            &records,
            &self.scorer,
            self.config.threshold,
            self.progress,
        );

        let mut stats = RunStats {
            record_count: records.len(),
            block_count: blocks.len(),
            compared_block_count: candidates.compared_blocks,
            pairs_compared: candidates.pairs_compared,
            edge_count: candidates.edges.len(),
            ..RunStats::default()
        };

        if candidates.edges.is_empty() {
            info!("No duplicates found");
            return Ok(DedupeOutcome::NoDuplicates(stats));
        }

        info!("Processing duplicate groups...");
        let clusters = build_clusters(&candidates.edges);
        let groups = aggregate_groups(&clusters, &candidates.edges);
        let summary = build_summary(&groups);
        let details = build_details(table, &schema, &groups);

        stats.group_count = groups.len();
        stats.records_in_groups = details.rows.len();
        info!("Found {} duplicate groups", stats.group_count);
        info!("Total records with duplicates: {}", stats.records_in_groups);

        Ok(DedupeOutcome::Duplicates(DedupeReport {
            groups,
            summary,
            details,
            edges: candidates.edges,
            stats,
        }))
    }

    /// Per-field score breakdown for two records of `table`
    pub fn explain(&self, table: &Table, a: usize, b: usize) -> Result<(f64, Vec<FieldScore>)> {
        let schema = FieldSchema::resolve(table, &self.config)?;
        let lookup = |index: usize| {
            table
                .row(index)
                .map(|row| normalize_record(index, row, &schema))
                .ok_or(Error::RecordOutOfRange {
                    index,
                    count: table.row_count(),
                })
        };
        let (left, right) = (lookup(a)?, lookup(b)?);
        Ok((
            self.scorer.score(&left, &right),
            self.scorer.explain(&left, &right),
        ))
    }
}

/// Run the engine once with `config`
pub fn find_duplicates(table: &Table, config: &DedupeConfig) -> Result<DedupeOutcome> {
    Deduplicator::new(config.clone())?.run(table)
}
