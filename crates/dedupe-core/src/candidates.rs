//! Candidate pair generation: score every unordered pair inside each block
//!
//! Blocks are independent, so scoring runs on the rayon pool. Pairs are
//! assigned to blocks up front through a seen-set, which keeps evaluation
//! exactly-once even if a caller hands in overlapping blocks.

use crate::blocking::Block;
use crate::normalize::NormalizedRecord;
use crate::similarity::Scorer;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Blocks processed between progress reports
pub const PROGRESS_INTERVAL: usize = 100;

/// A pair of records scoring above the threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityEdge {
    /// Lower record index
    pub index_a: usize,
    /// Higher record index
    pub index_b: usize,
    /// Weighted score in [0, 1]
    pub score: f64,
    pub record_id_a: String,
    pub record_id_b: String,
}

/// Snapshot passed to a progress hook
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub processed_blocks: usize,
    pub total_blocks: usize,
    pub elapsed: Duration,
}

impl Progress {
    /// Completion in percent
    pub fn percent(&self) -> f64 {
        if self.total_blocks == 0 {
            100.0
        } else {
            self.processed_blocks as f64 / self.total_blocks as f64 * 100.0
        }
    }
}

/// Caller-supplied progress callback
pub type ProgressHook<'a> = &'a (dyn Fn(Progress) + Sync);

/// Edges plus comparison counters
#[derive(Debug, Clone, Default)]
pub struct CandidateResult {
    pub edges: Vec<SimilarityEdge>,
    pub pairs_compared: usize,
    pub compared_blocks: usize,
}

/// Unordered, de-duplicated pairs per block, in block order
fn assign_pairs(blocks: &[Block]) -> Vec<Vec<(usize, usize)>> {
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    blocks
        .iter()
        .map(|block| {
            let mut pairs = Vec::with_capacity(block.pair_count());
            if !block.is_comparable() {
                return pairs;
            }
            for (pos, &i) in block.members.iter().enumerate() {
                for &j in &block.members[pos + 1..] {
                    if i == j {
                        continue;
                    }
                    let pair = (i.min(j), i.max(j));
                    if seen.insert(pair) {
                        pairs.push(pair);
                    }
                }
            }
            pairs
        })
        .collect()
}

/// Score all candidate pairs and keep those strictly above `threshold`
///
/// `records[i].index` must equal `i`. Edge order follows block order, then
/// pair order within the block, regardless of thread scheduling.
pub fn generate_edges(
    blocks: &[Block],
    records: &[NormalizedRecord],
    scorer: &Scorer,
    threshold: f64,
    progress: Option<ProgressHook<'_>>,
) -> CandidateResult {
    let work = assign_pairs(blocks);
    let total_blocks = blocks.len();
    let compared_blocks = work.iter().filter(|pairs| !pairs.is_empty()).count();
    let pairs_compared = work.iter().map(Vec::len).sum();
    debug!(
        "{} of {} blocks have candidate pairs ({} pairs)",
        compared_blocks, total_blocks, pairs_compared
    );

    let start = Instant::now();
    let processed = AtomicUsize::new(0);

    let per_block: Vec<Vec<SimilarityEdge>> = work
        .par_iter()
        .map(|pairs| {
            let edges = pairs
                .iter()
                .filter_map(|&(i, j)| {
                    let (a, b) = (&records[i], &records[j]);
                    let score = scorer.score(a, b);
                    (score > threshold).then(|| SimilarityEdge {
                        index_a: i,
                        index_b: j,
                        score,
                        record_id_a: a.record_id.clone(),
                        record_id_b: b.record_id.clone(),
                    })
                })
                .collect();

            let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_INTERVAL == 0 || done == total_blocks {
                report_progress(progress, done, total_blocks, start.elapsed());
            }
            edges
        })
        .collect();

    CandidateResult {
        edges: per_block.into_iter().flatten().collect(),
        pairs_compared,
        compared_blocks,
    }
}

fn report_progress(
    hook: Option<ProgressHook<'_>>,
    processed_blocks: usize,
    total_blocks: usize,
    elapsed: Duration,
) {
    let progress = Progress {
        processed_blocks,
        total_blocks,
        elapsed,
    };
    info!(
        "Progress: {:.1}% | Time elapsed: {:.1}s",
        progress.percent(),
        elapsed.as_secs_f64()
    );
    if let Some(hook) = hook {
        hook(progress);
    }
}
