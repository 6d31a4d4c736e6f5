//! Blocking: partition records by a cheap prefix key before pairwise scoring
//!
//! Two records with different keys are never compared. Duplicates whose
//! leading characters differ on every compared field are therefore missed;
//! the payoff is O(sum of |block|^2) comparisons instead of O(n^2).

use crate::normalize::NormalizedRecord;
use serde::Serialize;
use std::collections::HashMap;

/// Characters taken from the front of each normalized field
pub const BLOCKING_PREFIX_LEN: usize = 2;

/// Record indices sharing one blocking key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub key: String,
    /// Record indices in table order
    pub members: Vec<usize>,
}

impl Block {
    /// Number of records sharing the key
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for blocks built by `build_blocks`
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether this block yields any candidate pairs
    pub fn is_comparable(&self) -> bool {
        self.members.len() > 1
    }

    /// Number of unordered pairs inside the block
    pub fn pair_count(&self) -> usize {
        let n = self.members.len();
        n * n.saturating_sub(1) / 2
    }
}

/// Concatenate the prefix of each normalized value, in field order
pub fn blocking_key<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .flat_map(|v| v.as_ref().chars().take(BLOCKING_PREFIX_LEN))
        .collect()
}

/// Group records by blocking key
///
/// Blocks come out in order of first appearance, so every record lands in
/// exactly one block and the result is deterministic.
pub fn build_blocks(records: &[NormalizedRecord]) -> Vec<Block> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut blocks: Vec<Block> = Vec::new();

    for record in records {
        let key = blocking_key(&record.values);
        match slots.get(&key) {
            Some(&slot) => blocks[slot].members.push(record.index),
            None => {
                slots.insert(key.clone(), blocks.len());
                blocks.push(Block {
                    key,
                    members: vec![record.index],
                });
            }
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, values: &[&str]) -> NormalizedRecord {
        NormalizedRecord {
            index,
            record_id: "N/A".to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn test_blocking_key_prefixes() {
        assert_eq!(
            blocking_key(&["john", "doe", "jd@x.com", "5551234"]),
            "jodojd55"
        );
    }

    #[test]
    fn test_blocking_key_short_values() {
        assert_eq!(blocking_key(&["a", "", "xy", "1"]), "axy1");
        assert_eq!(blocking_key(&["éa", "ñb"]), "éañb");
    }

    #[test]
    fn test_build_blocks_partitions_indices() {
        let records = vec![
            record(0, &["john", "doe"]),
            record(1, &["mary", "ann"]),
            record(2, &["johnny", "dorian"]),
            record(3, &["zed", "x"]),
        ];
        let blocks = build_blocks(&records);

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].key, "jodo");
        assert_eq!(blocks[0].members, vec![0, 2]);
        assert!(blocks[0].is_comparable());
        assert!(!blocks[1].is_comparable());

        let mut all: Vec<usize> = blocks.iter().flat_map(|b| b.members.clone()).collect();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_build_blocks_empty() {
        assert!(build_blocks(&[]).is_empty());
    }

    #[test]
    fn test_pair_count() {
        let block = Block {
            key: "k".to_string(),
            members: vec![0, 1, 2, 3],
        };
        assert_eq!(block.pair_count(), 6);
    }
}
