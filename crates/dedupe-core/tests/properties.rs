//! Property-based checks for the matching pipeline

use dedupe_core::{
    blocking_key, build_blocks, find_duplicates, normalize_text, DedupeConfig, NormalizedRecord,
    Scorer, Table,
};
use proptest::prelude::*;
use std::collections::HashSet;

const HEADERS: [&str; 4] = ["First Name", "Last Name", "Email", "Phone Number"];

fn normalized(index: usize, values: Vec<String>) -> NormalizedRecord {
    NormalizedRecord {
        index,
        record_id: "N/A".to_string(),
        values,
    }
}

fn field() -> impl Strategy<Value = String> {
    "[a-c0-9]{0,6}"
}

fn fields() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(field(), 4)
}

proptest! {
    #[test]
    fn prop_normalize_idempotent(s in "[ \\tA-Za-zÀ-ÿ0-9@._-]{0,24}") {
        let once = normalize_text(&s);
        prop_assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn prop_score_symmetric(a in fields(), b in fields()) {
        let scorer = Scorer::new(&DedupeConfig::default());
        let (ra, rb) = (normalized(0, a), normalized(1, b));
        let score = scorer.score(&ra, &rb);

        prop_assert_eq!(score, scorer.score(&rb, &ra));
        prop_assert!((0.0..=1.0 + 1e-9).contains(&score));
    }

    #[test]
    fn prop_blocks_partition_indices(rows in prop::collection::vec(fields(), 0..40)) {
        let records: Vec<NormalizedRecord> = rows
            .into_iter()
            .enumerate()
            .map(|(i, v)| normalized(i, v))
            .collect();
        let blocks = build_blocks(&records);

        let mut seen = HashSet::new();
        for block in &blocks {
            for &member in &block.members {
                prop_assert!(seen.insert(member), "index {} in two blocks", member);
                prop_assert_eq!(&blocking_key(&records[member].values), &block.key);
            }
        }
        prop_assert_eq!(seen.len(), records.len());
    }

    #[test]
    fn prop_groups_partition_edge_nodes(
        rows in prop::collection::vec(prop::collection::vec("[ab]{1,3}", 4), 0..30),
        threshold in 0.0f64..0.9,
    ) {
        let table = Table::from_strings("generated", &HEADERS, &rows);
        let outcome = find_duplicates(&table, &DedupeConfig::with_threshold(threshold)).unwrap();

        let Some(report) = outcome.report() else {
            return Ok(());
        };

        let mut pairs = HashSet::new();
        let mut touched = HashSet::new();
        for edge in &report.edges {
            prop_assert!(edge.index_a < edge.index_b);
            prop_assert!(edge.score > threshold);
            prop_assert!(pairs.insert((edge.index_a, edge.index_b)));
            touched.insert(edge.index_a);
            touched.insert(edge.index_b);
        }

        let mut grouped = HashSet::new();
        for group in &report.groups {
            prop_assert!(group.members.len() >= 2);
            for &member in &group.members {
                prop_assert!(grouped.insert(member), "index {} in two groups", member);
            }
        }
        prop_assert_eq!(grouped, touched);
        prop_assert_eq!(report.details.rows.len(), report.stats.records_in_groups);
    }
}
