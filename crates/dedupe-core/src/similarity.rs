//! Weighted fuzzy similarity between two normalized records

use crate::config::DedupeConfig;
use crate::normalize::NormalizedRecord;
use serde::Serialize;

/// Similarity ratio in [0, 100] based on insert/delete edit distance.
///
/// `100 * (1 - indel / (len_a + len_b))`, which equals
/// `200 * lcs / (len_a + len_b)`. Two empty strings are identical (100).
/// Lengths are counted in chars, not bytes.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a == b {
        return 100.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    200.0 * lcs_length(&a, &b) as f64 / total as f64
}

/// Longest common subsequence length using two rows of DP
fn lcs_length(a: &[char], b: &[char]) -> usize {
    let n = b.len();
    let mut prev = vec![0usize; n + 1];
    let mut curr = vec![0usize; n + 1];

    for &ca in a {
        for j in 1..=n {
            curr[j] = if ca == b[j - 1] {
                prev[j - 1] + 1
            } else {
                curr[j - 1].max(prev[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

/// One field's contribution to a pair score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldScore {
    pub field: String,
    pub left: String,
    pub right: String,
    /// Ratio in [0, 100]
    pub ratio: f64,
    pub weight: f64,
    /// `ratio * weight / 100`
    pub contribution: f64,
}

/// Scores record pairs with fixed per-field weights
#[derive(Debug, Clone)]
pub struct Scorer {
    names: Vec<String>,
    weights: Vec<f64>,
}

impl Scorer {
    /// Build a scorer from a validated configuration
    pub fn new(config: &DedupeConfig) -> Self {
        Self {
            names: config.fields.iter().map(|f| f.name.clone()).collect(),
            weights: config.fields.iter().map(|f| f.weight).collect(),
        }
    }

    /// Weighted score in [0, 1]
    ///
    /// Sums `ratio * weight` over fields, then divides by 100.
    pub fn score(&self, a: &NormalizedRecord, b: &NormalizedRecord) -> f64 {
        let total: f64 = self
            .weights
            .iter()
            .zip(a.values.iter().zip(&b.values))
            .map(|(w, (va, vb))| ratio(va, vb) * w)
            .sum();
        total / 100.0
    }

    /// Per-field breakdown of a pair score
    pub fn explain(&self, a: &NormalizedRecord, b: &NormalizedRecord) -> Vec<FieldScore> {
        self.names
            .iter()
            .zip(&self.weights)
            .zip(a.values.iter().zip(&b.values))
            .map(|((field, &weight), (va, vb))| {
                let r = ratio(va, vb);
                FieldScore {
                    field: field.clone(),
                    left: va.clone(),
                    right: vb.clone(),
                    ratio: r,
                    weight,
                    contribution: r * weight / 100.0,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(values: &[&str]) -> NormalizedRecord {
        NormalizedRecord {
            index: 0,
            record_id: "N/A".to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn test_ratio_identical_and_empty() {
        assert_eq!(ratio("john", "john"), 100.0);
        assert_eq!(ratio("", ""), 100.0);
        assert_eq!(ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_ratio_disjoint() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_ratio_partial() {
        // lcs("kitten", "sitting") = 4, 200 * 4 / 13
        let r = ratio("kitten", "sitting");
        assert!((r - 800.0 / 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_single_substitution() {
        // one differing digit out of ten: lcs 9, 200 * 9 / 20
        assert!((ratio("5551234567", "5551234568") - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_counts_chars() {
        assert_eq!(ratio("josé", "josé"), 100.0);
        assert!((ratio("josé", "jose") - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_weights() {
        let scorer = Scorer::new(&DedupeConfig::default());
        let a = record(&["ann", "lee", "a@x.com", "111"]);
        let b = record(&["ann", "lee", "a@x.com", "999"]);

        // phone contributes 0, everything else identical
        assert!((scorer.score(&a, &b) - 0.75).abs() < 1e-9);
        assert!((scorer.score(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_symmetric() {
        let scorer = Scorer::new(&DedupeConfig::default());
        let a = record(&["jon", "smith", "jon@x.com", "5551234"]);
        let b = record(&["john", "smyth", "john@x.org", "5551243"]);

        assert_eq!(scorer.score(&a, &b), scorer.score(&b, &a));
    }

    #[test]
    fn test_explain_matches_score() {
        let scorer = Scorer::new(&DedupeConfig::default());
        let a = record(&["jon", "smith", "jon@x.com", "5551234"]);
        let b = record(&["john", "smith", "john@x.com", "5551234"]);

        let parts = scorer.explain(&a, &b);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[1].ratio, 100.0);
        let sum: f64 = parts.iter().map(|p| p.contribution).sum();
        assert!((sum - scorer.score(&a, &b)).abs() < 1e-9);
    }
}
