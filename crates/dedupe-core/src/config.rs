//! Matching configuration: threshold, compared fields and their weights

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Default similarity cutoff; a pair must score strictly above it
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Default name of the externally supplied identifier column
pub const DEFAULT_RECORD_ID_COLUMN: &str = "Record ID";

/// Tolerance when checking that weights sum to 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// A compared field and its weight in the aggregate score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldWeight {
    /// Column name in the input table
    pub name: String,
    /// Weight in [0, 1]; all weights sum to 1.0
    pub weight: f64,
}

impl FieldWeight {
    /// Pair a column name with its weight; checked later by `DedupeConfig::validate`
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupeConfig {
    /// Similarity cutoff in [0, 1]
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Compared fields in blocking-key order, with their weights
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldWeight>,
    /// Column holding the external record identifier
    #[serde(default = "default_record_id_column")]
    pub record_id_column: String,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_fields() -> Vec<FieldWeight> {
    vec![
        FieldWeight::new("First Name", 0.20),
        FieldWeight::new("Last Name", 0.20),
        FieldWeight::new("Email", 0.35),
        FieldWeight::new("Phone Number", 0.25),
    ]
}

fn default_record_id_column() -> String {
    DEFAULT_RECORD_ID_COLUMN.to_string()
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            fields: default_fields(),
            record_id_column: default_record_id_column(),
        }
    }
}

impl DedupeConfig {
    /// Default configuration with a different threshold
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Names of the compared fields, in order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Reject configurations the engine must not run with
    ///
    /// Weights are never renormalized; a sum other than 1.0 is an error.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidThreshold(self.threshold));
        }

        if self.fields.is_empty() {
            return Err(Error::NoFields);
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::DuplicateField(field.name.clone()));
            }
            if !field.weight.is_finite() || field.weight < 0.0 {
                return Err(Error::InvalidWeights(format!(
                    "weight for '{}' is {}",
                    field.name, field.weight
                )));
            }
        }

        let sum: f64 = self.fields.iter().map(|f| f.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidWeights(format!(
                "weights sum to {}, expected 1.0",
                sum
            )));
        }

        Ok(())
    }

    /// Load a configuration from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the configuration to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DedupeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.field_names(),
            vec!["First Name", "Last Name", "Email", "Phone Number"]
        );
    }

    #[test]
    fn test_threshold_out_of_range() {
        for t in [-0.1, 1.5, f64::NAN] {
            let err = DedupeConfig::with_threshold(t).validate().unwrap_err();
            assert!(matches!(err, Error::InvalidThreshold(_)));
        }
        assert!(DedupeConfig::with_threshold(0.0).validate().is_ok());
        assert!(DedupeConfig::with_threshold(1.0).validate().is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = DedupeConfig::default();
        config.fields[0].weight = 0.5;
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidWeights(_)
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = DedupeConfig {
            fields: vec![FieldWeight::new("A", 1.5), FieldWeight::new("B", -0.5)],
            ..DedupeConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidWeights(_)
        ));
    }

    #[test]
    fn test_duplicate_and_empty_fields() {
        let dup = DedupeConfig {
            fields: vec![FieldWeight::new("A", 0.5), FieldWeight::new("A", 0.5)],
            ..DedupeConfig::default()
        };
        assert!(matches!(dup.validate().unwrap_err(), Error::DuplicateField(_)));

        let empty = DedupeConfig {
            fields: Vec::new(),
            ..DedupeConfig::default()
        };
        assert!(matches!(empty.validate().unwrap_err(), Error::NoFields));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DedupeConfig = serde_json::from_str(r#"{"threshold": 0.8}"#).unwrap();
        assert_eq!(config.threshold, 0.8);
        assert_eq!(config.fields.len(), 4);
        assert_eq!(config.record_id_column, "Record ID");
    }
}
