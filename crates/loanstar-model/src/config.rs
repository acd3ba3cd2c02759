//! Pipeline configuration.
//!
//! Every threshold, column list, and path the pipeline reads lives here and
//! is passed explicitly to each entry point. The structs deserialize from
//! partial documents; absent fields fall back to the defaults below.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Columns with a larger missing percentage are dropped in the first filter stage.
pub const DEFAULT_MAX_MISSING_PERCENT: f64 = 30.0;

/// Columns with more missing cells are dropped in the second filter stage.
pub const DEFAULT_MAX_MISSING_COUNT: usize = 26;

pub const DEFAULT_DIMENSIONS: &[&str] = &["home_ownership", "loan_status", "issue_d"];

pub const DEFAULT_FACT_COLUMNS: &[&str] = &[
    "application_type",
    "loan_amnt",
    "funded_amnt",
    "term",
    "int_rate",
    "installment",
    "home_ownership_id",
    "loan_status_id",
    "issue_d_id",
];

pub const DEFAULT_FACT_TABLE: &str = "loans_fact";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input: InputConfig,
    pub quality: QualityConfig,
    pub star: StarConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
    pub delimiter: char,
    pub has_headers: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            delimiter: ',',
            has_headers: true,
        }
    }
}

impl InputConfig {
    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(ConfigError::InvalidDelimiter {
                delimiter: self.delimiter,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Percentage (0–100) of missing cells a column may have and survive.
    pub max_missing_percent: f64,
    /// Absolute number of missing cells a column may have and survive.
    pub max_missing_count: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            max_missing_percent: DEFAULT_MAX_MISSING_PERCENT,
            max_missing_count: DEFAULT_MAX_MISSING_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    /// Columns turned into dimension tables, in load order.
    pub dimensions: Vec<String>,
    /// Fact table columns, in output order. `<dimension>_id` entries are
    /// resolved through the matching dimension.
    pub fact_columns: Vec<String>,
    pub fact_table: String,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS.iter().map(ToString::to_string).collect(),
            fact_columns: DEFAULT_FACT_COLUMNS
                .iter()
                .map(ToString::to_string)
                .collect(),
            fact_table: DEFAULT_FACT_TABLE.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input.path = path.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.input.delimiter_byte()?;
        let percent = self.quality.max_missing_percent;
        if !(0.0..=100.0).contains(&percent) {
            return Err(ConfigError::InvalidThreshold { value: percent });
        }
        let mut seen = BTreeSet::new();
        for name in &self.star.dimensions {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateDimension { name: name.clone() });
            }
        }
        if self.star.fact_columns.is_empty() {
            return Err(ConfigError::EmptyFactColumns);
        }
        let mut seen = BTreeSet::new();
        for name in &self.star.fact_columns {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateFactColumn { name: name.clone() });
            }
        }
        if self.star.fact_table.trim().is_empty() {
            return Err(ConfigError::EmptyFactTable);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_loan_schema() {
        let config = PipelineConfig::default();
        assert_eq!(config.quality.max_missing_percent, 30.0);
        assert_eq!(config.quality.max_missing_count, 26);
        assert_eq!(config.star.dimensions.len(), 3);
        assert_eq!(config.star.fact_columns.last().map(String::as_str), Some("issue_d_id"));
        assert_eq!(config.star.fact_table, "loans_fact");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_threshold() {
        let mut config = PipelineConfig::default();
        config.quality.max_missing_percent = 130.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { value: 130.0 })
        );
        config.quality.max_missing_percent = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_dimensions() {
        let mut config = PipelineConfig::default();
        config.star.dimensions.push("loan_status".to_string());
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateDimension {
                name: "loan_status".to_string()
            })
        );
    }

    #[test]
    fn validate_rejects_duplicate_fact_columns() {
        let mut config = PipelineConfig::default();
        config.star.fact_columns.push("loan_amnt".to_string());
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateFactColumn {
                name: "loan_amnt".to_string()
            })
        );
    }

    #[test]
    fn delimiter_must_be_ascii() {
        let mut input = InputConfig::default();
        assert_eq!(input.delimiter_byte(), Ok(b','));
        input.delimiter = '\t';
        assert_eq!(input.delimiter_byte(), Ok(b'\t'));
        input.delimiter = '§';
        assert!(input.delimiter_byte().is_err());
    }
}
