//! Engine configuration
//!
//! All thresholds have defaults; a JSON file only needs the keys it overrides:
//!
//! ```json
//! { "account_type": "business", "limits": { "max_deductions": 2000000 } }
//! ```

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::path::Path;
use taxdoc_types::AccountType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Filer type of the session; decides the low-confidence fallback category
    pub account_type: AccountType,
    pub classifier: ClassifierConfig,
    pub limits: ValidationLimits,
    pub detector: DetectorConfig,
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject limits that would make the validator null everything
    pub fn check(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;
        if limits.min_income < 0.0 || limits.min_income >= limits.max_income {
            return Err(ConfigError::Invalid(format!(
                "income range [{}, {}] is empty",
                limits.min_income, limits.max_income
            )));
        }
        if !(0.0..=1.0).contains(&limits.max_withholding_rate) {
            return Err(ConfigError::Invalid(format!(
                "max_withholding_rate {} must be within [0, 1]",
                limits.max_withholding_rate
            )));
        }
        if self.classifier.max_confidence > 100
            || self.classifier.base_confidence > self.classifier.max_confidence
        {
            return Err(ConfigError::Invalid(
                "classifier confidences must satisfy base <= max <= 100".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Scores below this fall back to the account default
    pub min_score: u32,
    pub base_confidence: u8,
    pub max_confidence: u8,
    /// Runner-up within this many points marks the result ambiguous
    pub ambiguity_margin: u32,
    pub ambiguity_penalty: u8,
    /// Confidence below this is reported as low confidence
    pub low_confidence_below: u8,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_score: 5,
            base_confidence: 30,
            max_confidence: 95,
            ambiguity_margin: 5,
            ambiguity_penalty: 15,
            low_confidence_below: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub min_income: f64,
    pub max_income: f64,
    pub max_deductions: f64,
    /// Deductions may exceed income by this much before being flagged
    pub deduction_income_margin: f64,
    pub max_tax_owed: f64,
    /// Withheld / income above this is flagged
    pub max_withholding_rate: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_income: 100.0,
            max_income: 50_000_000.0,
            max_deductions: 1_000_000.0,
            deduction_income_margin: 1_000.0,
            max_tax_owed: 20_000_000.0,
            max_withholding_rate: 0.5,
        }
    }
}

/// Bytes before an amount searched for an attributing keyword
pub const DEFAULT_KEYWORD_WINDOW: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Calendar year the analysis runs in
    pub reference_year: i32,
    /// Tax years older than `reference_year - stale_after_years` are stale
    pub stale_after_years: i32,
    pub unusual_amount: f64,
    pub large_deduction: f64,
    /// Bytes before an amount searched for an attributing keyword
    pub keyword_window: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            reference_year: chrono::Utc::now().year(),
            stale_after_years: 3,
            unusual_amount: 1_000_000.0,
            large_deduction: 50_000.0,
            keyword_window: DEFAULT_KEYWORD_WINDOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_json_is_default() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config.limits, ValidationLimits::default());
        assert_eq!(config.classifier, ClassifierConfig::default());
        assert_eq!(config.account_type, AccountType::Individual);
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json(
            r#"{"account_type": "business", "limits": {"max_deductions": 2000000}, "detector": {"reference_year": 2024}}"#,
        )
        .unwrap();
        assert_eq!(config.account_type, AccountType::Business);
        assert_eq!(config.limits.max_deductions, 2_000_000.0);
        assert_eq!(config.limits.min_income, 100.0);
        assert_eq!(config.detector.reference_year, 2024);
        assert_eq!(config.detector.keyword_window, 100);
    }

    #[test]
    fn test_rejects_empty_income_range() {
        let err = EngineConfig::from_json(r#"{"limits": {"min_income": 1000, "max_income": 10}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            EngineConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
