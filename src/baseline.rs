//! Reference exchange rates used as the zero point for devaluation.
//!
//! The table has two maps: ISO country code → currency code, and currency
//! code → baseline rate against USD. Both are loaded from JSON so the figures
//! can be changed without a rebuild:
//!
//! ```json
//! {
//!   "currencies": { "AR": "ARS", "TR": "TRY" },
//!   "baselines":  { "ARS": 350, "TRY": 19 }
//! }
//! ```

use crate::error::{AppError, AppResult};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Table shipped with the service, used when no file is configured
const DEFAULT_BASELINE_RATES: &str = include_str!("../config/baseline_rates.json");

#[derive(Debug, Deserialize)]
struct RawBaselineTable {
    currencies: HashMap<String, String>,
    baselines: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaselineTable {
    currencies: HashMap<String, String>,
    baselines: HashMap<String, Decimal>,
}

impl BaselineTable {
    /// Build a table from already-validated maps
    pub fn new(currencies: HashMap<String, String>, baselines: HashMap<String, Decimal>) -> Self {
        Self {
            currencies: currencies
                .into_iter()
                .map(|(country, currency)| (country.to_uppercase(), currency.to_uppercase()))
                .collect(),
            baselines: baselines
                .into_iter()
                .map(|(currency, rate)| (currency.to_uppercase(), rate))
                .collect(),
        }
    }

    /// The built-in table
    pub fn builtin() -> AppResult<Self> {
        Self::from_json(DEFAULT_BASELINE_RATES)
    }

    /// Load from `path`, or fall back to the built-in table
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AppError::Config(format!(
                        "Cannot read baseline rates from {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Self::from_json(&raw)
            }
            None => Self::builtin(),
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let parsed: RawBaselineTable = serde_json::from_str(raw)
            .map_err(|e| AppError::Config(format!("Invalid baseline rates document: {}", e)))?;

        if parsed.currencies.is_empty() {
            return Err(AppError::Config("Baseline currency mapping is empty".into()));
        }
        if parsed.baselines.is_empty() {
            return Err(AppError::Config("Baseline rate table is empty".into()));
        }

        let mut baselines = HashMap::with_capacity(parsed.baselines.len());
        for (currency, rate) in parsed.baselines {
            let decimal = Decimal::from_f64(rate)
                .filter(|d| rate.is_finite() && *d > Decimal::ZERO)
                .ok_or_else(|| {
                    AppError::Config(format!("Baseline rate for {} must be positive", currency))
                })?;
            baselines.insert(currency, decimal);
        }

        Ok(Self::new(parsed.currencies, baselines))
    }

    /// Currency code mapped to an ISO country code
    pub fn currency_for(&self, country_code: &str) -> Option<&str> {
        self.currencies
            .get(&country_code.to_uppercase())
            .map(String::as_str)
    }

    /// Baseline rate for a currency code
    pub fn baseline_for(&self, currency: &str) -> Option<Decimal> {
        self.baselines.get(&currency.to_uppercase()).copied()
    }

    pub fn country_count(&self) -> usize {
        self.currencies.len()
    }

    pub fn currency_count(&self) -> usize {
        self.baselines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_loads() {
        let table = BaselineTable::builtin().unwrap();
        assert_eq!(table.country_count(), 38);
        assert_eq!(table.currency_count(), 38);
        assert_eq!(table.currency_for("AR"), Some("ARS"));
        assert_eq!(table.baseline_for("ARS"), Some(Decimal::new(350, 0)));
        assert_eq!(table.baseline_for("MYR"), Some(Decimal::new(44, 1)));
        assert_eq!(table.baseline_for("JOD"), Some(Decimal::new(71, 2)));
    }

    #[test]
    fn test_lookups_are_case_insensitive() {
        let table = BaselineTable::from_json(
            r#"{ "currencies": { "tr": "try" }, "baselines": { "Try": 19 } }"#,
        )
        .unwrap();

        assert_eq!(table.currency_for("TR"), Some("TRY"));
        assert_eq!(table.baseline_for("try"), Some(Decimal::new(19, 0)));
        assert_eq!(table.currency_for("XX"), None);
    }

    #[test]
    fn test_rejects_non_positive_baseline() {
        let err = BaselineTable::from_json(
            r#"{ "currencies": { "AR": "ARS" }, "baselines": { "ARS": 0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_document() {
        assert!(BaselineTable::from_json("{ \"currencies\": [] }").is_err());
        assert!(BaselineTable::from_json(
            r#"{ "currencies": {}, "baselines": { "ARS": 350 } }"#
        )
        .is_err());
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = BaselineTable::load(Some(Path::new("/nonexistent/baselines.json"))).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
