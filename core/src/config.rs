use crate::{
    error::{SimError, SimResult},
    simulation::LoanTerms,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path, or ":memory:".
    pub path: String,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "credit_simulation.db".into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Upper bounds accepted at the request boundary.
/// The calculator itself accepts any positive term and non-negative rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationLimits {
    pub max_term_years: u32,
    pub max_annual_rate_percent: Decimal,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self {
            max_term_years: 30,
            max_annual_rate_percent: Decimal::ONE_HUNDRED,
        }
    }
}

impl SimulationLimits {
    pub fn check(&self, terms: &LoanTerms) -> SimResult<()> {
        if terms.term_years > i64::from(self.max_term_years) {
            return Err(SimError::invalid(
                "term_years",
                format!("{} exceeds the maximum of {}", terms.term_years, self.max_term_years),
            ));
        }
        if terms.annual_interest_rate_percent > self.max_annual_rate_percent {
            return Err(SimError::invalid(
                "annual_interest_rate_percent",
                format!(
                    "{} exceeds the maximum of {}",
                    terms.annual_interest_rate_percent, self.max_annual_rate_percent
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub limits: SimulationLimits,
}

impl SimulationConfig {
    /// Load from the data/ directory.
    /// In tests, use SimulationConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/simulation/config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimulationConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::info!(
            "loaded config from {path}: db={} max_term_years={} max_rate={}%",
            config.database.path,
            config.limits.max_term_years,
            config.limits.max_annual_rate_percent
        );
        Ok(config)
    }

    /// In-memory database with default limits.
    pub fn default_test() -> Self {
        Self {
            database: DatabaseConfig {
                path: ":memory:".into(),
                busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            },
            limits: SimulationLimits::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn load_reads_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("simulation")).unwrap();
        std::fs::write(
            dir.path().join("simulation/config.json"),
            r#"{
                "database": { "path": "sims.db" },
                "limits": { "max_term_years": 25, "max_annual_rate_percent": "40" }
            }"#,
        )
        .unwrap();

        let config = SimulationConfig::load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.database.path, "sims.db");
        assert_eq!(config.database.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
        assert_eq!(config.limits.max_term_years, 25);
        assert_eq!(config.limits.max_annual_rate_percent, Decimal::from(40));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SimulationConfig::load(dir.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Cannot read"));
    }

    #[test]
    fn limits_reject_long_terms_and_high_rates() {
        let limits = SimulationLimits::default();
        let ok = LoanTerms::new(Decimal::from(1_000), Decimal::from_str("4.5").unwrap(), 30);
        limits.check(&ok).unwrap();

        let long = LoanTerms { term_years: 31, ..ok.clone() };
        assert!(matches!(
            limits.check(&long),
            Err(SimError::InvalidArgument { field: "term_years", .. })
        ));

        let steep = LoanTerms {
            annual_interest_rate_percent: Decimal::from(101),
            ..ok
        };
        assert!(matches!(
            limits.check(&steep),
            Err(SimError::InvalidArgument { field: "annual_interest_rate_percent", .. })
        ));
    }
}
