//! Analyzer configuration.
//!
//! Loaded from YAML (same shape as an `assumptions.yaml`); every field has a
//! default so a partial file is accepted. Configuration tunes how the engines
//! run, never what a request means: it does not fill in missing request fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{Result, VentureError};

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Seed for the orchestrator's random source.
    pub seed: u64,
    /// Trial count at or above which Monte Carlo runs on the rayon pool.
    pub parallel_threshold: usize,
    /// Trials per independent random stream in parallel runs.
    pub chunk_size: usize,
    /// Largest `montecarlo_trials` a request may ask for.
    pub max_trials: usize,
    /// Allowed deviation of JV ownership fractions from a sum of 1.
    pub ownership_tolerance: f64,
    /// Display currency label.
    pub currency: String,
    /// Display amount unit label.
    pub unit: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            parallel_threshold: 2_000,
            chunk_size: 1_000,
            max_trials: 1_000_000,
            ownership_tolerance: 1e-9,
            currency: "CNY".to_string(),
            unit: "thousand".to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            VentureError::invalid_config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(VentureError::invalid_config("chunk_size must be at least 1"));
        }
        if self.max_trials == 0 {
            return Err(VentureError::invalid_config("max_trials must be at least 1"));
        }
        if !(self.ownership_tolerance.is_finite() && self.ownership_tolerance > 0.0) {
            return Err(VentureError::invalid_config(
                "ownership_tolerance must be a positive number",
            ));
        }
        Ok(())
    }
}
