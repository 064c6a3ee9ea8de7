//! Evaluation configuration, loadable from TOML.
//!
//! Defaults equal the canonical constants; a deployment overrides only
//! what it needs:
//!
//! ```toml
//! admission_threshold = 0.5
//! calculator_timeout_ms = 30000
//! lineage_max_depth = 5
//! sandbox_timeout_ms = 5000
//! sandbox_interpreter = "/bin/sh"
//!
//! [weights]
//! license = 0.15
//! tree_score = 0.03
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use artifex_contracts::{
    error::{ArtifexError, ArtifexResult},
    weights::WeightTable,
};

/// Tunables for the whole evaluation core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Minimum score every gating metric must reach for admission.
    pub admission_threshold: f64,

    /// Per-calculator deadline; a calculator that misses it scores 0.0.
    pub calculator_timeout_ms: u64,

    /// Maximum lineage traversal depth, independent of cycle detection.
    pub lineage_max_depth: usize,

    /// Hard wall-clock limit on one policy-sandbox run.
    pub sandbox_timeout_ms: u64,

    /// Interpreter the sandbox hands policy scripts to.
    pub sandbox_interpreter: String,

    /// Per-metric net-score weights. Must sum to 1.0.
    pub weights: WeightTable,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            admission_threshold: 0.5,
            calculator_timeout_ms: 30_000,
            lineage_max_depth: 5,
            sandbox_timeout_ms: 5_000,
            sandbox_interpreter: "/bin/sh".to_string(),
            weights: WeightTable::default(),
        }
    }
}

impl EvaluationConfig {
    /// Parse `s` as TOML and validate the result.
    pub fn from_toml_str(s: &str) -> ArtifexResult<Self> {
        let config: EvaluationConfig =
            toml::from_str(s).map_err(|e| ArtifexError::ConfigError {
                reason: format!("failed to parse evaluation config TOML: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> ArtifexResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ArtifexError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check invariants: threshold in [0, 1], non-zero timeouts and depth,
    /// weight table sums to 1.0.
    pub fn validate(&self) -> ArtifexResult<()> {
        if !(0.0..=1.0).contains(&self.admission_threshold) {
            return Err(ArtifexError::ConfigError {
                reason: format!(
                    "admission_threshold is {} — must be within [0.0, 1.0]",
                    self.admission_threshold
                ),
            });
        }
        if self.calculator_timeout_ms == 0 {
            return Err(ArtifexError::ConfigError {
                reason: "calculator_timeout_ms must be non-zero".to_string(),
            });
        }
        if self.sandbox_timeout_ms == 0 {
            return Err(ArtifexError::ConfigError {
                reason: "sandbox_timeout_ms must be non-zero".to_string(),
            });
        }
        if self.lineage_max_depth == 0 {
            return Err(ArtifexError::ConfigError {
                reason: "lineage_max_depth must be non-zero".to_string(),
            });
        }
        self.weights.validate()
    }
}
