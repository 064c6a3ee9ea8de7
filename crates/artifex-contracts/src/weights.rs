//! The net-score weight table.
//!
//! Weights live in one explicit, injectable structure so the net-score
//! formula is auditable and testable in isolation — calculators return raw
//! unweighted scores and never see these numbers.

use serde::{Deserialize, Serialize};

use crate::{
    error::{ArtifexError, ArtifexResult},
    metric::{MetricKind, MetricResult},
};

/// Per-metric weights used to combine raw scores into a net score.
///
/// `Default` carries the canonical table; a deployment may override
/// individual entries via TOML, but `validate()` insists the result still
/// sums to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub license: f64,
    pub code_quality: f64,
    pub dataset_quality: f64,
    pub reproducibility: f64,
    pub ramp_up: f64,
    pub bus_factor: f64,
    pub reviewedness: f64,
    pub dataset_and_code: f64,
    pub size: f64,
    pub performance_claims: f64,
    pub tree_score: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            license: 0.15,
            code_quality: 0.11,
            dataset_quality: 0.11,
            reproducibility: 0.10,
            ramp_up: 0.09,
            bus_factor: 0.09,
            reviewedness: 0.09,
            dataset_and_code: 0.09,
            size: 0.07,
            performance_claims: 0.07,
            tree_score: 0.03,
        }
    }
}

impl WeightTable {
    /// The weight assigned to one metric kind.
    pub fn weight_for(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::License => self.license,
            MetricKind::CodeQuality => self.code_quality,
            MetricKind::DatasetQuality => self.dataset_quality,
            MetricKind::Reproducibility => self.reproducibility,
            MetricKind::RampUp => self.ramp_up,
            MetricKind::BusFactor => self.bus_factor,
            MetricKind::Reviewedness => self.reviewedness,
            MetricKind::DatasetAndCode => self.dataset_and_code,
            MetricKind::Size => self.size,
            MetricKind::PerformanceClaims => self.performance_claims,
            MetricKind::TreeScore => self.tree_score,
        }
    }

    /// Check that every weight is in [0, 1] and the table sums to 1.0.
    pub fn validate(&self) -> ArtifexResult<()> {
        let mut sum = 0.0;
        for kind in MetricKind::ALL {
            let w = self.weight_for(kind);
            if !(0.0..=1.0).contains(&w) {
                return Err(ArtifexError::ConfigError {
                    reason: format!(
                        "weight for '{}' is {} — must be within [0.0, 1.0]",
                        kind, w
                    ),
                });
            }
            sum += w;
        }
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ArtifexError::ConfigError {
                reason: format!("metric weights sum to {} — must sum to 1.0", sum),
            });
        }
        Ok(())
    }

    /// Compute the net score for a set of stored metric results.
    ///
    /// Pure function of the results and this table: recomputing from the
    /// same stored rows always yields the identical value. Rounded to two
    /// decimals.
    pub fn net_score(&self, results: &[MetricResult]) -> f64 {
        let raw: f64 = results
            .iter()
            .map(|r| self.weight_for(r.kind) * r.score)
            .sum();
        round2(raw)
    }
}

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
