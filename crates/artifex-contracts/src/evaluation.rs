//! Evaluation outcomes: the admitted result and the itemized rejection.
//!
//! Callers pattern-match on `AdmissionOutcome` to decide what to persist or
//! surface. A rejection always itemizes the failing metrics by display name
//! — the boolean alone is never enough for an uploader-facing message.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metric::{MetricKind, MetricResult};

/// The full scoring outcome for one metadata snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub name: String,
    pub version: String,

    /// One entry per metric kind, including the derived tree score.
    pub metrics: Vec<MetricResult>,

    /// Weighted combination of all metric scores, rounded to two decimals.
    pub net_score: f64,

    /// True when every gating metric cleared the admission threshold.
    pub admitted: bool,
}

impl EvaluationResult {
    /// Look up the result for one metric kind, if present.
    pub fn metric(&self, kind: MetricKind) -> Option<&MetricResult> {
        self.metrics.iter().find(|m| m.kind == kind)
    }
}

/// One gating metric that scored below the admission threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedMetric {
    pub kind: MetricKind,
    pub score: f64,
    pub threshold: f64,
}

impl fmt::Display for FailedMetric {
    /// Renders as e.g. `Bus Factor (0.30 < 0.50)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.2} < {:.2})",
            self.kind.display_name(),
            self.score,
            self.threshold
        )
    }
}

/// Why an ingestion was rejected, itemized for the uploader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionReport {
    pub name: String,
    pub version: String,

    /// Failing metrics; empty for non-threshold rejections (duplicates).
    pub failures: Vec<FailedMetric>,

    /// Human-readable summary covering every failure.
    pub message: String,
}

impl RejectionReport {
    /// Build a threshold rejection itemizing each failing metric.
    pub fn threshold_not_met(
        name: impl Into<String>,
        version: impl Into<String>,
        failures: Vec<FailedMetric>,
    ) -> Self {
        let itemized = failures
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            name: name.into(),
            version: version.into(),
            message: format!("ingestion rejected, metrics below threshold: {}", itemized),
            failures,
        }
    }

    /// Build a duplicate-submission rejection.
    pub fn duplicate(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        let version = version.into();
        let message = format!(
            "artifact '{}@{}' already exists; duplicate submissions are rejected",
            name, version
        );
        Self {
            name,
            version,
            failures: Vec::new(),
            message,
        }
    }
}

/// What the registry returns from `evaluate_and_admit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AdmissionOutcome {
    /// Every gating metric cleared the threshold; the artifact was
    /// persisted together with its metric results and lineage edges.
    Admitted(EvaluationResult),

    /// Ingestion was refused; nothing was persisted.
    Rejected(RejectionReport),
}

impl AdmissionOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionOutcome::Admitted(_))
    }
}
