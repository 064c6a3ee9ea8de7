//! Metric kinds and per-metric results.
//!
//! Metric kinds are a closed enum rather than an open class hierarchy, so
//! results can be stored and queried uniformly and the orchestrator can
//! iterate the full set without dynamic discovery.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of metric kinds ARTIFEX computes.
///
/// Every kind except `TreeScore` is backed by a calculator over the fetched
/// metadata snapshot. `TreeScore` is derived from persisted lineage by the
/// resolver and folded into the result set by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    License,
    Size,
    RampUp,
    BusFactor,
    PerformanceClaims,
    DatasetAndCode,
    DatasetQuality,
    CodeQuality,
    Reproducibility,
    Reviewedness,
    TreeScore,
}

impl MetricKind {
    /// Every metric kind, in weight-table order.
    pub const ALL: [MetricKind; 11] = [
        MetricKind::License,
        MetricKind::CodeQuality,
        MetricKind::DatasetQuality,
        MetricKind::Reproducibility,
        MetricKind::RampUp,
        MetricKind::BusFactor,
        MetricKind::Reviewedness,
        MetricKind::DatasetAndCode,
        MetricKind::Size,
        MetricKind::PerformanceClaims,
        MetricKind::TreeScore,
    ];

    /// Human-readable name used in rejection reports and logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            MetricKind::License => "License",
            MetricKind::Size => "Size",
            MetricKind::RampUp => "Ramp Up",
            MetricKind::BusFactor => "Bus Factor",
            MetricKind::PerformanceClaims => "Performance Claims",
            MetricKind::DatasetAndCode => "Dataset And Code",
            MetricKind::DatasetQuality => "Dataset Quality",
            MetricKind::CodeQuality => "Code Quality",
            MetricKind::Reproducibility => "Reproducibility",
            MetricKind::Reviewedness => "Reviewedness",
            MetricKind::TreeScore => "Tree Score",
        }
    }

    /// Whether this kind participates in the admission gate.
    ///
    /// `TreeScore` does not gate: it is derived from lineage, not a
    /// calculator signal, and a root artifact's neutral default must not be
    /// able to block its own ingestion.
    pub fn gates_admission(&self) -> bool {
        !matches!(self, MetricKind::TreeScore)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One stored measurement: one artifact, one metric kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricResult {
    pub kind: MetricKind,

    /// Raw unweighted score, clamped to [0.0, 1.0].
    pub score: f64,

    /// Wall-clock time the calculator took, in milliseconds.
    pub latency_ms: u64,

    pub computed_at: DateTime<Utc>,

    /// Set when the calculator errored, panicked, or timed out — the score
    /// is then 0.0 and this explains why.
    pub failure: Option<String>,
}

impl MetricResult {
    /// A successful measurement. The score is clamped on the way in.
    pub fn ok(kind: MetricKind, score: f64, latency_ms: u64) -> Self {
        Self {
            kind,
            score: clamp_score(score),
            latency_ms,
            computed_at: Utc::now(),
            failure: None,
        }
    }

    /// A failed measurement: score 0.0 with a recorded reason.
    pub fn failed(kind: MetricKind, latency_ms: u64, reason: impl Into<String>) -> Self {
        Self {
            kind,
            score: 0.0,
            latency_ms,
            computed_at: Utc::now(),
            failure: Some(reason.into()),
        }
    }
}

/// Clamp a raw calculator score into [0.0, 1.0].
///
/// NaN maps to 0.0 so a buggy calculator can never poison the net score.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}
