//! Error taxonomy for the ARTIFEX evaluation core.
//!
//! All fallible operations return `ArtifexResult<T>`. Only `ThresholdNotMet`
//! and `DuplicateArtifact` are expected, user-facing rejections; every other
//! variant is an operator-facing condition logged with full context.
//!
//! Two conditions from the design deliberately have no variant here:
//! lineage cycles are absorbed by the resolver's visited set and never
//! surface as errors, and sandbox timeouts/crashes surface to callers as a
//! rejected access decision, never as an `Err`.

use thiserror::Error;

/// The unified error type for the ARTIFEX crates.
#[derive(Debug, Error)]
pub enum ArtifexError {
    /// The metadata fetch for a source failed or timed out.
    ///
    /// Not fatal to ingestion: the orchestrator substitutes a degraded
    /// metadata snapshot and lets the calculators score it conservatively.
    #[error("metadata unavailable for '{source_url}': {reason}")]
    MetadataUnavailable { source_url: String, reason: String },

    /// A metric calculator exceeded its per-calculator deadline.
    ///
    /// Converted into a 0.0-score `MetricResult` with a failure reason;
    /// never aborts the other calculators.
    #[error("metric '{metric}' timed out after {timeout_ms}ms")]
    MetricTimeout { metric: String, timeout_ms: u64 },

    /// A metric calculator failed internally.
    ///
    /// Like a timeout, this is isolated: the metric scores 0.0 and the
    /// reason is recorded on the result.
    #[error("metric '{metric}' failed: {reason}")]
    MetricFailed { metric: String, reason: String },

    /// One or more gating metrics scored below the admission threshold.
    ///
    /// The summary itemizes every failing metric by display name with its
    /// score, e.g. "Bus Factor (0.30 < 0.50)".
    #[error("admission threshold not met: {summary}")]
    ThresholdNotMet { summary: String },

    /// An artifact with the same `(name, version)` pair already exists.
    #[error("artifact '{name}@{version}' already exists; duplicate submissions are rejected")]
    DuplicateArtifact { name: String, version: String },

    /// A license string could not be resolved to any known category.
    ///
    /// Compatibility checks fail closed on this condition.
    #[error("license '{license}' could not be resolved to a known category")]
    UnknownLicense { license: String },

    /// An artifact id was not found in the store where one was required.
    #[error("artifact '{id}' not found")]
    ArtifactNotFound { id: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The persistence collaborator failed.
    #[error("store error: {reason}")]
    StoreError { reason: String },
}

/// Convenience alias used throughout the ARTIFEX crates.
pub type ArtifexResult<T> = Result<T, ArtifexError>;
