//! Name-confusion audit records.
//!
//! `ConfusionFlag`s are append-only: created once by the detector, read by
//! reviewers, never mutated. Detection never blocks ingestion.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactId;

/// How alarming a name-similarity finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Close to another registered artifact name.
    Medium,
    /// Close to a well-known ecosystem package name — likely typosquatting.
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Medium => f.write_str("medium"),
            Severity::High => f.write_str("high"),
        }
    }
}

/// One append-only audit record produced by the confusion detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfusionFlag {
    /// The flagged artifact, once it has been persisted. Detection can run
    /// against a name alone (pre-ingestion audit), in which case this is
    /// `None` until the registry stamps it.
    pub artifact_id: Option<ArtifactId>,

    /// The submitted name that triggered the flag.
    pub artifact_name: String,

    /// What the name resembles, e.g. "possible typosquatting of 'tensorflow'".
    pub suspicious_pattern: String,

    pub severity: Severity,

    pub detected_at: DateTime<Utc>,
}

impl ConfusionFlag {
    pub fn new(
        artifact_name: impl Into<String>,
        suspicious_pattern: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            artifact_id: None,
            artifact_name: artifact_name.into(),
            suspicious_pattern: suspicious_pattern.into(),
            severity,
            detected_at: Utc::now(),
        }
    }

    /// Attach the persisted artifact id to this flag.
    pub fn with_artifact_id(mut self, id: ArtifactId) -> Self {
        self.artifact_id = Some(id);
        self
    }
}
