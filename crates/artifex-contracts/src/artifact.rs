//! Artifact identity and record types.
//!
//! An `Artifact` is the persisted unit of evaluation: a model, dataset, or
//! code bundle registered under a `(name, version)` pair that is unique
//! across the store. Records are immutable after creation except for the
//! sensitivity flag and its attached access policy.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a registered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId(pub Uuid);

impl ArtifactId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of thing the artifact is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Model,
    Dataset,
    Code,
}

/// An uploader-supplied access-control script attached to a sensitive
/// artifact.
///
/// The source is opaque to the evaluation core — it is executed by the
/// sandbox, never parsed or interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Opaque script source text.
    pub source: String,
}

/// A registered artifact under evaluation.
///
/// Created atomically with its initial `MetricResult`s at ingestion time.
/// There is no metric re-run for an existing record — new measurements
/// require a new version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,

    /// Artifact name; unique together with `version`.
    pub name: String,

    /// Artifact version; unique together with `name`.
    pub version: String,

    pub kind: ArtifactKind,

    /// Declared license, free text or SPDX-like. May be empty.
    pub license: String,

    pub size_bytes: u64,

    /// When true, every download is gated by the policy sandbox.
    pub is_sensitive: bool,

    /// The access-control script for sensitive artifacts, if one was
    /// supplied. A sensitive artifact without a policy fails closed.
    pub access_policy: Option<AccessPolicy>,

    /// Where the archive lives in object storage, once the upload layer
    /// has stored it. The evaluation core reads this for presigning but
    /// never writes objects itself.
    pub storage_location: Option<String>,

    /// The uploading user, as an opaque reference owned by the auth layer.
    pub uploader: String,

    pub created_at: DateTime<Utc>,
}
