//! The fetched metadata snapshot that metric calculators consume.
//!
//! All external I/O happens in the `MetadataFetcher` collaborator; by the
//! time a snapshot reaches a calculator it is plain data. A failed fetch
//! becomes `ArtifactMetadata::degraded` — everything empty — so calculators
//! always receive a defined input and score it conservatively. An empty
//! README inside a successful fetch takes exactly the same scoring path as
//! a failed fetch; nothing downstream distinguishes the two.

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactKind;

/// Commit statistics for one contributor, from repository stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorStat {
    pub name: String,
    pub commits: u64,
}

/// Review coverage over the fetched commit history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStats {
    /// Total commits inspected.
    pub total_commits: u64,
    /// Commits that carried a second-reviewer signal.
    pub reviewed_commits: u64,
}

/// A parent artifact declared in fetched metadata ("derived from").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub name: String,
    pub version: String,
}

/// Everything the fetch collaborator learned about one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub name: String,
    pub version: String,
    pub kind: ArtifactKind,

    /// The URL the snapshot was fetched from, when known.
    pub source_url: Option<String>,

    /// Declared license field, if any.
    pub license: Option<String>,

    /// README text, if any.
    pub readme: Option<String>,

    /// Total archive size in bytes. Zero when unknown.
    pub size_bytes: u64,

    /// File manifest (relative paths).
    pub files: Vec<String>,

    pub contributors: Vec<ContributorStat>,

    pub review_stats: Option<ReviewStats>,

    /// Declared training/eval dataset link.
    pub dataset_url: Option<String>,

    /// Declared source-code link.
    pub code_url: Option<String>,

    /// Declared benchmark results ("mmlu: 71.2", ...). Free-form claims.
    pub benchmark_claims: Vec<String>,

    /// Parents this artifact declares it was derived from.
    pub parents: Vec<ParentRef>,

    pub is_sensitive: bool,

    /// Uploader-supplied access-policy script source, for sensitive
    /// artifacts.
    pub access_policy: Option<String>,

    pub uploader: String,
}

impl ArtifactMetadata {
    /// The defined "metadata unavailable" snapshot.
    ///
    /// Every signal is empty or absent. Calculators must score this
    /// conservatively rather than fail.
    pub fn degraded(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            kind: ArtifactKind::Model,
            source_url: None,
            license: None,
            readme: None,
            size_bytes: 0,
            files: Vec::new(),
            contributors: Vec::new(),
            review_stats: None,
            dataset_url: None,
            code_url: None,
            benchmark_claims: Vec::new(),
            parents: Vec::new(),
            is_sensitive: false,
            access_policy: None,
            uploader: String::new(),
        }
    }
}
