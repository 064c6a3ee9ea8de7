//! Core trait definitions for the ARTIFEX evaluation pipeline.
//!
//! These traits draw the trust boundary of the core:
//!
//! - `MetricCalculator`   — pure scoring logic over a fetched snapshot
//! - `MetadataFetcher`    — external I/O collaborator (may fail or hang)
//! - `ArtifactStore`      — persistence collaborator (CRUD, atomic ingest)
//! - `ObjectStore`        — archive storage collaborator (put/presign)
//! - `LineageScorer`      — cycle-safe tree-score resolution
//! - `LicenseChecker`     — license compatibility classification
//! - `ConfusionAuditor`   — name-confusion detection (audit only)
//! - `DownloadAuthorizer` — sandboxed access-policy execution
//!
//! The orchestrator and registry wire them together. Calculator failures
//! are isolated by the orchestrator; a calculator can never abort its
//! siblings or escape to the caller.

use artifex_contracts::{
    artifact::{AccessPolicy, Artifact, ArtifactId},
    confusion::ConfusionFlag,
    error::ArtifexResult,
    license::CompatibilityVerdict,
    lineage::LineageEdge,
    metadata::ArtifactMetadata,
    metric::{MetricKind, MetricResult},
    sandbox::{AccessDecision, SandboxRequest},
    weights::WeightTable,
};

/// One metric: a pure function over the metadata snapshot.
///
/// Implementations must not perform I/O — all fetching happens before the
/// snapshot is built, so calculators are deterministic and unit-testable
/// given fixed input. Missing signal (no README, no contributors) must
/// yield a low-but-defined score, never an error escape.
pub trait MetricCalculator: Send + Sync {
    /// The kind this calculator produces. One calculator per kind.
    fn kind(&self) -> MetricKind;

    /// Compute the raw unweighted score for the snapshot.
    ///
    /// The orchestrator clamps the returned value to [0.0, 1.0] and
    /// measures latency around this call. An `Err` is isolated into a
    /// 0.0-score result with a recorded reason.
    fn compute(&self, metadata: &ArtifactMetadata) -> ArtifexResult<f64>;
}

/// The external metadata fetch collaborator.
///
/// May fail or time out. The registry treats failure as "metadata
/// unavailable" and substitutes a degraded snapshot — a fetch error is
/// never propagated to the uploader as an ingestion error.
pub trait MetadataFetcher: Send + Sync {
    fn fetch(&self, source_url: &str) -> ArtifexResult<ArtifactMetadata>;
}

/// The persistence collaborator.
///
/// The core depends on read/write access but does not own schema
/// definition. Lineage edges and confusion flags are append-only;
/// artifacts and metric results are immutable once ingested.
pub trait ArtifactStore: Send + Sync {
    /// Persist an artifact together with its metric results and lineage
    /// edges as one atomic operation.
    ///
    /// Returns `ArtifexError::DuplicateArtifact` when the `(name, version)`
    /// pair already exists; nothing is written in that case.
    fn ingest(
        &self,
        artifact: &Artifact,
        metrics: &[MetricResult],
        edges: &[LineageEdge],
    ) -> ArtifexResult<()>;

    fn get_artifact(&self, id: ArtifactId) -> ArtifexResult<Option<Artifact>>;

    fn find_artifact(&self, name: &str, version: &str) -> ArtifexResult<Option<Artifact>>;

    /// All stored metric results for one artifact.
    fn metrics_for(&self, id: ArtifactId) -> ArtifexResult<Vec<MetricResult>>;

    /// Direct parents of `id` via lineage edges. May contain duplicates,
    /// self-references, or members of cycles — callers must not assume a
    /// well-formed DAG.
    fn parents_of(&self, id: ArtifactId) -> ArtifexResult<Vec<ArtifactId>>;

    /// Every distinct artifact name in the store.
    fn artifact_names(&self) -> ArtifexResult<Vec<String>>;

    /// Append one confusion flag. Flags are never updated or deleted.
    fn append_flag(&self, flag: ConfusionFlag) -> ArtifexResult<()>;

    /// All flags recorded against an artifact name.
    fn flags_for(&self, artifact_name: &str) -> ArtifexResult<Vec<ConfusionFlag>>;
}

/// The archive storage collaborator.
///
/// Used only after admission succeeds; the evaluation core never uploads
/// directly and never constructs URLs itself.
pub trait ObjectStore: Send + Sync {
    fn put(&self, bytes: &[u8]) -> ArtifexResult<String>;

    fn presign(&self, location: &str, ttl_secs: u64) -> ArtifexResult<String>;
}

/// Cycle-safe lineage aggregation.
///
/// Implementations must terminate on any edge relation, including cycles
/// and self-loops, and must return the neutral 0.5 default when no
/// ancestor is reachable.
pub trait LineageScorer: Send + Sync {
    fn tree_score(
        &self,
        store: &dyn ArtifactStore,
        weights: &WeightTable,
        id: ArtifactId,
    ) -> ArtifexResult<f64>;
}

/// License compatibility classification.
///
/// Infallible by design: unresolvable input produces an incompatible
/// verdict with an explanation, never an error (ambiguity is never
/// silently treated as permission).
pub trait LicenseChecker: Send + Sync {
    fn check(&self, model_license: &str, code_license: &str) -> CompatibilityVerdict;
}

/// Name-confusion detection. Audit only — never blocks ingestion.
pub trait ConfusionAuditor: Send + Sync {
    /// Compare `new_name` against existing artifact names (the popular
    /// ecosystem list is the implementation's own).
    fn audit(&self, new_name: &str, existing_names: &[String]) -> Vec<ConfusionFlag>;
}

/// Sandboxed execution of an uploader-supplied access policy.
///
/// Implementations must fail closed: any outcome other than a clean
/// zero exit maps to `approved == false`.
pub trait DownloadAuthorizer: Send + Sync {
    fn authorize(&self, policy: &AccessPolicy, request: &SandboxRequest) -> AccessDecision;
}
