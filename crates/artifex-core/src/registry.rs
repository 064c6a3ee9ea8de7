//! The artifact registry facade: the five public operations of the
//! evaluation core, wired over the trait seams.
//!
//! The facade owns the trusted components — store, lineage scorer, license
//! checker, confusion auditor, download authorizer — and enforces the
//! ingestion pipeline ordering:
//!
//!   fetch → duplicate check → tree score → concurrent metrics → gate →
//!   atomic persist → background confusion audit
//!
//! A failed metadata fetch is downgraded to a degraded snapshot, never an
//! ingestion error. The confusion audit runs after successful persistence
//! on a background thread and can never block or fail an ingestion.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use artifex_contracts::{
    artifact::{AccessPolicy, Artifact, ArtifactId},
    confusion::ConfusionFlag,
    error::{ArtifexError, ArtifexResult},
    evaluation::{AdmissionOutcome, RejectionReport},
    license::CompatibilityVerdict,
    lineage::LineageEdge,
    metadata::ArtifactMetadata,
    sandbox::{AccessDecision, SandboxRequest, SandboxState},
    weights::round2,
};

use crate::{
    config::EvaluationConfig,
    orchestrator::{CancelFlag, MetricOrchestrator},
    traits::{
        ArtifactStore, ConfusionAuditor, DownloadAuthorizer, LicenseChecker, LineageScorer,
        MetadataFetcher, MetricCalculator, ObjectStore,
    },
};

/// One ingestion submission, as the API layer hands it over.
///
/// Identity (`name`, `version`, `uploader`) comes from the authenticated
/// request; content signals come from the metadata fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    pub name: String,
    pub version: String,
    pub source_url: String,
    pub uploader: String,
}

/// Outcome of a download-URL request.
#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    /// Access approved; the presigned URL is ready to hand out.
    Granted { url: String, decision: AccessDecision },
    /// Access denied by the policy gate. No URL was minted.
    Denied(AccessDecision),
}

/// Everything the registry needs, as trait objects.
///
/// The store and auditor are `Arc` because the background confusion audit
/// thread holds its own references past the ingestion call.
pub struct RegistryComponents {
    pub fetcher: Box<dyn MetadataFetcher>,
    pub store: Arc<dyn ArtifactStore>,
    pub objects: Box<dyn ObjectStore>,
    pub lineage: Box<dyn LineageScorer>,
    pub license: Box<dyn LicenseChecker>,
    pub confusion: Arc<dyn ConfusionAuditor>,
    pub authorizer: Box<dyn DownloadAuthorizer>,
    pub calculators: Vec<Arc<dyn MetricCalculator>>,
}

/// The registry facade.
pub struct ArtifactRegistry {
    fetcher: Box<dyn MetadataFetcher>,
    store: Arc<dyn ArtifactStore>,
    objects: Box<dyn ObjectStore>,
    lineage: Box<dyn LineageScorer>,
    license: Box<dyn LicenseChecker>,
    confusion: Arc<dyn ConfusionAuditor>,
    authorizer: Box<dyn DownloadAuthorizer>,
    orchestrator: MetricOrchestrator,
    config: EvaluationConfig,
}

impl ArtifactRegistry {
    /// Build a registry from its components, validating the configuration.
    pub fn new(components: RegistryComponents, config: EvaluationConfig) -> ArtifexResult<Self> {
        config.validate()?;
        let orchestrator = MetricOrchestrator::new(
            components.calculators,
            config.weights.clone(),
            config.admission_threshold,
            Duration::from_millis(config.calculator_timeout_ms),
        );
        Ok(Self {
            fetcher: components.fetcher,
            store: components.store,
            objects: components.objects,
            lineage: components.lineage,
            license: components.license,
            confusion: components.confusion,
            authorizer: components.authorizer,
            orchestrator,
            config,
        })
    }

    // ── Operation 1: evaluate and admit ──────────────────────────────────────

    /// Score a submission and, if every gating metric clears the threshold,
    /// persist it atomically with its metric results and lineage edges.
    ///
    /// Rejections (threshold, duplicate) come back as
    /// `AdmissionOutcome::Rejected`, not as errors — they are expected,
    /// uploader-facing outcomes. `Err` is reserved for store failures.
    pub fn evaluate_and_admit(
        &self,
        request: &IngestRequest,
        cancel: &CancelFlag,
    ) -> ArtifexResult<AdmissionOutcome> {
        // Duplicate submissions are rejected deterministically, before any
        // scoring work is spent on them.
        if self
            .store
            .find_artifact(&request.name, &request.version)?
            .is_some()
        {
            warn!(
                name = %request.name,
                version = %request.version,
                "duplicate submission rejected"
            );
            return Ok(AdmissionOutcome::Rejected(RejectionReport::duplicate(
                &request.name,
                &request.version,
            )));
        }

        let metadata = self.fetch_snapshot(request);

        // Resolve declared parents against the store; unknown references
        // are skipped (lineage is best-effort at ingestion time).
        let parent_ids = self.resolve_parents(&metadata)?;
        let tree_score = self.ingestion_tree_score(&parent_ids)?;

        let result = self.orchestrator.evaluate(&metadata, tree_score, cancel);

        let failing = self.orchestrator.failing_metrics(&result.metrics);
        if !failing.is_empty() {
            let report =
                RejectionReport::threshold_not_met(&request.name, &request.version, failing);
            info!(
                name = %request.name,
                version = %request.version,
                message = %report.message,
                "ingestion rejected below threshold"
            );
            return Ok(AdmissionOutcome::Rejected(report));
        }

        // Admission passed — persist artifact, metrics, and edges as one
        // atomic store operation.
        let artifact = Artifact {
            id: ArtifactId::new(),
            name: request.name.clone(),
            version: request.version.clone(),
            kind: metadata.kind,
            license: metadata.license.clone().unwrap_or_default(),
            size_bytes: metadata.size_bytes,
            is_sensitive: metadata.is_sensitive,
            access_policy: metadata
                .access_policy
                .clone()
                .map(|source| AccessPolicy { source }),
            storage_location: None,
            uploader: request.uploader.clone(),
            created_at: Utc::now(),
        };
        let edges: Vec<LineageEdge> = parent_ids
            .iter()
            .map(|&parent| LineageEdge {
                child: artifact.id,
                parent,
            })
            .collect();

        match self.store.ingest(&artifact, &result.metrics, &edges) {
            Ok(()) => {}
            // Lost a race with a concurrent identical submission; same
            // deterministic rejection as the up-front check.
            Err(ArtifexError::DuplicateArtifact { name, version }) => {
                return Ok(AdmissionOutcome::Rejected(RejectionReport::duplicate(
                    name, version,
                )));
            }
            Err(e) => return Err(e),
        }

        info!(
            id = %artifact.id,
            name = %artifact.name,
            version = %artifact.version,
            net_score = result.net_score,
            "artifact admitted"
        );

        self.spawn_confusion_audit(artifact.id, artifact.name.clone());

        Ok(AdmissionOutcome::Admitted(result))
    }

    // ── Operation 2: tree score ──────────────────────────────────────────────

    /// Recompute the lineage tree score for a persisted artifact.
    pub fn tree_score(&self, id: ArtifactId) -> ArtifexResult<f64> {
        self.lineage
            .tree_score(self.store.as_ref(), &self.config.weights, id)
    }

    // ── Operation 3: license compatibility ───────────────────────────────────

    /// Compare an artifact license against a consuming project's license.
    pub fn check_license(&self, model_license: &str, code_license: &str) -> CompatibilityVerdict {
        self.license.check(model_license, code_license)
    }

    // ── Operation 4: confusion audit ─────────────────────────────────────────

    /// Run the name-confusion audit on demand and append any findings.
    pub fn audit_confusion(&self, name: &str) -> ArtifexResult<Vec<ConfusionFlag>> {
        let existing: Vec<String> = self
            .store
            .artifact_names()?
            .into_iter()
            .filter(|n| n != name)
            .collect();
        let flags = self.confusion.audit(name, &existing);
        for flag in &flags {
            self.store.append_flag(flag.clone())?;
        }
        Ok(flags)
    }

    // ── Operation 5: sensitive download authorization ────────────────────────

    /// Decide whether `downloader` may fetch the artifact.
    ///
    /// Non-sensitive artifacts are approved without touching the sandbox.
    /// Sensitive artifacts fail closed: no policy script, or any sandbox
    /// outcome other than a clean zero exit, denies the download.
    pub fn authorize_sensitive_download(
        &self,
        id: ArtifactId,
        downloader: &str,
    ) -> ArtifexResult<AccessDecision> {
        let artifact = self
            .store
            .get_artifact(id)?
            .ok_or_else(|| ArtifexError::ArtifactNotFound { id: id.to_string() })?;

        if !artifact.is_sensitive {
            return Ok(AccessDecision::approved(
                "artifact is not sensitive; no policy gate applies",
            ));
        }

        let Some(policy) = artifact.access_policy.as_ref() else {
            warn!(
                id = %artifact.id,
                name = %artifact.name,
                "sensitive artifact has no access policy; failing closed"
            );
            return Ok(AccessDecision::denied(
                SandboxState::Rejected,
                "sensitive artifact has no access policy; download denied",
            ));
        };

        let request = SandboxRequest {
            model_name: artifact.name.clone(),
            uploader: artifact.uploader.clone(),
            downloader: downloader.to_string(),
            artifact_path: artifact.storage_location.clone().unwrap_or_default(),
        };
        Ok(self.authorizer.authorize(policy, &request))
    }

    /// Authorize and, when approved, mint a presigned download URL.
    pub fn download_url(
        &self,
        id: ArtifactId,
        downloader: &str,
        ttl_secs: u64,
    ) -> ArtifexResult<DownloadOutcome> {
        let decision = self.authorize_sensitive_download(id, downloader)?;
        if !decision.approved {
            return Ok(DownloadOutcome::Denied(decision));
        }

        let artifact = self
            .store
            .get_artifact(id)?
            .ok_or_else(|| ArtifexError::ArtifactNotFound { id: id.to_string() })?;
        let location =
            artifact
                .storage_location
                .as_deref()
                .ok_or_else(|| ArtifexError::StoreError {
                    reason: format!("artifact '{}' has no storage location", artifact.id),
                })?;
        let url = self.objects.presign(location, ttl_secs)?;
        Ok(DownloadOutcome::Granted { url, decision })
    }

    // ── Internals ────────────────────────────────────────────────────────────

    /// Fetch the metadata snapshot, downgrading failure to the degraded
    /// snapshot. Identity always comes from the request, not the fetch.
    fn fetch_snapshot(&self, request: &IngestRequest) -> ArtifactMetadata {
        let mut metadata = match self.fetcher.fetch(&request.source_url) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(
                    source_url = %request.source_url,
                    error = %e,
                    "metadata fetch failed; scoring degraded snapshot"
                );
                ArtifactMetadata::degraded(&request.name, &request.version)
            }
        };
        metadata.name = request.name.clone();
        metadata.version = request.version.clone();
        metadata.uploader = request.uploader.clone();
        metadata
    }

    fn resolve_parents(&self, metadata: &ArtifactMetadata) -> ArtifexResult<Vec<ArtifactId>> {
        let mut ids = Vec::new();
        for parent in &metadata.parents {
            match self.store.find_artifact(&parent.name, &parent.version)? {
                Some(found) => ids.push(found.id),
                None => debug!(
                    name = %parent.name,
                    version = %parent.version,
                    "declared parent not in store; skipping edge"
                ),
            }
        }
        Ok(ids)
    }

    /// Tree score at ingestion time: the artifact itself is not persisted
    /// yet, so average the resolved parents' net scores directly. Same
    /// semantics as the full resolver: a parent with no stored metrics
    /// contributes nothing, and no scorable parent at all means the
    /// neutral default.
    fn ingestion_tree_score(&self, parent_ids: &[ArtifactId]) -> ArtifexResult<f64> {
        let mut scores = Vec::with_capacity(parent_ids.len());
        for &parent in parent_ids {
            let metrics = self.store.metrics_for(parent)?;
            if metrics.is_empty() {
                warn!(%parent, "parent has no stored metrics; ignoring for tree score");
                continue;
            }
            scores.push(self.config.weights.net_score(&metrics));
        }
        if scores.is_empty() {
            return Ok(0.5);
        }
        Ok(round2(scores.iter().sum::<f64>() / scores.len() as f64))
    }

    /// Non-blocking post-ingestion audit. Failures are logged, never
    /// surfaced — detection must not affect an already-admitted artifact.
    fn spawn_confusion_audit(&self, id: ArtifactId, name: String) {
        let store = Arc::clone(&self.store);
        let confusion = Arc::clone(&self.confusion);
        thread::spawn(move || {
            let existing = match store.artifact_names() {
                Ok(names) => names.into_iter().filter(|n| n != &name).collect::<Vec<_>>(),
                Err(e) => {
                    warn!(error = %e, "confusion audit could not list names");
                    return;
                }
            };
            let flags = confusion.audit(&name, &existing);
            let count = flags.len();
            for flag in flags {
                if let Err(e) = store.append_flag(flag.with_artifact_id(id)) {
                    warn!(error = %e, "failed to append confusion flag");
                }
            }
            if count > 0 {
                info!(artifact = %name, flags = count, "confusion audit raised flags");
            } else {
                debug!(artifact = %name, "confusion audit clean");
            }
        });
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
