//! In-memory implementations of `ArtifactStore` and `ObjectStore`.
//!
//! `InMemoryStore` is the reference implementation of the persistence
//! seam. It keeps everything behind one `Mutex`, which also gives the
//! atomic-ingest guarantee for free: a duplicate `(name, version)` check
//! and the inserts happen under a single lock acquisition.
//!
//! `InMemoryObjectStore` backs the demo and tests; `put` returns a
//! `mem://` location and `presign` mints a fake signed URL.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;
use uuid::Uuid;

use artifex_contracts::{
    artifact::{Artifact, ArtifactId},
    confusion::ConfusionFlag,
    error::{ArtifexError, ArtifexResult},
    lineage::LineageEdge,
    metric::MetricResult,
};

use crate::traits::{ArtifactStore, ObjectStore};

// ── Internal mutable state ────────────────────────────────────────────────────

#[derive(Default)]
struct StoreState {
    artifacts: HashMap<ArtifactId, Artifact>,
    /// `(name, version)` uniqueness index.
    by_name_version: HashMap<(String, String), ArtifactId>,
    metrics: HashMap<ArtifactId, Vec<MetricResult>>,
    edges: Vec<LineageEdge>,
    flags: Vec<ConfusionFlag>,
}

// ── Artifact store ────────────────────────────────────────────────────────────

/// Mutex-protected in-memory `ArtifactStore`.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ArtifexResult<std::sync::MutexGuard<'_, StoreState>> {
        self.state.lock().map_err(|e| ArtifexError::StoreError {
            reason: format!("store lock poisoned: {}", e),
        })
    }
}

impl ArtifactStore for InMemoryStore {
    fn ingest(
        &self,
        artifact: &Artifact,
        metrics: &[MetricResult],
        edges: &[LineageEdge],
    ) -> ArtifexResult<()> {
        let mut state = self.lock()?;

        let key = (artifact.name.clone(), artifact.version.clone());
        if state.by_name_version.contains_key(&key) {
            return Err(ArtifexError::DuplicateArtifact {
                name: artifact.name.clone(),
                version: artifact.version.clone(),
            });
        }

        debug!(
            id = %artifact.id,
            name = %artifact.name,
            version = %artifact.version,
            metric_count = metrics.len(),
            edge_count = edges.len(),
            "ingesting artifact"
        );

        state.by_name_version.insert(key, artifact.id);
        state.artifacts.insert(artifact.id, artifact.clone());
        state.metrics.insert(artifact.id, metrics.to_vec());
        state.edges.extend_from_slice(edges);
        Ok(())
    }

    fn get_artifact(&self, id: ArtifactId) -> ArtifexResult<Option<Artifact>> {
        Ok(self.lock()?.artifacts.get(&id).cloned())
    }

    fn find_artifact(&self, name: &str, version: &str) -> ArtifexResult<Option<Artifact>> {
        let state = self.lock()?;
        let id = state
            .by_name_version
            .get(&(name.to_string(), version.to_string()));
        Ok(id.and_then(|id| state.artifacts.get(id).cloned()))
    }

    fn metrics_for(&self, id: ArtifactId) -> ArtifexResult<Vec<MetricResult>> {
        Ok(self.lock()?.metrics.get(&id).cloned().unwrap_or_default())
    }

    fn parents_of(&self, id: ArtifactId) -> ArtifexResult<Vec<ArtifactId>> {
        Ok(self
            .lock()?
            .edges
            .iter()
            .filter(|e| e.child == id)
            .map(|e| e.parent)
            .collect())
    }

    fn artifact_names(&self) -> ArtifexResult<Vec<String>> {
        let state = self.lock()?;
        let mut names: Vec<String> = state
            .artifacts
            .values()
            .map(|a| a.name.clone())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        names.sort();
        Ok(names)
    }

    fn append_flag(&self, flag: ConfusionFlag) -> ArtifexResult<()> {
        self.lock()?.flags.push(flag);
        Ok(())
    }

    fn flags_for(&self, artifact_name: &str) -> ArtifexResult<Vec<ConfusionFlag>> {
        Ok(self
            .lock()?
            .flags
            .iter()
            .filter(|f| f.artifact_name == artifact_name)
            .cloned()
            .collect())
    }
}

// ── Object store ──────────────────────────────────────────────────────────────

/// In-memory `ObjectStore` for the demo and tests.
#[derive(Default)]
pub struct InMemoryObjectStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn put(&self, bytes: &[u8]) -> ArtifexResult<String> {
        let location = format!("mem://{}", Uuid::new_v4());
        let mut blobs = self.blobs.lock().map_err(|e| ArtifexError::StoreError {
            reason: format!("object store lock poisoned: {}", e),
        })?;
        blobs.insert(location.clone(), bytes.to_vec());
        Ok(location)
    }

    fn presign(&self, location: &str, ttl_secs: u64) -> ArtifexResult<String> {
        let blobs = self.blobs.lock().map_err(|e| ArtifexError::StoreError {
            reason: format!("object store lock poisoned: {}", e),
        })?;
        if !blobs.contains_key(location) {
            return Err(ArtifexError::StoreError {
                reason: format!("no object at location '{}'", location),
            });
        }
        Ok(format!("https://signed.invalid/{}?ttl={}", location, ttl_secs))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use artifex_contracts::{
        artifact::{Artifact, ArtifactId, ArtifactKind},
        confusion::{ConfusionFlag, Severity},
        error::ArtifexError,
        lineage::LineageEdge,
        metric::{MetricKind, MetricResult},
    };

    use crate::traits::{ArtifactStore, ObjectStore};

    use super::{InMemoryObjectStore, InMemoryStore};

    fn artifact(name: &str, version: &str) -> Artifact {
        Artifact {
            id: ArtifactId::new(),
            name: name.to_string(),
            version: version.to_string(),
            kind: ArtifactKind::Model,
            license: "mit".to_string(),
            size_bytes: 1024,
            is_sensitive: false,
            access_policy: None,
            storage_location: None,
            uploader: "alice".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn ingest_then_lookup_round_trip() {
        let store = InMemoryStore::new();
        let a = artifact("bert-mini", "1.0.0");
        let metrics = vec![MetricResult::ok(MetricKind::License, 1.0, 3)];

        store.ingest(&a, &metrics, &[]).unwrap();

        let found = store.find_artifact("bert-mini", "1.0.0").unwrap().unwrap();
        assert_eq!(found.id, a.id);
        assert_eq!(store.metrics_for(a.id).unwrap().len(), 1);
    }

    #[test]
    fn duplicate_name_version_is_rejected_atomically() {
        let store = InMemoryStore::new();
        let first = artifact("bert-mini", "1.0.0");
        let second = artifact("bert-mini", "1.0.0");

        store.ingest(&first, &[], &[]).unwrap();
        let err = store
            .ingest(
                &second,
                &[MetricResult::ok(MetricKind::License, 1.0, 1)],
                &[],
            )
            .unwrap_err();

        match err {
            ArtifexError::DuplicateArtifact { name, version } => {
                assert_eq!(name, "bert-mini");
                assert_eq!(version, "1.0.0");
            }
            other => panic!("expected DuplicateArtifact, got {:?}", other),
        }

        // Nothing from the rejected submission was written.
        assert!(store.metrics_for(second.id).unwrap().is_empty());
        assert!(store.get_artifact(second.id).unwrap().is_none());
    }

    #[test]
    fn same_name_different_version_coexist() {
        let store = InMemoryStore::new();
        store.ingest(&artifact("bert-mini", "1.0.0"), &[], &[]).unwrap();
        store.ingest(&artifact("bert-mini", "2.0.0"), &[], &[]).unwrap();

        // One distinct name.
        assert_eq!(store.artifact_names().unwrap(), vec!["bert-mini"]);
    }

    #[test]
    fn parents_follow_edges_only_for_child() {
        let store = InMemoryStore::new();
        let child = artifact("child", "1.0.0");
        let parent_a = artifact("parent-a", "1.0.0");
        let parent_b = artifact("parent-b", "1.0.0");

        store.ingest(&parent_a, &[], &[]).unwrap();
        store.ingest(&parent_b, &[], &[]).unwrap();
        store
            .ingest(
                &child,
                &[],
                &[
                    LineageEdge { child: child.id, parent: parent_a.id },
                    LineageEdge { child: child.id, parent: parent_b.id },
                ],
            )
            .unwrap();

        let parents = store.parents_of(child.id).unwrap();
        assert_eq!(parents.len(), 2);
        assert!(store.parents_of(parent_a.id).unwrap().is_empty());
    }

    #[test]
    fn flags_are_append_only_and_filtered_by_name() {
        let store = InMemoryStore::new();
        store
            .append_flag(ConfusionFlag::new(
                "tensorfIow",
                "possible typosquatting of 'tensorflow'",
                Severity::High,
            ))
            .unwrap();

        assert_eq!(store.flags_for("tensorfIow").unwrap().len(), 1);
        assert!(store.flags_for("other").unwrap().is_empty());
    }

    #[test]
    fn object_store_put_then_presign() {
        let objects = InMemoryObjectStore::new();
        let location = objects.put(b"archive-bytes").unwrap();
        let url = objects.presign(&location, 900).unwrap();
        assert!(url.contains(&location));
        assert!(url.contains("ttl=900"));
    }

    #[test]
    fn presign_unknown_location_fails() {
        let objects = InMemoryObjectStore::new();
        assert!(objects.presign("mem://missing", 60).is_err());
    }
}
