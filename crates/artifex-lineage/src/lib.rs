//! # artifex-lineage
//!
//! Lineage tree-score resolution for the ARTIFEX trust core.
//!
//! ## Overview
//!
//! [`LineageResolver`] implements the
//! [`LineageScorer`](artifex_core::traits::LineageScorer) trait: an
//! iterative depth-first walk over the stored parent edges that tolerates
//! cycles, self-loops, and duplicate edges, averaging the net scores of
//! every distinct reachable ancestor. No ancestors means the neutral 0.5.

pub mod resolver;

pub use resolver::{LineageResolver, DEFAULT_MAX_DEPTH};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use artifex_contracts::{
        artifact::{Artifact, ArtifactId, ArtifactKind},
        lineage::LineageEdge,
        metric::{MetricKind, MetricResult},
        weights::WeightTable,
    };
    use artifex_core::memory::InMemoryStore;
    use artifex_core::traits::{ArtifactStore, LineageScorer};

    use crate::LineageResolver;

    /// Insert an artifact under a caller-chosen id whose every metric
    /// scores `score` (so its net score equals `score`), carrying the
    /// given raw edges.
    ///
    /// Edges are passed raw rather than derived from a parent list so
    /// tests can construct self-loops and back-edges — the store accepts
    /// any edge set and the resolver must cope.
    fn insert_as(
        store: &InMemoryStore,
        id: ArtifactId,
        name: &str,
        score: f64,
        edges: &[LineageEdge],
    ) {
        let artifact = Artifact {
            id,
            name: name.to_string(),
            version: "1.0.0".to_string(),
            kind: ArtifactKind::Model,
            license: "mit".to_string(),
            size_bytes: 1,
            is_sensitive: false,
            access_policy: None,
            storage_location: None,
            uploader: "alice".to_string(),
            created_at: Utc::now(),
        };
        let metrics: Vec<MetricResult> = MetricKind::ALL
            .iter()
            .map(|&kind| MetricResult::ok(kind, score, 1))
            .collect();
        store.ingest(&artifact, &metrics, edges).unwrap();
    }

    fn insert(store: &InMemoryStore, name: &str, score: f64, parents: &[ArtifactId]) -> ArtifactId {
        let id = ArtifactId::new();
        let edges: Vec<LineageEdge> = parents
            .iter()
            .map(|&parent| LineageEdge { child: id, parent })
            .collect();
        insert_as(store, id, name, score, &edges);
        id
    }

    fn score(store: &InMemoryStore, id: ArtifactId) -> f64 {
        LineageResolver::default()
            .tree_score(store, &WeightTable::default(), id)
            .unwrap()
    }

    // ── 1. defaults ───────────────────────────────────────────────────────────

    #[test]
    fn no_ancestors_yields_neutral_default() {
        let store = InMemoryStore::new();
        let root = insert(&store, "root", 0.9, &[]);
        assert_eq!(score(&store, root), 0.5);
    }

    #[test]
    fn unknown_artifact_yields_neutral_default() {
        let store = InMemoryStore::new();
        assert_eq!(score(&store, ArtifactId::new()), 0.5);
    }

    // ── 2. aggregation ────────────────────────────────────────────────────────

    #[test]
    fn single_parent_scores_its_net_score() {
        let store = InMemoryStore::new();
        let parent = insert(&store, "base", 0.8, &[]);
        let child = insert(&store, "derived", 0.6, &[parent]);
        assert_eq!(score(&store, child), 0.8);
    }

    #[test]
    fn multiple_generations_average_all_reachable_ancestors() {
        let store = InMemoryStore::new();
        let grandparent = insert(&store, "gp", 0.9, &[]);
        let parent = insert(&store, "p", 0.7, &[grandparent]);
        let child = insert(&store, "c", 0.1, &[parent]);
        // mean(0.7, 0.9) = 0.8; the child's own score is not included.
        assert_eq!(score(&store, child), 0.8);
    }

    #[test]
    fn result_is_rounded_to_two_decimals() {
        let store = InMemoryStore::new();
        let a = insert(&store, "a", 0.8, &[]);
        let b = insert(&store, "b", 0.7, &[]);
        let c = insert(&store, "c", 0.7, &[]);
        let child = insert(&store, "child", 0.5, &[a, b, c]);
        // mean(0.8, 0.7, 0.7) = 0.7333... → 0.73
        assert_eq!(score(&store, child), 0.73);
    }

    // ── 3. malformed edge relations ───────────────────────────────────────────

    #[test]
    fn shared_ancestor_is_counted_once() {
        // Diamond: child → {p1, p2} → gp.
        let store = InMemoryStore::new();
        let gp = insert(&store, "gp", 1.0, &[]);
        let p1 = insert(&store, "p1", 0.4, &[gp]);
        let p2 = insert(&store, "p2", 0.4, &[gp]);
        let child = insert(&store, "child", 0.5, &[p1, p2]);
        // mean(0.4, 0.4, 1.0) — gp once, not twice → 0.6.
        assert_eq!(score(&store, child), 0.6);
    }

    #[test]
    fn self_loop_terminates() {
        let store = InMemoryStore::new();
        let looped = ArtifactId::new();
        insert_as(
            &store,
            looped,
            "ouroboros",
            0.8,
            &[LineageEdge { child: looped, parent: looped }],
        );
        // The only "ancestor" is the artifact itself, already visited.
        assert_eq!(score(&store, looped), 0.5);
    }

    #[test]
    fn cycle_terminates_and_counts_each_member_once() {
        // a → b → c → a.
        let store = InMemoryStore::new();
        let a = ArtifactId::new();
        let b = insert(&store, "b", 0.6, &[]);
        let c = insert(&store, "c", 0.3, &[b]);
        insert_as(
            &store,
            a,
            "a",
            0.9,
            &[
                LineageEdge { child: a, parent: c },
                LineageEdge { child: b, parent: a },
            ],
        );
        // From a: ancestors are c and b (a itself is revisited via the
        // back-edge and skipped).
        assert_eq!(score(&store, a), 0.45);
    }

    // ── 4. depth cap ──────────────────────────────────────────────────────────

    #[test]
    fn traversal_stops_at_the_depth_cap() {
        let store = InMemoryStore::new();
        // Chain of 8 ancestors above the child; default cap is 5.
        let mut parent = insert(&store, "gen-8", 1.0, &[]);
        for gen in (1..8).rev() {
            parent = insert(&store, &format!("gen-{gen}"), 1.0, &[parent]);
        }
        let child = insert(&store, "child", 0.0, &[parent]);

        let resolver = LineageResolver::new(2);
        let shallow = resolver
            .tree_score(&store, &WeightTable::default(), child)
            .unwrap();
        assert_eq!(shallow, 1.0);

        // Depth 5 still terminates on the long chain.
        assert_eq!(score(&store, child), 1.0);
    }

    #[test]
    fn ancestor_without_metrics_is_ignored_not_zeroed() {
        let store = InMemoryStore::new();
        let scored = insert(&store, "scored", 0.8, &[]);
        let bare = {
            let artifact = Artifact {
                id: ArtifactId::new(),
                name: "bare".to_string(),
                version: "1.0.0".to_string(),
                kind: ArtifactKind::Model,
                license: "mit".to_string(),
                size_bytes: 1,
                is_sensitive: false,
                access_policy: None,
                storage_location: None,
                uploader: "alice".to_string(),
                created_at: Utc::now(),
            };
            store.ingest(&artifact, &[], &[]).unwrap();
            artifact.id
        };
        let child = insert(&store, "child", 0.5, &[scored, bare]);
        assert_eq!(score(&store, child), 0.8);
    }
}
