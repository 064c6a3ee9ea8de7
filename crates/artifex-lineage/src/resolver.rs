//! Iterative depth-first ancestor traversal.
//!
//! The stored edge relation is untrusted: it may contain duplicate edges,
//! self-loops, and cycles. Termination rests on two independent bounds —
//! a visited set (each artifact's score counted at most once) and a depth
//! cap. The tree score is the plain mean of the reachable ancestors' net
//! scores, rounded to two decimals; an artifact with no reachable
//! ancestors scores the neutral 0.5.

use std::collections::HashSet;

use tracing::{debug, warn};

use artifex_contracts::{
    artifact::ArtifactId,
    error::ArtifexResult,
    weights::{round2, WeightTable},
};
use artifex_core::traits::{ArtifactStore, LineageScorer};

/// Default traversal depth cap.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// The production lineage scorer.
#[derive(Debug, Clone)]
pub struct LineageResolver {
    max_depth: usize,
}

impl LineageResolver {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for LineageResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl LineageScorer for LineageResolver {
    fn tree_score(
        &self,
        store: &dyn ArtifactStore,
        weights: &WeightTable,
        id: ArtifactId,
    ) -> ArtifexResult<f64> {
        let mut visited: HashSet<ArtifactId> = HashSet::new();
        visited.insert(id);

        // (ancestor, depth) frontier; depth 1 is a direct parent.
        let mut stack: Vec<(ArtifactId, usize)> = Vec::new();
        for parent in store.parents_of(id)? {
            stack.push((parent, 1));
        }

        let mut scores: Vec<f64> = Vec::new();
        while let Some((ancestor, depth)) = stack.pop() {
            if !visited.insert(ancestor) {
                // Duplicate edge, shared ancestor, or a cycle closing back
                // on itself. Counted once, never revisited.
                debug!(%ancestor, depth, "ancestor already visited; skipping");
                continue;
            }

            let metrics = store.metrics_for(ancestor)?;
            if metrics.is_empty() {
                // Edge to an artifact with no stored results. Contributes
                // nothing rather than poisoning the mean.
                warn!(%ancestor, "ancestor has no stored metrics; ignoring");
            } else {
                scores.push(weights.net_score(&metrics));
            }

            if depth >= self.max_depth {
                continue;
            }
            for parent in store.parents_of(ancestor)? {
                stack.push((parent, depth + 1));
            }
        }

        if scores.is_empty() {
            debug!(artifact = %id, "no reachable ancestors; neutral tree score");
            return Ok(0.5);
        }
        Ok(round2(scores.iter().sum::<f64>() / scores.len() as f64))
    }
}
