//! Lineage edges: the "derived from" relation between artifacts.

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactId;

/// A directed edge meaning "`child` was derived from `parent`".
///
/// Multiple parents are allowed. Because parent references come from
/// external, untrusted metadata, self-loops and cycles are possible and
/// must be tolerated by traversal — never assumed absent. Edges are
/// written once at ingestion and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineageEdge {
    pub child: ArtifactId,
    pub parent: ArtifactId,
}
