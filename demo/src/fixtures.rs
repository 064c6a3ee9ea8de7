//! Canned metadata snapshots standing in for the external fetch layer.
//!
//! The demo has no network access; `FixtureFetcher` serves a small set of
//! hand-written snapshots keyed by source URL and fails for anything else,
//! which also exercises the degraded-snapshot path.

use std::collections::HashMap;

use artifex_contracts::{
    artifact::ArtifactKind,
    error::{ArtifexError, ArtifexResult},
    metadata::{ArtifactMetadata, ContributorStat, ParentRef, ReviewStats},
};
use artifex_core::traits::MetadataFetcher;

pub const BASE_URL: &str = "https://hub.invalid/models/atlas-base";
pub const DERIVED_URL: &str = "https://hub.invalid/models/atlas-chat";
pub const WEAK_URL: &str = "https://hub.invalid/models/mystery-weights";
pub const SQUAT_URL: &str = "https://hub.invalid/models/atIas-base";

fn atlas_base() -> ArtifactMetadata {
    let mut md = ArtifactMetadata::degraded("atlas-base", "1.0.0");
    md.kind = ArtifactKind::Model;
    md.source_url = Some(BASE_URL.to_string());
    md.license = Some("Apache-2.0".to_string());
    md.readme = Some(format!(
        "# atlas-base\n\nA general-purpose base model.\n\n{}\n\n\
         ## Install\npip install atlas\n\n## Usage\n```python\nimport atlas\n```\n\n\
         ## Example\natlas.load(\"atlas-base\")\n\n\
         ## Dataset\nTrained on the documented open corpus; splits and samples \
         are described alongside the dataset license.\n",
        "Architecture notes and training details. ".repeat(60)
    ));
    md.size_bytes = 180 * 1024 * 1024;
    md.files = vec![
        "weights.safetensors".to_string(),
        "config.json".to_string(),
        "tests/test_load.py".to_string(),
        ".github/workflows/ci.yml".to_string(),
        "pyproject.toml".to_string(),
    ];
    md.contributors = vec![
        ContributorStat { name: "ana".to_string(), commits: 120 },
        ContributorStat { name: "bo".to_string(), commits: 90 },
        ContributorStat { name: "cy".to_string(), commits: 70 },
    ];
    md.review_stats = Some(ReviewStats { total_commits: 280, reviewed_commits: 240 });
    md.dataset_url = Some("https://hub.invalid/datasets/open-corpus".to_string());
    md.code_url = Some("https://git.invalid/atlas/atlas-base".to_string());
    md.benchmark_claims = vec![
        "mmlu: 68.4".to_string(),
        "gsm8k: 61.2".to_string(),
        "hellaswag: 82.0".to_string(),
    ];
    md
}

fn atlas_chat() -> ArtifactMetadata {
    let mut md = atlas_base();
    md.name = "atlas-chat".to_string();
    md.source_url = Some(DERIVED_URL.to_string());
    md.parents = vec![ParentRef {
        name: "atlas-base".to_string(),
        version: "1.0.0".to_string(),
    }];
    md.is_sensitive = true;
    // Owner-only access: the uploader may download, nobody else.
    md.access_policy = Some(
        r#"[ "$ARTIFEX_DOWNLOADER" = "$ARTIFEX_UPLOADER" ] && exit 0 || exit 1"#.to_string(),
    );
    md
}

fn mystery_weights() -> ArtifactMetadata {
    let mut md = ArtifactMetadata::degraded("mystery-weights", "0.1.0");
    md.source_url = Some(WEAK_URL.to_string());
    md.size_bytes = 3 * 1024 * 1024 * 1024;
    md.contributors = vec![ContributorStat { name: "anon".to_string(), commits: 4 }];
    md
}

fn squat() -> ArtifactMetadata {
    let mut md = atlas_base();
    md.name = "atIas-base".to_string();
    md.source_url = Some(SQUAT_URL.to_string());
    md
}

/// Fixture-backed `MetadataFetcher`.
pub struct FixtureFetcher {
    snapshots: HashMap<String, ArtifactMetadata>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        let mut snapshots = HashMap::new();
        snapshots.insert(BASE_URL.to_string(), atlas_base());
        snapshots.insert(DERIVED_URL.to_string(), atlas_chat());
        snapshots.insert(WEAK_URL.to_string(), mystery_weights());
        snapshots.insert(SQUAT_URL.to_string(), squat());
        Self { snapshots }
    }
}

impl Default for FixtureFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataFetcher for FixtureFetcher {
    fn fetch(&self, source_url: &str) -> ArtifexResult<ArtifactMetadata> {
        self.snapshots
            .get(source_url)
            .cloned()
            .ok_or_else(|| ArtifexError::MetadataUnavailable {
                source_url: source_url.to_string(),
                reason: "no fixture for this URL".to_string(),
            })
    }
}
