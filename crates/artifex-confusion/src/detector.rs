//! Edit-distance name screening.
//!
//! Two sources of confusion are screened for:
//!
//! - near-collisions with names already registered in the store, flagged
//!   `Medium`;
//! - near-collisions with well-known ecosystem project names, flagged
//!   `High` (the classic typosquat: `tensorfIow` with a capital i).
//!
//! A candidate pair counts as confusable when the names are not identical
//! after case folding, both are long enough to make a near-miss
//! meaningful, their lengths are comparable, and the Levenshtein distance
//! is within the threshold. Detection is audit-only; callers record flags
//! but never block on them.

use strsim::levenshtein;
use tracing::{debug, info};

use artifex_contracts::confusion::{ConfusionFlag, Severity};
use artifex_core::traits::ConfusionAuditor;

/// Maximum Levenshtein distance still considered confusable.
const MAX_EDIT_DISTANCE: usize = 2;

/// Names shorter than this produce too many accidental near-misses.
const MIN_NAME_LEN: usize = 4;

/// Widely-known ecosystem project names screened at `High` severity.
const POPULAR_NAMES: &[&str] = &[
    "tensorflow",
    "pytorch",
    "keras",
    "transformers",
    "scikit-learn",
    "numpy",
    "pandas",
    "huggingface",
    "stable-diffusion",
    "llama",
    "mistral",
    "whisper",
    "bert-base-uncased",
    "gpt2",
    "resnet",
];

fn confusable(a: &str, b: &str) -> bool {
    if a == b {
        return false;
    }
    if a.chars().count() < MIN_NAME_LEN || b.chars().count() < MIN_NAME_LEN {
        return false;
    }
    if a.chars().count().abs_diff(b.chars().count()) > MAX_EDIT_DISTANCE {
        return false;
    }
    levenshtein(a, b) <= MAX_EDIT_DISTANCE
}

/// The production name-confusion auditor.
#[derive(Debug, Default)]
pub struct ConfusionDetector;

impl ConfusionDetector {
    pub fn new() -> Self {
        Self
    }
}

impl ConfusionAuditor for ConfusionDetector {
    fn audit(&self, new_name: &str, existing_names: &[String]) -> Vec<ConfusionFlag> {
        let candidate = new_name.to_lowercase();
        let mut flags = Vec::new();

        for popular in POPULAR_NAMES {
            if confusable(&candidate, popular) {
                info!(
                    name = %new_name,
                    target = %popular,
                    "name resembles a well-known project"
                );
                flags.push(ConfusionFlag::new(
                    new_name,
                    format!("possible typosquatting of '{}'", popular),
                    Severity::High,
                ));
            }
        }

        for existing in existing_names {
            if confusable(&candidate, &existing.to_lowercase()) {
                debug!(
                    name = %new_name,
                    target = %existing,
                    "name resembles an existing artifact"
                );
                flags.push(ConfusionFlag::new(
                    new_name,
                    format!("similar to existing artifact '{}'", existing),
                    Severity::Medium,
                ));
            }
        }

        flags
    }
}
