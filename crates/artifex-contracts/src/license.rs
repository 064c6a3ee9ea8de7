//! License compatibility verdict types.
//!
//! The checker implementation lives in `artifex-license`; only the verdict
//! it produces is shared here, so callers can show the reasoning rather
//! than a bare boolean.

use serde::{Deserialize, Serialize};

/// The outcome of comparing an artifact license against a consuming
/// project's license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityVerdict {
    pub compatible: bool,

    /// Human-readable reasoning. Always populated — ambiguity or a caveat
    /// is spelled out, never silently folded into the boolean.
    pub explanation: String,
}

impl CompatibilityVerdict {
    pub fn compatible(explanation: impl Into<String>) -> Self {
        Self {
            compatible: true,
            explanation: explanation.into(),
        }
    }

    pub fn incompatible(explanation: impl Into<String>) -> Self {
        Self {
            compatible: false,
            explanation: explanation.into(),
        }
    }
}
