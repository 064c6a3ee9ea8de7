//! The compatibility decision table.
//!
//! Evaluation order:
//!
//! 1. Either side `Unknown` → incompatible, naming the unresolved side.
//!    Ambiguity is never silently treated as permission.
//! 2. Either side `Proprietary` → incompatible, manual review required.
//! 3. Model `Permissive` → compatible regardless of code license.
//! 4. Model `CopyleftStrong` → compatible only with the identical
//!    identifier on the code side.
//! 5. Model `CopyleftWeak` → compatible with `Permissive`/`CopyleftWeak`.
//! 6. Model Creative Commons: share-alike → incompatible (manual review);
//!    otherwise compatible with an attribution caveat.
//!
//! Every branch produces an explanation string — callers must be able to
//! show the reasoning, not just the boolean.

use tracing::debug;

use artifex_contracts::license::CompatibilityVerdict;
use artifex_core::traits::LicenseChecker;

use crate::category::{classify, LicenseCategory};

/// The rule-based license compatibility checker.
#[derive(Debug, Default)]
pub struct RuleBasedLicenseChecker;

impl RuleBasedLicenseChecker {
    pub fn new() -> Self {
        Self
    }
}

impl LicenseChecker for RuleBasedLicenseChecker {
    fn check(&self, model_license: &str, code_license: &str) -> CompatibilityVerdict {
        let (model_id, model_cat) = classify(model_license);
        let (code_id, code_cat) = classify(code_license);

        debug!(
            model = %model_id,
            code = %code_id,
            "checking license compatibility"
        );

        // Rule 1: unknown on either side fails closed.
        if model_cat == LicenseCategory::Unknown {
            return CompatibilityVerdict::incompatible(format!(
                "model license '{}' could not be resolved to a known category; \
                 ambiguity is not permission — manual review required",
                model_license.trim()
            ));
        }
        if code_cat == LicenseCategory::Unknown {
            return CompatibilityVerdict::incompatible(format!(
                "code license '{}' could not be resolved to a known category; \
                 ambiguity is not permission — manual review required",
                code_license.trim()
            ));
        }

        // Rule 2: proprietary on either side requires manual review.
        if model_cat == LicenseCategory::Proprietary || code_cat == LicenseCategory::Proprietary {
            let side = if model_cat == LicenseCategory::Proprietary {
                "model"
            } else {
                "code"
            };
            return CompatibilityVerdict::incompatible(format!(
                "the {} license is proprietary; manual legal review is required",
                side
            ));
        }

        match model_cat {
            // Rule 3.
            LicenseCategory::Permissive => CompatibilityVerdict::compatible(format!(
                "model license '{}' is permissive and places no derivative-license \
                 obligation on the consuming project ('{}')",
                model_id, code_id
            )),

            // Rule 4.
            LicenseCategory::CopyleftStrong => {
                if model_id == code_id {
                    CompatibilityVerdict::compatible(format!(
                        "both sides carry the same strong copyleft license '{}'; \
                         the derivative-license obligation is satisfied",
                        model_id
                    ))
                } else {
                    CompatibilityVerdict::incompatible(format!(
                        "model license '{}' requires derivative works to adopt the same \
                         license, but the consuming project is licensed '{}'",
                        model_id, code_id
                    ))
                }
            }

            // Rule 5.
            LicenseCategory::CopyleftWeak => match code_cat {
                LicenseCategory::Permissive | LicenseCategory::CopyleftWeak => {
                    CompatibilityVerdict::compatible(format!(
                        "model license '{}' is weak copyleft; the consuming project \
                         license '{}' satisfies its file-level obligations",
                        model_id, code_id
                    ))
                }
                _ => CompatibilityVerdict::incompatible(format!(
                    "model license '{}' is weak copyleft and is not cleared for use \
                     under consuming project license '{}'",
                    model_id, code_id
                )),
            },

            // Rule 6.
            LicenseCategory::CreativeCommons { share_alike } => {
                if share_alike {
                    CompatibilityVerdict::incompatible(format!(
                        "model license '{}' is a Creative Commons share-alike variant; \
                         manual review is required before use in a software project",
                        model_id
                    ))
                } else {
                    CompatibilityVerdict::compatible(format!(
                        "model license '{}' is Creative Commons without share-alike; \
                         compatible provided attribution requirements are met",
                        model_id
                    ))
                }
            }

            // Handled above; unreachable by construction.
            LicenseCategory::Proprietary | LicenseCategory::Unknown => {
                CompatibilityVerdict::incompatible(
                    "unresolved license combination; manual review required",
                )
            }
        }
    }
}
