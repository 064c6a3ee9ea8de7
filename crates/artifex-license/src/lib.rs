//! # artifex-license
//!
//! License normalization, categorization, and the compatibility decision
//! table for the ARTIFEX trust core.
//!
//! ## Overview
//!
//! [`RuleBasedLicenseChecker`] implements the
//! [`LicenseChecker`](artifex_core::traits::LicenseChecker) trait. Raw
//! license strings are normalized (case folding, separator normalization,
//! alias mapping), classified into one of six categories, and run through
//! a fixed decision table. Unrecognized input fails closed with an
//! explanation naming the unresolved side.
//!
//! The classifier is also reused by the license metric calculator — one
//! alias map for the whole workspace.

pub mod category;
pub mod checker;

pub use category::{classify, normalize, LicenseCategory};
pub use checker::RuleBasedLicenseChecker;

// ── Tests ─────────────────────────────────────────────────────────────────────
