//! # artifex-sandbox
//!
//! Out-of-process access-policy execution for the ARTIFEX trust core.
//!
//! ## Overview
//!
//! [`PolicySandbox`] implements the
//! [`DownloadAuthorizer`](artifex_core::traits::DownloadAuthorizer) trait
//! by running the uploader's policy script under a configured interpreter
//! in its own process group with a cleaned environment, a hard wall-clock
//! timeout (group-killed on expiry), and an empty network namespace where
//! the host supports one. The decision is the exit code and nothing else;
//! timeouts and crashes fail closed.

pub mod runner;

pub use runner::PolicySandbox;

// ── Tests ─────────────────────────────────────────────────────────────────────
