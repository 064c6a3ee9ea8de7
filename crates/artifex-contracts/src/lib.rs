//! # artifex-contracts
//!
//! Shared types, the weight table, and the error taxonomy for the ARTIFEX
//! trust evaluation core.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod artifact;
pub mod confusion;
pub mod error;
pub mod evaluation;
pub mod license;
pub mod lineage;
pub mod metadata;
pub mod metric;
pub mod sandbox;
pub mod weights;
