//! # artifex-core
//!
//! The trusted center of the ARTIFEX evaluation pipeline: trait seams for
//! every collaborator, the concurrent `MetricOrchestrator`, the TOML
//! evaluation configuration, reference in-memory stores, and the
//! `ArtifactRegistry` facade that exposes the five public operations:
//!
//! - `evaluate_and_admit` — score, gate, persist, audit
//! - `tree_score`         — cycle-safe lineage aggregation
//! - `check_license`      — compatibility classification
//! - `audit_confusion`    — name-confusion detection
//! - `authorize_sensitive_download` — sandboxed policy gate

pub mod config;
pub mod memory;
pub mod orchestrator;
pub mod registry;
pub mod traits;

pub use config::EvaluationConfig;
pub use orchestrator::{CancelFlag, MetricOrchestrator};
pub use registry::{ArtifactRegistry, DownloadOutcome, IngestRequest, RegistryComponents};
