//! The five demo walkthroughs, one per registry operation.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use artifex_contracts::{
    error::ArtifexResult,
    evaluation::AdmissionOutcome,
    metric::MetricResult,
};
use artifex_confusion::ConfusionDetector;
use artifex_core::{
    memory::{InMemoryObjectStore, InMemoryStore},
    traits::ArtifactStore,
    ArtifactRegistry, CancelFlag, EvaluationConfig, IngestRequest, RegistryComponents,
};
use artifex_license::RuleBasedLicenseChecker;
use artifex_lineage::LineageResolver;
use artifex_metrics::default_calculators;
use artifex_sandbox::PolicySandbox;

use crate::fixtures::{self, FixtureFetcher};

/// A fully wired registry plus a handle on its store for inspection.
pub struct DemoRig {
    pub registry: ArtifactRegistry,
    pub store: Arc<InMemoryStore>,
}

pub fn build_rig() -> ArtifexResult<DemoRig> {
    let config = EvaluationConfig::default();
    let store = Arc::new(InMemoryStore::new());
    let components = RegistryComponents {
        fetcher: Box::new(FixtureFetcher::new()),
        store: Arc::clone(&store) as Arc<dyn ArtifactStore>,
        objects: Box::new(InMemoryObjectStore::new()),
        lineage: Box::new(LineageResolver::new(config.lineage_max_depth)),
        license: Box::new(RuleBasedLicenseChecker::new()),
        confusion: Arc::new(ConfusionDetector::new()),
        authorizer: Box::new(PolicySandbox::new(
            config.sandbox_interpreter.clone(),
            Duration::from_millis(config.sandbox_timeout_ms),
        )),
        calculators: default_calculators(),
    };
    let registry = ArtifactRegistry::new(components, config)?;
    Ok(DemoRig { registry, store })
}

fn cancel() -> CancelFlag {
    Arc::new(AtomicBool::new(false))
}

fn request(name: &str, version: &str, url: &str, uploader: &str) -> IngestRequest {
    IngestRequest {
        name: name.to_string(),
        version: version.to_string(),
        source_url: url.to_string(),
        uploader: uploader.to_string(),
    }
}

fn print_metrics(metrics: &[MetricResult]) {
    for m in metrics {
        match &m.failure {
            None => println!("    {:<20} {:.2}  ({}ms)", m.kind.display_name(), m.score, m.latency_ms),
            Some(reason) => println!("    {:<20} {:.2}  FAILED: {}", m.kind.display_name(), m.score, reason),
        }
    }
}

fn ingest(rig: &DemoRig, req: &IngestRequest) -> ArtifexResult<()> {
    println!("  Submitting '{}' v{} ...", req.name, req.version);
    match rig.registry.evaluate_and_admit(req, &cancel())? {
        AdmissionOutcome::Admitted(result) => {
            println!("  ADMITTED  net score {:.2}", result.net_score);
            print_metrics(&result.metrics);
        }
        AdmissionOutcome::Rejected(report) => {
            println!("  REJECTED  {}", report.message);
        }
    }
    println!();
    Ok(())
}

// ── Scenario 1: evaluation and admission ─────────────────────────────────────

pub fn run_ingestion() -> ArtifexResult<()> {
    println!("Scenario 1 — Metric evaluation and admission gating");
    println!("---------------------------------------------------");
    let rig = build_rig()?;

    // A healthy submission clears every gate.
    ingest(&rig, &request("atlas-base", "1.0.0", fixtures::BASE_URL, "ana"))?;

    // Sparse metadata scores conservatively and is rejected with the
    // failing metrics named.
    ingest(&rig, &request("mystery-weights", "0.1.0", fixtures::WEAK_URL, "anon"))?;

    // Resubmitting the same (name, version) is rejected deterministically.
    ingest(&rig, &request("atlas-base", "1.0.0", fixtures::BASE_URL, "ana"))?;

    // An unknown URL degrades the fetch; identity comes from the request.
    ingest(
        &rig,
        &request("ghost-model", "0.0.1", "https://hub.invalid/nowhere", "ana"),
    )?;
    Ok(())
}

// ── Scenario 2: lineage tree score ───────────────────────────────────────────

pub fn run_lineage() -> ArtifexResult<()> {
    println!("Scenario 2 — Lineage tree score");
    println!("-------------------------------");
    let rig = build_rig()?;

    ingest(&rig, &request("atlas-base", "1.0.0", fixtures::BASE_URL, "ana"))?;
    ingest(&rig, &request("atlas-chat", "1.0.0", fixtures::DERIVED_URL, "ana"))?;

    let base = rig.store.find_artifact("atlas-base", "1.0.0")?;
    let chat = rig.store.find_artifact("atlas-chat", "1.0.0")?;
    if let (Some(base), Some(chat)) = (base, chat) {
        println!("  Tree score of 'atlas-base' (no ancestors): {:.2}", rig.registry.tree_score(base.id)?);
        println!("  Tree score of 'atlas-chat' (derived):      {:.2}", rig.registry.tree_score(chat.id)?);
    }
    println!();
    Ok(())
}

// ── Scenario 3: license compatibility ────────────────────────────────────────

pub fn run_license() -> ArtifexResult<()> {
    println!("Scenario 3 — License compatibility");
    println!("----------------------------------");
    let rig = build_rig()?;

    let pairs = [
        ("MIT", "Apache-2.0"),
        ("GPL-3.0", "MIT"),
        ("GPL-3.0", "GPL-3.0"),
        ("CC-BY-SA-4.0", "MIT"),
        ("CustomProprietaryLicense", "MIT"),
    ];
    for (model, code) in pairs {
        let verdict = rig.registry.check_license(model, code);
        let mark = if verdict.compatible { "COMPATIBLE  " } else { "INCOMPATIBLE" };
        println!("  {}  model={:<24} code={:<12}", mark, model, code);
        println!("                {}", verdict.explanation);
    }
    println!();
    Ok(())
}

// ── Scenario 4: name-confusion audit ─────────────────────────────────────────

pub fn run_confusion() -> ArtifexResult<()> {
    println!("Scenario 4 — Name-confusion audit");
    println!("---------------------------------");
    let rig = build_rig()?;

    ingest(&rig, &request("atlas-base", "1.0.0", fixtures::BASE_URL, "ana"))?;

    // A capital-I-for-l near-duplicate sneaks in through the normal
    // ingestion path; the post-admission audit flags it against the
    // established name.
    ingest(&rig, &request("atIas-base", "1.0.0", fixtures::SQUAT_URL, "mallory"))?;

    let flags = rig.registry.audit_confusion("atIas-base")?;
    if flags.is_empty() {
        println!("  No flags raised for 'atIas-base'");
    }
    for flag in &flags {
        println!("  [{}] {}: {}", flag.severity, flag.artifact_name, flag.suspicious_pattern);
    }

    // A typosquat of a well-known ecosystem name.
    let flags = rig.registry.audit_confusion("tensorfIow")?;
    for flag in &flags {
        println!("  [{}] {}: {}", flag.severity, flag.artifact_name, flag.suspicious_pattern);
    }
    println!();
    Ok(())
}

// ── Scenario 5: sandboxed download authorization ─────────────────────────────

pub fn run_sandbox() -> ArtifexResult<()> {
    println!("Scenario 5 — Sandboxed download authorization");
    println!("---------------------------------------------");
    let rig = build_rig()?;

    ingest(&rig, &request("atlas-base", "1.0.0", fixtures::BASE_URL, "ana"))?;
    ingest(&rig, &request("atlas-chat", "1.0.0", fixtures::DERIVED_URL, "ana"))?;

    let open = rig.store.find_artifact("atlas-base", "1.0.0")?;
    let gated = rig.store.find_artifact("atlas-chat", "1.0.0")?;

    if let Some(open) = open {
        let decision = rig.registry.authorize_sensitive_download(open.id, "mallory")?;
        println!("  'atlas-base' for mallory: approved={} ({})", decision.approved, decision.reason);
    }
    if let Some(gated) = gated {
        // atlas-chat carries an owner-only policy script; 'ana' uploaded it.
        for downloader in ["ana", "mallory"] {
            let decision = rig.registry.authorize_sensitive_download(gated.id, downloader)?;
            println!(
                "  'atlas-chat' for {}: approved={} state={} ({})",
                downloader, decision.approved, decision.state, decision.reason
            );
        }
    }
    println!();
    Ok(())
}
