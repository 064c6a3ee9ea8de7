//! ARTIFEX Trust Evaluation Core — Demo CLI
//!
//! Runs one or all of the five registry walkthroughs. Each scenario uses
//! real ARTIFEX components (metric orchestrator, lineage resolver, license
//! checker, confusion detector, policy sandbox) wired over the in-memory
//! store with fixture metadata.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- ingestion
//!   cargo run -p demo -- lineage
//!   cargo run -p demo -- license
//!   cargo run -p demo -- confusion
//!   cargo run -p demo -- sandbox

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod fixtures;
mod scenarios;

// ── CLI definition ────────────────────────────────────────────────────────────

/// ARTIFEX — artifact trust evaluation demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "ARTIFEX trust evaluation core demo",
    long_about = "Runs ARTIFEX demo scenarios showing metric scoring and admission\n\
                  gating, lineage tree scores, license compatibility, name-confusion\n\
                  detection, and sandboxed download authorization."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all five scenarios in sequence.
    RunAll,
    /// Scenario 1: metric evaluation and admission gating.
    Ingestion,
    /// Scenario 2: cycle-safe lineage tree score.
    Lineage,
    /// Scenario 3: license compatibility verdicts.
    License,
    /// Scenario 4: typosquat and name-confusion audit.
    Confusion,
    /// Scenario 5: sandboxed access-policy execution.
    Sandbox,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging. Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::Ingestion => scenarios::run_ingestion(),
        Command::Lineage => scenarios::run_lineage(),
        Command::License => scenarios::run_license(),
        Command::Confusion => scenarios::run_confusion(),
        Command::Sandbox => scenarios::run_sandbox(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_all() -> artifex_contracts::error::ArtifexResult<()> {
    scenarios::run_ingestion()?;
    scenarios::run_lineage()?;
    scenarios::run_license()?;
    scenarios::run_confusion()?;
    scenarios::run_sandbox()?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("ARTIFEX — Artifact Trust Evaluation Core");
    println!("========================================");
    println!();
    println!("Ingestion pipeline per submission:");
    println!("  [1] Metadata fetch (failure degrades, never errors)");
    println!("  [2] Duplicate (name, version) check");
    println!("  [3] Lineage tree score from stored ancestors");
    println!("  [4] Ten metric calculators run concurrently, isolated, clamped");
    println!("  [5] Admission gate: every gating metric must clear the threshold");
    println!("  [6] Atomic persist of artifact + metrics + lineage edges");
    println!("  [7] Background name-confusion audit (never blocks ingestion)");
    println!();
}
