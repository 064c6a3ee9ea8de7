//! The metric orchestrator: concurrent fan-out, failure isolation, and the
//! admission gate.
//!
//! The orchestrator enforces the ARTIFEX scoring model:
//!
//!   snapshot → [all calculators, concurrently] → clamp → weight → gate
//!
//! Failure isolation is absolute: a calculator that returns an error,
//! panics, or outruns its deadline yields a 0.0-score result with a
//! recorded reason — it never aborts the other calculators and never
//! escapes to the caller. Weighting lives only here; calculators return
//! raw unweighted scores.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use artifex_contracts::{
    error::ArtifexError,
    evaluation::{EvaluationResult, FailedMetric},
    metadata::ArtifactMetadata,
    metric::{MetricKind, MetricResult},
    weights::WeightTable,
};

use crate::traits::MetricCalculator;

/// Cooperative cancellation flag shared with the caller.
///
/// When set, the orchestrator stops waiting for outstanding calculators
/// and records them as cancelled; already-spawned workers are abandoned.
pub type CancelFlag = Arc<AtomicBool>;

/// Poll interval for the collection loop, so cancellation is responsive
/// without busy-waiting.
const COLLECT_POLL: Duration = Duration::from_millis(25);

/// Runs the registered calculators concurrently against one metadata
/// snapshot and combines the results.
///
/// Construct once and reuse across ingestions; `evaluate` takes `&self`
/// and holds no mutable state between calls.
pub struct MetricOrchestrator {
    calculators: Vec<Arc<dyn MetricCalculator>>,
    weights: WeightTable,
    threshold: f64,
    calculator_timeout: Duration,
}

impl MetricOrchestrator {
    pub fn new(
        calculators: Vec<Arc<dyn MetricCalculator>>,
        weights: WeightTable,
        threshold: f64,
        calculator_timeout: Duration,
    ) -> Self {
        Self {
            calculators,
            weights,
            threshold,
            calculator_timeout,
        }
    }

    /// Score one metadata snapshot.
    ///
    /// Every registered calculator runs on its own thread against the same
    /// snapshot. Results are collected until the per-calculator deadline;
    /// missing results become 0.0-score timeouts. The caller-provided
    /// `tree_score` (derived from lineage, not a calculator) is folded in
    /// as a `TreeScore` result with zero latency.
    ///
    /// The returned metric list is ordered by `MetricKind::ALL`, so output
    /// is deterministic for fixed inputs.
    pub fn evaluate(
        &self,
        metadata: &ArtifactMetadata,
        tree_score: f64,
        cancel: &CancelFlag,
    ) -> EvaluationResult {
        let snapshot = Arc::new(metadata.clone());
        let (tx, rx) = mpsc::channel::<MetricResult>();

        debug!(
            name = %snapshot.name,
            version = %snapshot.version,
            calculators = self.calculators.len(),
            "starting concurrent metric evaluation"
        );

        let mut expected: Vec<MetricKind> = Vec::with_capacity(self.calculators.len());
        for calculator in &self.calculators {
            let kind = calculator.kind();
            expected.push(kind);

            let calculator = Arc::clone(calculator);
            let snapshot = Arc::clone(&snapshot);
            let tx = tx.clone();
            thread::spawn(move || {
                let start = Instant::now();
                let outcome = catch_unwind(AssertUnwindSafe(|| calculator.compute(&snapshot)));
                let latency_ms = start.elapsed().as_millis() as u64;

                let result = match outcome {
                    Ok(Ok(score)) => MetricResult::ok(kind, score, latency_ms),
                    Ok(Err(e)) => MetricResult::failed(kind, latency_ms, e.to_string()),
                    Err(_) => MetricResult::failed(kind, latency_ms, "calculator panicked"),
                };
                // Send fails only when collection has already given up on
                // this calculator; the result is then discarded.
                let _ = tx.send(result);
            });
        }
        drop(tx);

        let mut collected = self.collect(rx, &expected, cancel);

        // Fold in the lineage-derived tree score.
        collected.insert(
            MetricKind::TreeScore,
            MetricResult::ok(MetricKind::TreeScore, tree_score, 0),
        );

        // Deterministic order: the canonical kind order, skipping kinds no
        // calculator was registered for.
        let metrics: Vec<MetricResult> = MetricKind::ALL
            .iter()
            .filter_map(|kind| collected.remove(kind))
            .collect();

        let net_score = self.weights.net_score(&metrics);
        let admitted = self.failing_metrics(&metrics).is_empty();

        debug!(
            name = %snapshot.name,
            version = %snapshot.version,
            net_score,
            admitted,
            "metric evaluation complete"
        );

        EvaluationResult {
            name: snapshot.name.clone(),
            version: snapshot.version.clone(),
            metrics,
            net_score,
            admitted,
        }
    }

    /// Gating metrics below the admission threshold, in canonical order.
    ///
    /// Empty means admitted. Non-gating kinds (`TreeScore`) never appear.
    pub fn failing_metrics(&self, metrics: &[MetricResult]) -> Vec<FailedMetric> {
        metrics
            .iter()
            .filter(|m| m.kind.gates_admission() && m.score < self.threshold)
            .map(|m| FailedMetric {
                kind: m.kind,
                score: m.score,
                threshold: self.threshold,
            })
            .collect()
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Wait for every expected result until the deadline, polling the
    /// cancel flag. Missing results are synthesized as timeout/cancel
    /// failures.
    fn collect(
        &self,
        rx: mpsc::Receiver<MetricResult>,
        expected: &[MetricKind],
        cancel: &CancelFlag,
    ) -> HashMap<MetricKind, MetricResult> {
        let deadline = Instant::now() + self.calculator_timeout;
        let mut collected: HashMap<MetricKind, MetricResult> = HashMap::new();
        let mut cancelled = false;

        while collected.len() < expected.len() {
            if cancel.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let wait = COLLECT_POLL.min(deadline - now);
            match rx.recv_timeout(wait) {
                Ok(result) => {
                    collected.insert(result.kind, result);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }

        // Synthesize failures for whatever never arrived.
        for &kind in expected {
            if collected.contains_key(&kind) {
                continue;
            }
            let timeout_ms = self.calculator_timeout.as_millis() as u64;
            let reason = if cancelled {
                "cancelled before completion".to_string()
            } else {
                let err = ArtifexError::MetricTimeout {
                    metric: kind.display_name().to_string(),
                    timeout_ms,
                };
                err.to_string()
            };
            warn!(metric = %kind, cancelled, "calculator did not complete, scoring 0.0");
            collected.insert(kind, MetricResult::failed(kind, timeout_ms, reason));
        }

        collected
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::Duration;

    use artifex_contracts::{
        error::{ArtifexError, ArtifexResult},
        metadata::ArtifactMetadata,
        metric::MetricKind,
        weights::WeightTable,
    };

    use crate::traits::MetricCalculator;

    use super::{CancelFlag, MetricOrchestrator};

    // ── Mock calculators ─────────────────────────────────────────────────────

    /// Returns a fixed score immediately.
    struct FixedCalc {
        kind: MetricKind,
        score: f64,
    }

    impl MetricCalculator for FixedCalc {
        fn kind(&self) -> MetricKind {
            self.kind
        }
        fn compute(&self, _metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
            Ok(self.score)
        }
    }

    /// Always fails.
    struct ErrCalc {
        kind: MetricKind,
    }

    impl MetricCalculator for ErrCalc {
        fn kind(&self) -> MetricKind {
            self.kind
        }
        fn compute(&self, _metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
            Err(ArtifexError::MetricFailed {
                metric: self.kind.display_name().to_string(),
                reason: "upstream stats missing".to_string(),
            })
        }
    }

    /// Panics mid-computation.
    struct PanicCalc {
        kind: MetricKind,
    }

    impl MetricCalculator for PanicCalc {
        fn kind(&self) -> MetricKind {
            self.kind
        }
        fn compute(&self, _metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
            panic!("deliberate test panic");
        }
    }

    /// Sleeps longer than any test deadline.
    struct HangingCalc {
        kind: MetricKind,
    }

    impl MetricCalculator for HangingCalc {
        fn kind(&self) -> MetricKind {
            self.kind
        }
        fn compute(&self, _metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
            std::thread::sleep(Duration::from_secs(10));
            Ok(1.0)
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn meta() -> ArtifactMetadata {
        ArtifactMetadata::degraded("test-model", "1.0.0")
    }

    fn fresh_cancel() -> CancelFlag {
        Arc::new(AtomicBool::new(false))
    }

    fn orchestrator(
        calculators: Vec<Arc<dyn MetricCalculator>>,
        timeout: Duration,
    ) -> MetricOrchestrator {
        MetricOrchestrator::new(calculators, WeightTable::default(), 0.5, timeout)
    }

    fn all_fixed(score: f64) -> Vec<Arc<dyn MetricCalculator>> {
        MetricKind::ALL
            .iter()
            .filter(|k| k.gates_admission())
            .map(|&kind| Arc::new(FixedCalc { kind, score }) as Arc<dyn MetricCalculator>)
            .collect()
    }

    // ── 1. admission when everything clears the threshold ───────────────────

    #[test]
    fn admits_when_all_metrics_clear_threshold() {
        let orch = orchestrator(all_fixed(0.8), Duration::from_secs(5));
        let result = orch.evaluate(&meta(), 0.5, &fresh_cancel());

        assert!(result.admitted);
        assert_eq!(result.metrics.len(), MetricKind::ALL.len());
        assert!(orch.failing_metrics(&result.metrics).is_empty());
    }

    // ── 2. one failing metric blocks admission and is named ──────────────────

    #[test]
    fn one_low_metric_blocks_admission() {
        let mut calcs = all_fixed(0.8);
        calcs.retain(|c| c.kind() != MetricKind::BusFactor);
        calcs.push(Arc::new(FixedCalc {
            kind: MetricKind::BusFactor,
            score: 0.3,
        }));

        let orch = orchestrator(calcs, Duration::from_secs(5));
        let result = orch.evaluate(&meta(), 0.5, &fresh_cancel());

        assert!(!result.admitted);
        let failing = orch.failing_metrics(&result.metrics);
        assert_eq!(failing.len(), 1);
        assert_eq!(failing[0].kind, MetricKind::BusFactor);
        assert_eq!(failing[0].to_string(), "Bus Factor (0.30 < 0.50)");
    }

    // ── 3. failure isolation ─────────────────────────────────────────────────

    #[test]
    fn erroring_calculator_scores_zero_without_aborting_others() {
        let mut calcs = all_fixed(0.9);
        calcs.retain(|c| c.kind() != MetricKind::RampUp);
        calcs.push(Arc::new(ErrCalc {
            kind: MetricKind::RampUp,
        }));

        let orch = orchestrator(calcs, Duration::from_secs(5));
        let result = orch.evaluate(&meta(), 0.5, &fresh_cancel());

        let ramp_up = result.metric(MetricKind::RampUp).unwrap();
        assert_eq!(ramp_up.score, 0.0);
        assert!(ramp_up.failure.as_deref().unwrap().contains("upstream stats missing"));

        // Every other calculator still delivered its score.
        let license = result.metric(MetricKind::License).unwrap();
        assert_eq!(license.score, 0.9);
    }

    #[test]
    fn panicking_calculator_is_contained() {
        let mut calcs = all_fixed(0.9);
        calcs.retain(|c| c.kind() != MetricKind::CodeQuality);
        calcs.push(Arc::new(PanicCalc {
            kind: MetricKind::CodeQuality,
        }));

        let orch = orchestrator(calcs, Duration::from_secs(5));
        let result = orch.evaluate(&meta(), 0.5, &fresh_cancel());

        let code_quality = result.metric(MetricKind::CodeQuality).unwrap();
        assert_eq!(code_quality.score, 0.0);
        assert_eq!(code_quality.failure.as_deref(), Some("calculator panicked"));
    }

    // ── 4. timeout converts a hang into a scored failure ─────────────────────

    #[test]
    fn hanging_calculator_times_out_at_zero() {
        let mut calcs = all_fixed(0.9);
        calcs.retain(|c| c.kind() != MetricKind::Size);
        calcs.push(Arc::new(HangingCalc {
            kind: MetricKind::Size,
        }));

        let orch = orchestrator(calcs, Duration::from_millis(150));
        let result = orch.evaluate(&meta(), 0.5, &fresh_cancel());

        let size = result.metric(MetricKind::Size).unwrap();
        assert_eq!(size.score, 0.0);
        assert!(size.failure.as_deref().unwrap().contains("timed out"));

        // The hang blocked nobody else.
        assert_eq!(result.metric(MetricKind::License).unwrap().score, 0.9);
    }

    // ── 5. cancellation ──────────────────────────────────────────────────────

    #[test]
    fn pre_cancelled_request_records_cancellation() {
        let orch = orchestrator(
            vec![Arc::new(HangingCalc {
                kind: MetricKind::License,
            })],
            Duration::from_secs(5),
        );

        let cancel = fresh_cancel();
        cancel.store(true, std::sync::atomic::Ordering::Relaxed);
        let result = orch.evaluate(&meta(), 0.5, &cancel);

        let license = result.metric(MetricKind::License).unwrap();
        assert_eq!(license.score, 0.0);
        assert!(license.failure.as_deref().unwrap().contains("cancelled"));
    }

    // ── 6. clamping at the orchestrator boundary ─────────────────────────────

    #[test]
    fn out_of_range_scores_are_clamped() {
        let orch = orchestrator(
            vec![
                Arc::new(FixedCalc {
                    kind: MetricKind::License,
                    score: 7.5,
                }),
                Arc::new(FixedCalc {
                    kind: MetricKind::Size,
                    score: -2.0,
                }),
            ],
            Duration::from_secs(5),
        );
        let result = orch.evaluate(&meta(), 0.5, &fresh_cancel());

        assert_eq!(result.metric(MetricKind::License).unwrap().score, 1.0);
        assert_eq!(result.metric(MetricKind::Size).unwrap().score, 0.0);
    }

    // ── 7. tree score folding and determinism ────────────────────────────────

    #[test]
    fn tree_score_is_folded_in_without_gating() {
        // Tree score far below threshold must not block admission.
        let orch = orchestrator(all_fixed(0.8), Duration::from_secs(5));
        let result = orch.evaluate(&meta(), 0.1, &fresh_cancel());

        assert!(result.admitted);
        let tree = result.metric(MetricKind::TreeScore).unwrap();
        assert_eq!(tree.score, 0.1);
        assert_eq!(tree.latency_ms, 0);
    }

    #[test]
    fn metric_order_is_canonical() {
        let orch = orchestrator(all_fixed(0.8), Duration::from_secs(5));
        let result = orch.evaluate(&meta(), 0.5, &fresh_cancel());

        let kinds: Vec<MetricKind> = result.metrics.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, MetricKind::ALL.to_vec());
    }

    #[test]
    fn net_score_is_reproducible_from_results() {
        let orch = orchestrator(all_fixed(0.8), Duration::from_secs(5));
        let result = orch.evaluate(&meta(), 0.5, &fresh_cancel());

        let recomputed = orch.weights().net_score(&result.metrics);
        assert_eq!(result.net_score.to_bits(), recomputed.to_bits());
    }
}
