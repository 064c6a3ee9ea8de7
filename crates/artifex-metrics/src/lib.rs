//! # artifex-metrics
//!
//! The ten metric calculators for the ARTIFEX trust core.
//!
//! ## Overview
//!
//! Each calculator implements
//! [`MetricCalculator`](artifex_core::traits::MetricCalculator) as a pure
//! function over the fetched [`ArtifactMetadata`] snapshot. The
//! orchestrator runs them concurrently, clamps their output, and applies
//! the weight table; nothing in this crate touches the network or the
//! store.
//!
//! [`default_calculators`] is the production wiring: exactly one
//! calculator per gating metric kind. The tree-score metric is not in
//! this set — it is resolved from stored lineage by the registry, not
//! computed from a snapshot.
//!
//! [`ArtifactMetadata`]: artifex_contracts::metadata::ArtifactMetadata

pub mod calculators;

use std::sync::Arc;

use artifex_core::traits::MetricCalculator;

pub use calculators::{
    BusFactorCalculator, CodeQualityCalculator, DatasetAndCodeCalculator,
    DatasetQualityCalculator, LicenseCalculator, PerformanceClaimsCalculator, RampUpCalculator,
    ReproducibilityCalculator, ReviewednessCalculator, SizeCalculator,
};

/// The full production calculator set, one per snapshot-derived metric.
pub fn default_calculators() -> Vec<Arc<dyn MetricCalculator>> {
    vec![
        Arc::new(LicenseCalculator),
        Arc::new(CodeQualityCalculator),
        Arc::new(DatasetQualityCalculator),
        Arc::new(ReproducibilityCalculator),
        Arc::new(RampUpCalculator),
        Arc::new(BusFactorCalculator),
        Arc::new(ReviewednessCalculator),
        Arc::new(DatasetAndCodeCalculator),
        Arc::new(SizeCalculator),
        Arc::new(PerformanceClaimsCalculator),
    ]
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use artifex_contracts::metadata::{ArtifactMetadata, ContributorStat, ReviewStats};
    use artifex_contracts::metric::MetricKind;

    use super::*;

    /// A snapshot with every signal healthy.
    fn rich_metadata() -> ArtifactMetadata {
        let mut md = ArtifactMetadata::degraded("solid-model", "1.0.0");
        md.license = Some("Apache-2.0".into());
        md.readme = Some(format!(
            "# solid-model\n\n{}\n\n## Install\npip install solid-model\n\n\
             ## Usage\n```python\nimport solid_model\n```\n\n## Example\nSee above.\n\n\
             ## Dataset\nTrained on the open split; samples documented under a \
             permissive license.\n",
            "Long-form description. ".repeat(120)
        ));
        md.size_bytes = 50 * 1024 * 1024;
        md.files = vec![
            "src/model.py".into(),
            "tests/test_model.py".into(),
            ".github/workflows/ci.yml".into(),
            "pyproject.toml".into(),
        ];
        md.contributors = vec![
            ContributorStat { name: "ana".into(), commits: 40 },
            ContributorStat { name: "bo".into(), commits: 35 },
            ContributorStat { name: "cy".into(), commits: 25 },
        ];
        md.review_stats = Some(ReviewStats {
            total_commits: 100,
            reviewed_commits: 85,
        });
        md.dataset_url = Some("https://datasets.invalid/open-split".into());
        md.code_url = Some("https://git.invalid/solid-model".into());
        md.benchmark_claims = vec!["mmlu: 71.2".into(), "gsm8k: 64.0".into(), "arc: 80.1".into()];
        md
    }

    // ── 1. set composition ────────────────────────────────────────────────────

    #[test]
    fn default_set_covers_every_gating_kind_exactly_once() {
        let set = default_calculators();
        let kinds: HashSet<MetricKind> = set.iter().map(|c| c.kind()).collect();
        assert_eq!(kinds.len(), set.len(), "duplicate calculator kinds");
        for kind in MetricKind::ALL {
            if kind.gates_admission() {
                assert!(kinds.contains(&kind), "missing calculator for {kind:?}");
            }
        }
        assert!(!kinds.contains(&MetricKind::TreeScore));
    }

    // ── 2. degraded input never fails ─────────────────────────────────────────

    #[test]
    fn degraded_snapshot_scores_conservatively_without_errors() {
        let degraded = ArtifactMetadata::degraded("ghost", "0.0.1");
        for calc in default_calculators() {
            let score = calc
                .compute(&degraded)
                .unwrap_or_else(|e| panic!("{:?} failed on degraded input: {e}", calc.kind()));
            assert!(
                (0.0..=0.5).contains(&score),
                "{:?} gave non-conservative score {score} on degraded input",
                calc.kind()
            );
        }
    }

    // ── 3. healthy input scores well ──────────────────────────────────────────

    #[test]
    fn rich_snapshot_scores_at_least_half_on_every_metric() {
        let md = rich_metadata();
        for calc in default_calculators() {
            let score = calc.compute(&md).unwrap();
            assert!(
                score >= 0.5,
                "{:?} scored only {score} on a healthy snapshot",
                calc.kind()
            );
            assert!(score <= 1.0, "{:?} exceeded 1.0: {score}", calc.kind());
        }
    }

    // ── 4. license ────────────────────────────────────────────────────────────

    #[test]
    fn license_scores_by_category() {
        let mut md = ArtifactMetadata::degraded("m", "1");
        let calc = LicenseCalculator;

        md.license = Some("MIT".into());
        assert_eq!(calc.compute(&md).unwrap(), 1.0);

        md.license = Some("GPL-3.0".into());
        assert_eq!(calc.compute(&md).unwrap(), 0.5);

        md.license = Some("CC-BY-4.0".into());
        assert_eq!(calc.compute(&md).unwrap(), 0.8);

        md.license = Some("Proprietary".into());
        assert_eq!(calc.compute(&md).unwrap(), 0.0);

        md.license = None;
        assert_eq!(calc.compute(&md).unwrap(), 0.0);
    }

    // ── 5. size ───────────────────────────────────────────────────────────────

    #[test]
    fn size_decays_linearly_and_floors_at_zero() {
        let mut md = ArtifactMetadata::degraded("m", "1");
        let calc = SizeCalculator;

        md.size_bytes = 1024 * 1024 * 1024;
        let half = calc.compute(&md).unwrap();
        assert!((half - 0.5).abs() < 1e-9);

        md.size_bytes = 10 * 1024 * 1024 * 1024;
        assert_eq!(calc.compute(&md).unwrap(), 0.0);

        md.size_bytes = 0;
        assert_eq!(calc.compute(&md).unwrap(), 0.2);
    }

    // ── 6. bus factor ─────────────────────────────────────────────────────────

    #[test]
    fn bus_factor_penalizes_concentration() {
        let mut md = ArtifactMetadata::degraded("m", "1");
        let calc = BusFactorCalculator;

        md.contributors = vec![ContributorStat { name: "solo".into(), commits: 100 }];
        assert_eq!(calc.compute(&md).unwrap(), 0.0);

        md.contributors = vec![
            ContributorStat { name: "a".into(), commits: 50 },
            ContributorStat { name: "b".into(), commits: 50 },
        ];
        assert!((calc.compute(&md).unwrap() - 0.5).abs() < 1e-9);
    }

    // ── 7. reviewedness ───────────────────────────────────────────────────────

    #[test]
    fn reviewedness_is_the_reviewed_fraction() {
        let mut md = ArtifactMetadata::degraded("m", "1");
        let calc = ReviewednessCalculator;

        md.review_stats = Some(ReviewStats { total_commits: 200, reviewed_commits: 150 });
        assert!((calc.compute(&md).unwrap() - 0.75).abs() < 1e-9);

        md.review_stats = Some(ReviewStats { total_commits: 0, reviewed_commits: 0 });
        assert_eq!(calc.compute(&md).unwrap(), 0.2);
    }

    // ── 8. dataset and code ───────────────────────────────────────────────────

    #[test]
    fn dataset_and_code_counts_present_links() {
        let mut md = ArtifactMetadata::degraded("m", "1");
        let calc = DatasetAndCodeCalculator;

        assert_eq!(calc.compute(&md).unwrap(), 0.0);

        md.code_url = Some("https://git.invalid/m".into());
        assert_eq!(calc.compute(&md).unwrap(), 0.5);

        md.dataset_url = Some("https://datasets.invalid/m".into());
        assert_eq!(calc.compute(&md).unwrap(), 1.0);
    }

    // ── 9. performance claims ─────────────────────────────────────────────────

    #[test]
    fn performance_claims_ignore_blank_entries() {
        let mut md = ArtifactMetadata::degraded("m", "1");
        let calc = PerformanceClaimsCalculator;

        md.benchmark_claims = vec!["   ".into(), "".into()];
        assert_eq!(calc.compute(&md).unwrap(), 0.1);

        md.benchmark_claims = vec!["mmlu: 71.2".into()];
        assert!((calc.compute(&md).unwrap() - 0.6).abs() < 1e-9);

        md.benchmark_claims =
            vec!["a: 1".into(), "b: 2".into(), "c: 3".into(), "d: 4".into()];
        assert_eq!(calc.compute(&md).unwrap(), 1.0);
    }

    // ── 10. code quality ──────────────────────────────────────────────────────

    #[test]
    fn code_quality_rewards_tests_ci_and_lint_config() {
        let mut md = ArtifactMetadata::degraded("m", "1");
        let calc = CodeQualityCalculator;

        md.files = vec!["src/main.rs".into()];
        assert!((calc.compute(&md).unwrap() - 0.2).abs() < 1e-9);

        md.files.push("tests/smoke.rs".into());
        md.files.push(".github/workflows/ci.yml".into());
        md.files.push("rustfmt.toml".into());
        assert!((calc.compute(&md).unwrap() - 1.0).abs() < 1e-9);
    }
}
