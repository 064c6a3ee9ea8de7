//! The ten metric calculators.
//!
//! Each one is a pure function over the fetched metadata snapshot — no
//! I/O, no shared state. Missing signal yields a low-but-defined score
//! (typically 0.1–0.2), never an error escape; a snapshot degraded all
//! the way down still produces a full result row for every metric.
//!
//! Raw scores only: weighting lives in the orchestrator.

use artifex_contracts::{error::ArtifexResult, metadata::ArtifactMetadata, metric::MetricKind};
use artifex_core::traits::MetricCalculator;
use artifex_license::{classify, LicenseCategory};

/// Reference ceiling for the size score: archives at or beyond 2 GiB
/// score 0.0.
const SIZE_CEILING_BYTES: u64 = 2 * 1024 * 1024 * 1024;

fn readme_lower(metadata: &ArtifactMetadata) -> Option<String> {
    metadata
        .readme
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_lowercase)
}

// ── License ───────────────────────────────────────────────────────────────────

/// Scores the declared license by category: permissive and weak copyleft
/// are fully compatible with downstream use (1.0), strong copyleft is
/// recognized but restrictive (0.5), missing or unrecognized is 0.0.
pub struct LicenseCalculator;

impl MetricCalculator for LicenseCalculator {
    fn kind(&self) -> MetricKind {
        MetricKind::License
    }

    fn compute(&self, metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
        let Some(raw) = metadata.license.as_deref().filter(|l| !l.trim().is_empty()) else {
            return Ok(0.0);
        };
        let score = match classify(raw).1 {
            LicenseCategory::Permissive | LicenseCategory::CopyleftWeak => 1.0,
            LicenseCategory::CopyleftStrong => 0.5,
            LicenseCategory::CreativeCommons { share_alike } => {
                if share_alike {
                    0.5
                } else {
                    0.8
                }
            }
            LicenseCategory::Proprietary | LicenseCategory::Unknown => 0.0,
        };
        Ok(score)
    }
}

// ── Size ──────────────────────────────────────────────────────────────────────

/// Linear decay against the 2 GiB ceiling. Unknown size (0 bytes) scores
/// a conservative 0.2 rather than a perfect 1.0.
pub struct SizeCalculator;

impl MetricCalculator for SizeCalculator {
    fn kind(&self) -> MetricKind {
        MetricKind::Size
    }

    fn compute(&self, metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
        if metadata.size_bytes == 0 {
            return Ok(0.2);
        }
        let fraction = metadata.size_bytes as f64 / SIZE_CEILING_BYTES as f64;
        Ok((1.0 - fraction).max(0.0))
    }
}

// ── Ramp up ───────────────────────────────────────────────────────────────────

/// README presence, length, and onboarding sections.
pub struct RampUpCalculator;

impl MetricCalculator for RampUpCalculator {
    fn kind(&self) -> MetricKind {
        MetricKind::RampUp
    }

    fn compute(&self, metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
        let Some(readme) = readme_lower(metadata) else {
            return Ok(0.1);
        };

        let mut score: f64 = match readme.len() {
            0..=499 => 0.2,
            500..=1999 => 0.4,
            _ => 0.5,
        };
        for section in ["install", "usage", "example", "quickstart"] {
            if readme.contains(section) {
                score += 0.125;
            }
        }
        Ok(score)
    }
}

// ── Bus factor ────────────────────────────────────────────────────────────────

/// One minus the top contributor's commit share: a project carried by a
/// single person scores 0.0, evenly spread maintainership approaches 1.0.
pub struct BusFactorCalculator;

impl MetricCalculator for BusFactorCalculator {
    fn kind(&self) -> MetricKind {
        MetricKind::BusFactor
    }

    fn compute(&self, metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
        let total: u64 = metadata.contributors.iter().map(|c| c.commits).sum();
        if total == 0 {
            return Ok(0.1);
        }
        let top = metadata
            .contributors
            .iter()
            .map(|c| c.commits)
            .max()
            .unwrap_or(0);
        Ok(1.0 - top as f64 / total as f64)
    }
}

// ── Performance claims ────────────────────────────────────────────────────────

/// Declared benchmark results: none is 0.1, each claim adds confidence up
/// to 1.0 at three or more.
pub struct PerformanceClaimsCalculator;

impl MetricCalculator for PerformanceClaimsCalculator {
    fn kind(&self) -> MetricKind {
        MetricKind::PerformanceClaims
    }

    fn compute(&self, metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
        let claims = metadata
            .benchmark_claims
            .iter()
            .filter(|c| !c.trim().is_empty())
            .count();
        Ok(match claims {
            0 => 0.1,
            n => (0.4 + 0.2 * n as f64).min(1.0),
        })
    }
}

// ── Dataset and code presence ─────────────────────────────────────────────────

/// Both links present → 1.0, one → 0.5, none → 0.0.
pub struct DatasetAndCodeCalculator;

impl MetricCalculator for DatasetAndCodeCalculator {
    fn kind(&self) -> MetricKind {
        MetricKind::DatasetAndCode
    }

    fn compute(&self, metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
        let dataset = metadata.dataset_url.as_deref().is_some_and(|u| !u.is_empty());
        let code = metadata.code_url.as_deref().is_some_and(|u| !u.is_empty());
        Ok(match (dataset, code) {
            (true, true) => 1.0,
            (true, false) | (false, true) => 0.5,
            (false, false) => 0.0,
        })
    }
}

// ── Dataset quality ───────────────────────────────────────────────────────────

/// A declared dataset link plus README documentation of its contents.
pub struct DatasetQualityCalculator;

impl MetricCalculator for DatasetQualityCalculator {
    fn kind(&self) -> MetricKind {
        MetricKind::DatasetQuality
    }

    fn compute(&self, metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
        if metadata.dataset_url.as_deref().is_none_or(str::is_empty) {
            return Ok(0.2);
        }
        let mut score: f64 = 0.5;
        if let Some(readme) = readme_lower(metadata) {
            for keyword in ["dataset", "split", "samples", "license"] {
                if readme.contains(keyword) {
                    score += 0.125;
                }
            }
        }
        Ok(score)
    }
}

// ── Code quality ──────────────────────────────────────────────────────────────

/// Manifest signals: tests, CI configuration, lint configuration.
pub struct CodeQualityCalculator;

impl MetricCalculator for CodeQualityCalculator {
    fn kind(&self) -> MetricKind {
        MetricKind::CodeQuality
    }

    fn compute(&self, metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
        if metadata.files.is_empty() {
            return Ok(0.2);
        }
        let files: Vec<String> = metadata.files.iter().map(|f| f.to_lowercase()).collect();

        let has_tests = files
            .iter()
            .any(|f| f.starts_with("tests/") || f.starts_with("test/") || f.contains("_test."));
        let has_ci = files.iter().any(|f| {
            f.starts_with(".github/workflows/") || f.contains(".gitlab-ci") || f.contains("ci.yml")
        });
        let has_lint = files.iter().any(|f| {
            f.ends_with("clippy.toml")
                || f.ends_with("rustfmt.toml")
                || f.ends_with(".flake8")
                || f.ends_with(".eslintrc")
                || f.ends_with("pyproject.toml")
                || f.ends_with("setup.cfg")
        });

        let mut score: f64 = 0.2;
        if has_tests {
            score += 0.3;
        }
        if has_ci {
            score += 0.25;
        }
        if has_lint {
            score += 0.25;
        }
        Ok(score)
    }
}

// ── Reproducibility ───────────────────────────────────────────────────────────

/// Evidence that a stranger could run this: install instructions, a code
/// example, and usage documentation in the README.
pub struct ReproducibilityCalculator;

impl MetricCalculator for ReproducibilityCalculator {
    fn kind(&self) -> MetricKind {
        MetricKind::Reproducibility
    }

    fn compute(&self, metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
        let Some(readme) = readme_lower(metadata) else {
            return Ok(0.1);
        };

        let mut score: f64 = 0.2;
        if readme.contains("install") || readme.contains("requirements") {
            score += 0.3;
        }
        if readme.contains("```") {
            score += 0.3;
        }
        if readme.contains("usage") || readme.contains("example") {
            score += 0.2;
        }
        Ok(score)
    }
}

// ── Reviewedness ──────────────────────────────────────────────────────────────

/// Fraction of commits that carried a second-reviewer signal. Missing
/// stats score a conservative 0.2.
pub struct ReviewednessCalculator;

impl MetricCalculator for ReviewednessCalculator {
    fn kind(&self) -> MetricKind {
        MetricKind::Reviewedness
    }

    fn compute(&self, metadata: &ArtifactMetadata) -> ArtifexResult<f64> {
        match metadata.review_stats {
            Some(stats) if stats.total_commits > 0 => {
                Ok(stats.reviewed_commits as f64 / stats.total_commits as f64)
            }
            _ => Ok(0.2),
        }
    }
}
