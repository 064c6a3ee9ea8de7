//! # artifex-confusion
//!
//! Name-confusion detection for the ARTIFEX trust core.
//!
//! ## Overview
//!
//! [`ConfusionDetector`] implements the
//! [`ConfusionAuditor`](artifex_core::traits::ConfusionAuditor) trait:
//! Levenshtein screening of a newly registered name against both the
//! store's existing names (`Medium`) and a built-in list of well-known
//! ecosystem project names (`High`).

pub mod detector;

pub use detector::ConfusionDetector;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use artifex_contracts::confusion::Severity;
    use artifex_core::traits::ConfusionAuditor;

    use crate::ConfusionDetector;

    fn audit(name: &str, existing: &[&str]) -> Vec<artifex_contracts::confusion::ConfusionFlag> {
        let existing: Vec<String> = existing.iter().map(|s| s.to_string()).collect();
        ConfusionDetector::new().audit(name, &existing)
    }

    // ── Typosquats of well-known names ────────────────────────────────────────

    #[test]
    fn capital_i_for_l_typosquat_is_flagged_high() {
        let flags = audit("tensorfIow", &[]);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].severity, Severity::High);
        assert_eq!(
            flags[0].suspicious_pattern,
            "possible typosquatting of 'tensorflow'"
        );
    }

    #[test]
    fn one_character_drop_from_popular_name_is_flagged() {
        let flags = audit("pytorh", &[]);
        assert!(flags
            .iter()
            .any(|f| f.suspicious_pattern.contains("'pytorch'") && f.severity == Severity::High));
    }

    #[test]
    fn exact_popular_name_is_not_a_typosquat() {
        assert!(audit("tensorflow", &[]).is_empty());
    }

    // ── Similarity to existing artifacts ──────────────────────────────────────

    #[test]
    fn near_miss_of_existing_name_is_flagged_medium() {
        let flags = audit("my-modell", &["my-model"]);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].severity, Severity::Medium);
        assert_eq!(
            flags[0].suspicious_pattern,
            "similar to existing artifact 'my-model'"
        );
        assert_eq!(flags[0].artifact_name, "my-modell");
    }

    #[test]
    fn comparison_is_case_insensitive() {
        let flags = audit("My-Model", &["my-modell"]);
        assert_eq!(flags.len(), 1);
    }

    #[test]
    fn identical_existing_name_is_not_flagged() {
        assert!(audit("my-model", &["my-model"]).is_empty());
    }

    // ── Guard rails ───────────────────────────────────────────────────────────

    #[test]
    fn distant_names_are_not_flagged() {
        assert!(audit("weather-forecaster", &["image-classifier"]).is_empty());
    }

    #[test]
    fn short_names_are_exempt() {
        // "ab" vs "ad" is distance 1 but far too short to mean anything.
        assert!(audit("ab", &["ad"]).is_empty());
    }

    #[test]
    fn very_different_lengths_are_not_compared() {
        assert!(audit("tensorflow-extended-serving", &["tensorflow-e"]).is_empty());
    }

    #[test]
    fn one_candidate_can_raise_multiple_flags() {
        let flags = audit("tensorfIow", &["tensorflow2"]);
        assert_eq!(flags.len(), 2);
        assert!(flags.iter().any(|f| f.severity == Severity::High));
        assert!(flags.iter().any(|f| f.severity == Severity::Medium));
    }
}
