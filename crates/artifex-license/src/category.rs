//! License normalization and categorization.
//!
//! Inputs are noisy: SPDX identifiers, marketing names ("Apache 2"),
//! legacy spellings ("GPLv3"), or free text. `normalize` canonicalizes
//! the spelling; `classify` maps the canonical form into one of six
//! categories. Anything unrecognized is `Unknown` — downstream the
//! checker fails closed on that, never open.

/// The six compatibility-relevant license categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseCategory {
    Permissive,
    CopyleftWeak,
    CopyleftStrong,
    CreativeCommons {
        /// True for share-alike variants (CC-BY-SA and friends).
        share_alike: bool,
    },
    Proprietary,
    Unknown,
}

/// Canonicalize a raw license string.
///
/// Case-folds, collapses whitespace and underscores to hyphens, strips a
/// trailing "license" word, then applies the alias map. The result is an
/// SPDX-like lowercase identifier when the input is recognizable, or the
/// cleaned-up input verbatim when it is not.
pub fn normalize(raw: &str) -> String {
    let mut cleaned = raw
        .trim()
        .to_lowercase()
        .replace(['_', ' '], "-")
        .replace("--", "-");
    for suffix in ["-license", "-licence"] {
        if let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped.to_string();
        }
    }

    match cleaned.as_str() {
        "apache" | "apache-2" | "apache2" | "apache-2.0" | "asl-2.0" | "apache-license-2.0" => {
            "apache-2.0"
        }
        "mit" | "expat" => "mit",
        "bsd" | "bsd-3" | "bsd3" | "bsd-3-clause" | "new-bsd" => "bsd-3-clause",
        "bsd-2" | "bsd2" | "bsd-2-clause" | "simplified-bsd" => "bsd-2-clause",
        "isc" => "isc",
        "zlib" => "zlib",
        "unlicense" | "the-unlicense" => "unlicense",
        "cc0" | "cc0-1.0" | "cc-0" => "cc0-1.0",
        "mpl" | "mpl-2" | "mpl-2.0" | "mozilla-2.0" => "mpl-2.0",
        "epl" | "epl-2.0" => "epl-2.0",
        "lgpl" | "lgpl-2.1" | "lgplv2.1" | "lgpl-2.1-only" | "lgpl-2.1-or-later" => "lgpl-2.1",
        "lgpl-3" | "lgpl-3.0" | "lgplv3" | "lgpl-3.0-only" | "lgpl-3.0-or-later" => "lgpl-3.0",
        "gpl-2" | "gpl-2.0" | "gplv2" | "gpl-2.0-only" | "gpl-2.0-or-later" => "gpl-2.0",
        "gpl" | "gpl-3" | "gpl-3.0" | "gplv3" | "gpl-3.0-only" | "gpl-3.0-or-later" => "gpl-3.0",
        "agpl" | "agpl-3" | "agpl-3.0" | "agplv3" | "agpl-3.0-only" => "agpl-3.0",
        "cc-by" | "cc-by-4.0" => "cc-by-4.0",
        "cc-by-sa" | "cc-by-sa-4.0" => "cc-by-sa-4.0",
        "cc-by-nc" | "cc-by-nc-4.0" => "cc-by-nc-4.0",
        "cc-by-nc-sa" | "cc-by-nc-sa-4.0" => "cc-by-nc-sa-4.0",
        "proprietary" | "commercial" | "all-rights-reserved" | "closed" => "proprietary",
        other => other,
    }
    .to_string()
}

/// Classify a raw license string into its category.
///
/// Returns the normalized identifier alongside the category so callers
/// can build precise explanations.
pub fn classify(raw: &str) -> (String, LicenseCategory) {
    let normalized = normalize(raw);
    let category = match normalized.as_str() {
        "mit" | "apache-2.0" | "bsd-2-clause" | "bsd-3-clause" | "isc" | "zlib" | "unlicense"
        | "cc0-1.0" => LicenseCategory::Permissive,
        "lgpl-2.1" | "lgpl-3.0" | "mpl-2.0" | "epl-2.0" => LicenseCategory::CopyleftWeak,
        "gpl-2.0" | "gpl-3.0" | "agpl-3.0" => LicenseCategory::CopyleftStrong,
        "proprietary" => LicenseCategory::Proprietary,
        other if other.starts_with("cc-by") => LicenseCategory::CreativeCommons {
            share_alike: other.contains("-sa"),
        },
        _ => LicenseCategory::Unknown,
    };
    (normalized, category)
}
