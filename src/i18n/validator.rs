//! Translation bundle validation.
//!
//! Lookups never fall back across locales, so a key missing from a locale's
//! bundle shows up as the raw key in that locale. This validator compares each
//! bundle with the default locale's bundle to surface those gaps at startup.

use crate::i18n::TranslationTree;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Keys or placeholders that will render incorrectly
    pub errors: Vec<String>,

    /// Harmless differences (keys only the candidate has)
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for bundle consistency.
pub struct BundleValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl BundleValidator {
    /// Compare `candidate` against `reference` (the default locale's bundle).
    ///
    /// - Missing keys are errors.
    /// - Differing `{placeholder}` sets on a shared key are errors.
    /// - Keys only present in `candidate` are warnings.
    pub fn validate(reference: &TranslationTree, candidate: &TranslationTree) -> ValidationReport {
        let mut report = ValidationReport::new();

        let reference_keys: BTreeSet<String> = reference.leaf_keys().into_iter().collect();
        let candidate_keys: BTreeSet<String> = candidate.leaf_keys().into_iter().collect();

        for key in reference_keys.difference(&candidate_keys) {
            report.errors.push(format!("Missing key: {}", key));
        }

        for key in candidate_keys.difference(&reference_keys) {
            report.warnings.push(format!("Extra key: {}", key));
        }

        for key in reference_keys.intersection(&candidate_keys) {
            let (Some(expected), Some(actual)) = (reference.get(key), candidate.get(key)) else {
                continue;
            };
            let expected = Self::extract_placeholders(expected);
            let actual = Self::extract_placeholders(actual);
            if expected != actual {
                report.errors.push(format!(
                    "Placeholder mismatch in {}: expected {:?}, found {:?}",
                    key, expected, actual
                ));
            }
        }

        report
    }

    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX
            .get_or_init(|| Regex::new(r"\{(\w+)\}").expect("Invalid placeholder regex"));
        regex
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .collect()
    }
}
