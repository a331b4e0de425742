//! Locale code type: a validated member of a [`LocaleRegistry`].
//!
//! A `LocaleCode` can only be obtained from a registry, so resolved state
//! never carries an unsupported code.

use crate::error::LocaleError;
use crate::i18n::LocaleRegistry;
use serde::{Serialize, Serializer};
use std::fmt;

/// A supported locale code (e.g., "en", "zh").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocaleCode {
    code: &'static str,
}

impl LocaleCode {
    /// Wrap a code the registry has already vetted.
    pub(crate) const fn new_unchecked(code: &'static str) -> Self {
        Self { code }
    }

    /// Create a LocaleCode from an exact code using the global registry.
    ///
    /// # Arguments
    /// * `code` - The two-letter locale code (e.g., "en", "fr")
    ///
    /// # Returns
    /// * `Ok(LocaleCode)` if the code is known and enabled
    /// * `Err` if the code is unknown or disabled
    ///
    /// # Example
    /// ```ignore
    /// let french = LocaleCode::from_code("fr")?;
    /// ```
    pub fn from_code(code: &str) -> Result<LocaleCode, LocaleError> {
        Self::from_code_in(LocaleRegistry::get(), code)
    }

    /// Same as [`LocaleCode::from_code`] against an explicit registry.
    ///
    /// # Returns
    /// * `Ok(LocaleCode)` if `code` names an enabled locale in `registry`
    /// * `Err(LocaleError::DisabledLocale)` if the locale exists but is disabled
    /// * `Err(LocaleError::UnknownLocale)` if the code is not in the registry
    pub fn from_code_in(registry: &LocaleRegistry, code: &str) -> Result<LocaleCode, LocaleError> {
        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(LocaleCode::new_unchecked(config.code)),
            Some(_) => Err(LocaleError::DisabledLocale(code.to_string())),
            None => Err(LocaleError::UnknownLocale(code.to_string())),
        }
    }

    /// Lenient parse for case-insensitive sources such as `Accept-Language`.
    ///
    /// Surrounding whitespace is trimmed and the value is lower-cased before
    /// the registry lookup, so `" FR "` resolves to `fr`.
    ///
    /// # Arguments
    /// * `registry` - Registry the code must belong to
    /// * `raw` - Untrusted input, e.g. a language subtag
    ///
    /// # Returns
    /// `Some(LocaleCode)` for an enabled locale, `None` for anything else (including blank input).
    pub fn parse(registry: &LocaleRegistry, raw: &str) -> Option<LocaleCode> {
        let normalized = raw.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return None;
        }
        registry.lookup(&normalized)
    }

    /// The locale code as a static string.
    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl AsRef<str> for LocaleCode {
    fn as_ref(&self) -> &str {
        self.code
    }
}

impl Serialize for LocaleCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LocaleConfig;

    #[test]
    fn test_from_code_supported() {
        let locale = LocaleCode::from_code("zh").expect("Should succeed");
        assert_eq!(locale.code(), "zh");
    }

    #[test]
    fn test_from_code_unknown() {
        let result = LocaleCode::from_code("xx");
        assert!(result.unwrap_err().to_string().contains("Unknown"));
    }

    #[test]
    fn test_from_code_is_exact() {
        assert!(LocaleCode::from_code("FR").is_err());
        assert!(LocaleCode::from_code("").is_err());
    }

    #[test]
    fn test_from_code_disabled() {
        let registry = LocaleRegistry::new(vec![
            LocaleConfig {
                code: "en",
                name: "English",
                native_name: "English",
                is_default: true,
                enabled: true,
            },
            LocaleConfig {
                code: "fr",
                name: "French",
                native_name: "Français",
                is_default: false,
                enabled: false,
            },
        ])
        .unwrap();
        let result = LocaleCode::from_code_in(&registry, "fr");
        assert!(matches!(result, Err(LocaleError::DisabledLocale(_))));
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let registry = LocaleRegistry::get();
        assert_eq!(LocaleCode::parse(registry, " FR ").unwrap().code(), "fr");
        assert_eq!(LocaleCode::parse(registry, "De").unwrap().code(), "de");
    }

    #[test]
    fn test_parse_rejects_unsupported() {
        let registry = LocaleRegistry::get();
        assert!(LocaleCode::parse(registry, "xx").is_none());
        assert!(LocaleCode::parse(registry, "   ").is_none());
        assert!(LocaleCode::parse(registry, "fr-FR").is_none());
    }

    #[test]
    fn test_display_and_serialize() {
        let locale = LocaleCode::from_code("ko").unwrap();
        assert_eq!(locale.to_string(), "ko");
        assert_eq!(serde_json::to_string(&locale).unwrap(), "\"ko\"");
    }

    #[test]
    fn test_locale_copy_and_eq() {
        let a = LocaleCode::from_code("es").unwrap();
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, LocaleCode::from_code("en").unwrap());
    }
}
