//! Locale registry: Single source of truth for all supported locales.
//!
//! The process-wide registry is a singleton initialised once through `OnceLock`.
//! Custom registries can be built with [`LocaleRegistry::new`], which validates
//! that exactly one enabled default exists.

use crate::error::LocaleError;
use crate::i18n::LocaleCode;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Configuration for a supported locale.
#[derive(Debug, Clone, Serialize)]
pub struct LocaleConfig {
    /// Two-letter lowercase locale code (e.g., "en", "zh")
    pub code: &'static str,

    /// English name of the locale (e.g., "English", "Chinese")
    pub name: &'static str,

    /// Native name shown in the language switcher (e.g., "中文")
    pub native_name: &'static str,

    /// Whether this is the fallback locale (exactly one must be true)
    pub is_default: bool,

    /// Whether this locale is accepted from signals
    pub enabled: bool,
}

/// Registry of supported locales.
///
/// Immutable after construction; safe to share across requests without locking.
#[derive(Debug)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
    default_index: usize,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Build a registry from a list of locale configurations.
    ///
    /// # Arguments
    /// * `locales` - Locale configurations in display order
    ///
    /// # Returns
    /// * `Ok(LocaleRegistry)` if the list holds exactly one default and that default is enabled
    /// * `Err(LocaleError::InvalidRegistry)` if the list is empty, a code repeats,
    ///   or the default is missing, duplicated or disabled
    pub fn new(locales: Vec<LocaleConfig>) -> Result<Self, LocaleError> {
        if locales.is_empty() {
            return Err(LocaleError::InvalidRegistry(
                "at least one locale is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for locale in &locales {
            if !seen.insert(locale.code) {
                return Err(LocaleError::InvalidRegistry(format!(
                    "duplicate locale code '{}'",
                    locale.code
                )));
            }
        }

        let defaults: Vec<usize> = locales
            .iter()
            .enumerate()
            .filter(|(_, locale)| locale.is_default)
            .map(|(index, _)| index)
            .collect();

        let default_index = match defaults.as_slice() {
            [] => {
                return Err(LocaleError::InvalidRegistry(
                    "no default locale".to_string(),
                ))
            }
            [index] => *index,
            _ => {
                return Err(LocaleError::InvalidRegistry(
                    "multiple default locales".to_string(),
                ))
            }
        };

        if !locales[default_index].enabled {
            return Err(LocaleError::InvalidRegistry(format!(
                "default locale '{}' is disabled",
                locales[default_index].code
            )));
        }

        Ok(Self {
            locales,
            default_index,
        })
    }

    /// Get the global locale registry instance.
    ///
    /// The default list is built on first access; later calls return the same reference.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
            default_index: 0,
        })
    }

    /// Get a locale configuration by its code.
    ///
    /// # Arguments
    /// * `code` - The two-letter locale code (e.g., "en", "zh")
    ///
    /// # Returns
    /// * `Some(&LocaleConfig)` if the locale exists, enabled or not
    /// * `None` if the locale is not found
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Check if a locale code is supported and enabled.
    ///
    /// # Arguments
    /// * `code` - The locale code to check, compared exactly (`"FR"` is not `"fr"`)
    ///
    /// # Returns
    /// `true` if the locale exists and is enabled, `false` otherwise.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|locale| locale.enabled)
            .unwrap_or(false)
    }

    /// Look up an exact code.
    ///
    /// # Arguments
    /// * `code` - The locale code, compared exactly
    ///
    /// # Returns
    /// * `Some(LocaleCode)` if the locale exists and is enabled
    /// * `None` otherwise
    pub fn lookup(&self, code: &str) -> Option<LocaleCode> {
        self.get_by_code(code)
            .filter(|locale| locale.enabled)
            .map(|locale| LocaleCode::new_unchecked(locale.code))
    }

    /// The fallback locale used when no signal yields a supported code.
    pub fn default_locale(&self) -> LocaleCode {
        LocaleCode::new_unchecked(self.locales[self.default_index].code)
    }

    /// Get all enabled locale codes.
    ///
    /// # Returns
    /// Enabled codes in display order, default first for the built-in list.
    pub fn supported_locales(&self) -> Vec<LocaleCode> {
        self.list_enabled()
            .into_iter()
            .map(|locale| LocaleCode::new_unchecked(locale.code))
            .collect()
    }

    /// Get all enabled locale configurations.
    ///
    /// # Returns
    /// A vector of references to enabled locales, in display order.
    pub fn list_enabled(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().filter(|locale| locale.enabled).collect()
    }

    /// All locale configurations (including disabled ones).
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }
}

/// Default locale configurations. English is the fallback.
fn default_locales() -> Vec<LocaleConfig> {
    const fn locale(
        code: &'static str,
        name: &'static str,
        native_name: &'static str,
        is_default: bool,
    ) -> LocaleConfig {
        LocaleConfig {
            code,
            name,
            native_name,
            is_default,
            enabled: true,
        }
    }

    vec![
        locale("en", "English", "English", true),
        locale("zh", "Chinese", "中文", false),
        locale("ja", "Japanese", "日本語", false),
        locale("ko", "Korean", "한국어", false),
        locale("fr", "French", "Français", false),
        locale("de", "German", "Deutsch", false),
        locale("es", "Spanish", "Español", false),
        locale("ru", "Russian", "Русский", false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(code: &'static str, is_default: bool, enabled: bool) -> LocaleConfig {
        LocaleConfig {
            code,
            name: code,
            native_name: code,
            is_default,
            enabled,
        }
    }

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LocaleRegistry::get();
        let registry2 = LocaleRegistry::get();
        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_global_registry_contents() {
        let registry = LocaleRegistry::get();
        let codes: Vec<&str> = registry
            .supported_locales()
            .iter()
            .map(|locale| locale.code())
            .collect();
        assert_eq!(codes, vec!["en", "zh", "ja", "ko", "fr", "de", "es", "ru"]);
    }

    #[test]
    fn test_default_is_english() {
        let registry = LocaleRegistry::get();
        assert_eq!(registry.default_locale().code(), "en");
        assert!(registry.get_by_code("en").unwrap().is_default);
    }

    #[test]
    fn test_native_names() {
        let registry = LocaleRegistry::get();
        assert_eq!(registry.get_by_code("zh").unwrap().native_name, "中文");
        assert_eq!(registry.get_by_code("fr").unwrap().native_name, "Français");
    }

    #[test]
    fn test_is_supported_is_exact() {
        let registry = LocaleRegistry::get();
        assert!(registry.is_supported("fr"));
        assert!(!registry.is_supported("FR"));
        assert!(!registry.is_supported("fr-FR"));
        assert!(!registry.is_supported("xx"));
        assert!(!registry.is_supported(""));
    }

    #[test]
    fn test_lookup_skips_disabled() {
        let registry = LocaleRegistry::new(vec![
            config("en", true, true),
            config("fr", false, false),
        ])
        .unwrap();
        assert!(registry.get_by_code("fr").is_some());
        assert!(registry.lookup("fr").is_none());
        assert!(!registry.is_supported("fr"));
        assert_eq!(registry.list_all().len(), 2);
        assert_eq!(registry.list_enabled().len(), 1);
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(LocaleRegistry::new(vec![]).is_err());
    }

    #[test]
    fn test_new_rejects_missing_default() {
        let result = LocaleRegistry::new(vec![config("en", false, true)]);
        assert!(result.unwrap_err().to_string().contains("no default"));
    }

    #[test]
    fn test_new_rejects_multiple_defaults() {
        let result = LocaleRegistry::new(vec![config("en", true, true), config("fr", true, true)]);
        assert!(result.unwrap_err().to_string().contains("multiple"));
    }

    #[test]
    fn test_new_rejects_disabled_default() {
        let result = LocaleRegistry::new(vec![config("en", true, false)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let result = LocaleRegistry::new(vec![config("en", true, true), config("en", false, true)]);
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_custom_default() {
        let registry = LocaleRegistry::new(vec![
            config("en", false, true),
            config("fr", false, true),
            config("zh", true, true),
        ])
        .unwrap();
        assert_eq!(registry.default_locale().code(), "zh");
    }
}
