use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building locale state at startup or validating a user choice.
///
/// Request-time resolution never produces these: unsupported signals are discarded
/// and resolution falls through to the next tier.
#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("Unknown locale code: '{0}'")]
    UnknownLocale(String),

    #[error("Locale '{0}' is not enabled")]
    DisabledLocale(String),

    #[error("Invalid locale registry: {0}")]
    InvalidRegistry(String),

    #[error("Failed to read translation bundle for '{locale}' at {path}")]
    BundleLoad {
        locale: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Translation bundle for '{locale}' is not valid JSON")]
    BundleParse {
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Translation bundle for '{0}' must be a JSON object at the top level")]
    BundleShape(String),
}

/// Failures of the client-local preference store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("local store is unavailable")]
    Unavailable,

    #[error("local store quota exceeded")]
    QuotaExceeded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_locale_message() {
        let err = LocaleError::UnknownLocale("xx".to_string());
        assert_eq!(err.to_string(), "Unknown locale code: 'xx'");
    }

    #[test]
    fn test_bundle_load_keeps_source() {
        let err = LocaleError::BundleLoad {
            locale: "fr".to_string(),
            path: PathBuf::from("locales/fr.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("locales/fr.json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_store_error_display() {
        assert_eq!(StoreError::Unavailable.to_string(), "local store is unavailable");
        assert_eq!(StoreError::QuotaExceeded.to_string(), "local store quota exceeded");
    }
}
