use crate::i18n::DEFAULT_PREFERENCE_KEY;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Translation bundles, one `{code}.json` per locale
    pub locales_dir: PathBuf,

    // Cookie name, also the local store key
    pub locale_cookie_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: match std::env::var("PORT") {
                Ok(v) => v.parse::<u16>().with_context(|| format!("PORT is not a valid port: {}", v))?,
                Err(_) => 8080,
            },

            locales_dir: std::env::var("LOCALES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("locales")),

            locale_cookie_name: std::env::var("LOCALE_COOKIE_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PREFERENCE_KEY.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("PORT");
        std::env::remove_var("LOCALES_DIR");
        std::env::remove_var("LOCALE_COOKIE_NAME");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.locales_dir, PathBuf::from("locales"));
        assert_eq!(config.locale_cookie_name, "NEXT_LOCALE");
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("PORT", "3000");
        std::env::set_var("LOCALES_DIR", "/srv/locales");
        std::env::set_var("LOCALE_COOKIE_NAME", "lang");

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.locales_dir, PathBuf::from("/srv/locales"));
        assert_eq!(config.locale_cookie_name, "lang");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");
        let result = Config::from_env();
        assert!(result.unwrap_err().to_string().contains("PORT"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_cookie_name_uses_default() {
        clear_env();
        std::env::set_var("LOCALE_COOKIE_NAME", "  ");
        let config = Config::from_env().unwrap();
        assert_eq!(config.locale_cookie_name, "NEXT_LOCALE");
        clear_env();
    }
}
