//! Preference synchronization for explicit locale changes.
//!
//! A user's choice is persisted on two channels (cookie and client-local store)
//! and paired with the page transition that makes it visible. The synchronizer
//! only *describes* these effects as a [`PreferenceCommand`]; the host executes
//! it with [`PreferenceCommand::apply`].

use crate::error::StoreError;
use crate::i18n::signals::extract_from_local_store;
use crate::i18n::{LocaleCode, LocaleRegistry};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Default cookie name (and local store key) for the persisted preference.
pub const DEFAULT_PREFERENCE_KEY: &str = "NEXT_LOCALE";

/// Preference cookie lifetime: one year.
pub const PREFERENCE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 365;

// Root or a bare two-letter segment, e.g. "/", "/zh", "/zh/"
static HOME_PATH_REGEX: OnceLock<Regex> = OnceLock::new();

fn home_path_regex() -> &'static Regex {
    HOME_PATH_REGEX.get_or_init(|| Regex::new(r"^/[a-z]{2}/?$").expect("valid home path regex"))
}

/// Client-local key/value store (browser local storage or equivalent).
pub trait PreferenceStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory [`PreferenceStore`]. Can be built in a failing state to model a
/// disabled or full store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    failure: Option<StoreError>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every read and write fails with `error`.
    pub fn failing(error: StoreError) -> Self {
        Self {
            entries: HashMap::new(),
            failure: Some(error),
        }
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.entries.get(key).cloned()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => {
                self.insert(key, value);
                Ok(())
            }
        }
    }
}

/// Destination for cookie writes.
pub trait CookieSink {
    fn set_cookie(&mut self, cookie: &CookieWrite);
}

impl CookieSink for HeaderMap {
    fn set_cookie(&mut self, cookie: &CookieWrite) {
        match HeaderValue::from_str(&cookie.header_value()) {
            Ok(value) => {
                self.append(SET_COOKIE, value);
            }
            Err(e) => warn!("Failed to encode preference cookie: {}", e),
        }
    }
}

/// A cookie write: root-scoped, long-lived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookieWrite {
    pub name: String,
    pub value: LocaleCode,
    pub max_age_secs: i64,
    pub path: &'static str,
}

impl CookieWrite {
    pub fn new(name: &str, value: LocaleCode) -> Self {
        Self {
            name: name.to_string(),
            value,
            max_age_secs: PREFERENCE_MAX_AGE_SECS,
            path: "/",
        }
    }

    /// `Set-Cookie` header value with an `Expires` computed from now.
    pub fn header_value(&self) -> String {
        self.header_value_at(Utc::now())
    }

    pub fn header_value_at(&self, now: DateTime<Utc>) -> String {
        let expires = now + Duration::seconds(self.max_age_secs);
        format!(
            "{}={}; Max-Age={}; Expires={}; Path={}; SameSite=Lax",
            self.name,
            self.value,
            self.max_age_secs,
            expires.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.path
        )
    }
}

/// A client-local store write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreWrite {
    pub key: String,
    pub value: LocaleCode,
}

/// Page transition after a preference change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Navigation {
    /// Keep the page as is (preference persisted silently).
    Stay,
    /// Re-render the same URL.
    Reload,
    /// Go to a locale-less location; the redirect layer re-prefixes it.
    Navigate { target: String },
}

/// Effects of one preference change, executed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceCommand {
    pub locale: LocaleCode,
    pub cookie_write: CookieWrite,
    pub store_write: StoreWrite,
    pub navigation: Navigation,
}

impl PreferenceCommand {
    /// Execute the writes and return the navigation to perform.
    ///
    /// The cookie write always happens. A failing or absent local store is
    /// logged and skipped.
    pub fn apply(
        &self,
        cookies: &mut dyn CookieSink,
        store: Option<&mut dyn PreferenceStore>,
    ) -> &Navigation {
        cookies.set_cookie(&self.cookie_write);

        match store {
            Some(store) => {
                if let Err(e) = store.write(&self.store_write.key, self.store_write.value.code()) {
                    warn!(
                        "Failed to save locale '{}' to local store: {}",
                        self.store_write.value, e
                    );
                }
            }
            None => debug!("No local store available, cookie is the only channel"),
        }

        &self.navigation
    }
}

/// Builds [`PreferenceCommand`]s for explicit and bootstrap locale choices.
#[derive(Debug, Clone)]
pub struct PreferenceSynchronizer<'r> {
    registry: &'r LocaleRegistry,
    key: String,
}

impl<'r> PreferenceSynchronizer<'r> {
    /// `key` names both the cookie and the local store entry.
    pub fn new(registry: &'r LocaleRegistry, key: &str) -> Self {
        Self {
            registry,
            key: key.to_string(),
        }
    }

    /// Command for a user explicitly choosing `locale`.
    ///
    /// # Arguments
    /// * `current` - The page the user is on, a path optionally followed by `?query`
    /// * `locale` - The chosen locale
    ///
    /// # Returns
    /// A `PreferenceCommand` writing both channels. Its navigation is
    /// `Reload` on `/` and bare-locale home paths, otherwise `Navigate` to
    /// `current` without its leading locale segment (query kept).
    pub fn select(&self, current: &str, locale: LocaleCode) -> PreferenceCommand {
        let navigation = self.navigation_for(current);
        debug!(locale = %locale, current, ?navigation, "Locale preference selected");
        self.command(locale, navigation)
    }

    /// Adopt the browser's language when neither channel holds a usable preference.
    ///
    /// # Arguments
    /// * `cookie` - The preference cookie value, if any (compared exactly)
    /// * `store` - The client-local store, if available
    /// * `browser_language` - A language tag such as `"ja-JP"`
    ///
    /// # Returns
    /// * `None` if a supported preference is already persisted or the browser language is unsupported
    /// * `Some(PreferenceCommand)` with `Navigation::Stay` otherwise
    pub fn bootstrap(
        &self,
        cookie: Option<&str>,
        store: Option<&dyn PreferenceStore>,
        browser_language: Option<&str>,
    ) -> Option<PreferenceCommand> {
        let persisted = cookie
            .and_then(|raw| self.registry.lookup(raw))
            .or_else(|| extract_from_local_store(self.registry, store, &self.key));
        if persisted.is_some() {
            return None;
        }

        let primary = browser_language?.split(['-', '_']).next()?;
        let locale = LocaleCode::parse(self.registry, primary)?;
        debug!(locale = %locale, "Adopting browser language as locale preference");
        Some(self.command(locale, Navigation::Stay))
    }

    fn command(&self, locale: LocaleCode, navigation: Navigation) -> PreferenceCommand {
        PreferenceCommand {
            locale,
            cookie_write: CookieWrite::new(&self.key, locale),
            store_write: StoreWrite {
                key: self.key.clone(),
                value: locale,
            },
            navigation,
        }
    }

    fn navigation_for(&self, current: &str) -> Navigation {
        let (path, query) = match current.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (current, None),
        };

        if path == "/" || home_path_regex().is_match(path) {
            return Navigation::Reload;
        }

        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if let Some(first) = segments.first() {
            if self.registry.is_supported(first) {
                segments.remove(0);
            }
        }

        let mut target = format!("/{}", segments.join("/"));
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        Navigation::Navigate { target }
    }
}
