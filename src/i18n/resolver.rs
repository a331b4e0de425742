//! Locale resolution over ordered precedence chains.
//!
//! A chain is a fixed list of signals tried in sequence; the first signal that
//! yields a supported locale wins, and the registry default is used when none
//! does. There is no merging between channels.

use crate::i18n::signals::{
    extract_from_cookie, extract_from_header, extract_from_local_store, extract_from_path,
    RequestContext,
};
use crate::i18n::{LocaleCode, LocaleRegistry, PreferenceStore};
use serde::Serialize;
use tracing::debug;

/// One candidate source of locale information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Path,
    Cookie,
    LocalStore,
    Header,
}

/// Ordered list of signals consulted for one resolution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecedenceChain(&'static [Signal]);

impl PrecedenceChain {
    /// Request interception, before any client code runs: cookie > header.
    pub const REDIRECT: PrecedenceChain = PrecedenceChain(&[Signal::Cookie, Signal::Header]);

    /// After hydration: local store > cookie > path.
    pub const RENDER: PrecedenceChain =
        PrecedenceChain(&[Signal::LocalStore, Signal::Cookie, Signal::Path]);

    /// Language switcher highlight: path > local store > cookie.
    pub const SWITCHER: PrecedenceChain =
        PrecedenceChain(&[Signal::Path, Signal::LocalStore, Signal::Cookie]);

    pub fn signals(&self) -> &'static [Signal] {
        self.0
    }
}

/// Outcome of a resolution. `source` is `None` when the default was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub locale: LocaleCode,
    pub source: Option<Signal>,
}

impl Resolution {
    pub fn is_default(&self) -> bool {
        self.source.is_none()
    }
}

/// Applies precedence chains against a registry.
#[derive(Debug, Clone, Copy)]
pub struct LocaleResolver<'r> {
    registry: &'r LocaleRegistry,
    preference_key: &'r str,
}

impl<'r> LocaleResolver<'r> {
    /// Create a resolver over `registry`.
    ///
    /// # Arguments
    /// * `registry` - Source of supported locales and the default
    /// * `preference_key` - The cookie name, also used as the local store key
    pub fn new(registry: &'r LocaleRegistry, preference_key: &'r str) -> Self {
        Self {
            registry,
            preference_key,
        }
    }

    pub fn registry(&self) -> &'r LocaleRegistry {
        self.registry
    }

    /// Redirect-time resolution.
    ///
    /// A supported locale already in the path is authoritative and no other
    /// signal is read. Otherwise cookie, then header, then default. The local
    /// store is never consulted here.
    ///
    /// # Returns
    /// A `Resolution` whose `source` is `Some(Signal::Path)` for localized paths,
    /// the winning signal otherwise, or `None` when the default was used.
    pub fn resolve_for_redirect(&self, context: &RequestContext<'_>) -> Resolution {
        if let Some(locale) = extract_from_path(self.registry, context.path()) {
            return Resolution {
                locale,
                source: Some(Signal::Path),
            };
        }
        self.resolve_with(PrecedenceChain::REDIRECT, context, None)
    }

    /// Render-time resolution: local store, cookie, path, default.
    ///
    /// # Arguments
    /// * `context` - The request being rendered
    /// * `store` - Client-local store, `None` during server-side rendering
    pub fn resolve_for_render(
        &self,
        context: &RequestContext<'_>,
        store: Option<&dyn PreferenceStore>,
    ) -> Resolution {
        self.resolve_with(PrecedenceChain::RENDER, context, store)
    }

    /// Locale the language switcher marks as current: path, local store, cookie, default.
    pub fn resolve_for_switcher(
        &self,
        context: &RequestContext<'_>,
        store: Option<&dyn PreferenceStore>,
    ) -> Resolution {
        self.resolve_with(PrecedenceChain::SWITCHER, context, store)
    }

    /// Try each signal of `chain` in order; first supported hit wins.
    ///
    /// # Returns
    /// The first supported locale with the signal that produced it, or the
    /// registry default with `source: None` when every signal misses.
    pub fn resolve_with(
        &self,
        chain: PrecedenceChain,
        context: &RequestContext<'_>,
        store: Option<&dyn PreferenceStore>,
    ) -> Resolution {
        for &signal in chain.signals() {
            if let Some(locale) = self.extract(signal, context, store) {
                debug!(?signal, locale = %locale, path = context.path(), "Locale resolved");
                return Resolution {
                    locale,
                    source: Some(signal),
                };
            }
        }

        let locale = self.registry.default_locale();
        debug!(locale = %locale, path = context.path(), "No locale signal, using default");
        Resolution {
            locale,
            source: None,
        }
    }

    fn extract(
        &self,
        signal: Signal,
        context: &RequestContext<'_>,
        store: Option<&dyn PreferenceStore>,
    ) -> Option<LocaleCode> {
        match signal {
            Signal::Path => extract_from_path(self.registry, context.path()),
            Signal::Cookie => extract_from_cookie(self.registry, context, self.preference_key),
            Signal::LocalStore => extract_from_local_store(self.registry, store, self.preference_key),
            Signal::Header => context
                .accept_language()
                .and_then(|value| extract_from_header(self.registry, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::i18n::{LocaleConfig, MemoryStore};

    const KEY: &str = "NEXT_LOCALE";

    fn resolver() -> LocaleResolver<'static> {
        LocaleResolver::new(LocaleRegistry::get(), KEY)
    }

    fn store_with(code: &str) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert(KEY, code);
        store
    }

    // ==================== Redirect-time ====================

    #[test]
    fn test_redirect_cookie_beats_header() {
        let ctx = RequestContext::new("/pricing")
            .with_cookie(KEY, "ja")
            .with_accept_language("fr-FR");
        let resolution = resolver().resolve_for_redirect(&ctx);
        assert_eq!(resolution.locale.code(), "ja");
        assert_eq!(resolution.source, Some(Signal::Cookie));
    }

    #[test]
    fn test_redirect_unsupported_cookie_falls_to_header() {
        let ctx = RequestContext::new("/pricing")
            .with_cookie(KEY, "xx")
            .with_accept_language("de-DE");
        let resolution = resolver().resolve_for_redirect(&ctx);
        assert_eq!(resolution.locale.code(), "de");
        assert_eq!(resolution.source, Some(Signal::Header));
    }

    #[test]
    fn test_redirect_defaults_without_signals() {
        let resolution = resolver().resolve_for_redirect(&RequestContext::new("/pricing"));
        assert_eq!(resolution.locale.code(), "en");
        assert!(resolution.is_default());
    }

    #[test]
    fn test_redirect_unparseable_header_defaults() {
        let ctx = RequestContext::new("/").with_accept_language(";;q=,*");
        assert!(resolver().resolve_for_redirect(&ctx).is_default());
    }

    #[test]
    fn test_redirect_path_is_authoritative() {
        let ctx = RequestContext::new("/ko/docs")
            .with_cookie(KEY, "ja")
            .with_accept_language("fr");
        let resolution = resolver().resolve_for_redirect(&ctx);
        assert_eq!(resolution.locale.code(), "ko");
        assert_eq!(resolution.source, Some(Signal::Path));
    }

    // ==================== Render-time ====================

    #[test]
    fn test_render_store_beats_cookie_and_path() {
        let store = store_with("es");
        let ctx = RequestContext::new("/zh/docs").with_cookie(KEY, "ja");
        let resolution = resolver().resolve_for_render(&ctx, Some(&store));
        assert_eq!(resolution.locale.code(), "es");
        assert_eq!(resolution.source, Some(Signal::LocalStore));
    }

    #[test]
    fn test_render_cookie_beats_path() {
        let ctx = RequestContext::new("/zh/docs").with_cookie(KEY, "ja");
        let resolution = resolver().resolve_for_render(&ctx, None);
        assert_eq!(resolution.locale.code(), "ja");
    }

    #[test]
    fn test_render_path_when_nothing_persisted() {
        let store = MemoryStore::failing(StoreError::Unavailable);
        let ctx = RequestContext::new("/zh/docs");
        let resolution = resolver().resolve_for_render(&ctx, Some(&store));
        assert_eq!(resolution.locale.code(), "zh");
        assert_eq!(resolution.source, Some(Signal::Path));
    }

    #[test]
    fn test_render_ignores_header() {
        let ctx = RequestContext::new("/docs").with_accept_language("fr");
        assert!(resolver().resolve_for_render(&ctx, None).is_default());
    }

    // ==================== Switcher ====================

    #[test]
    fn test_switcher_path_first() {
        let store = store_with("es");
        let ctx = RequestContext::new("/zh/docs").with_cookie(KEY, "ja");
        let resolution = resolver().resolve_for_switcher(&ctx, Some(&store));
        assert_eq!(resolution.locale.code(), "zh");
    }

    #[test]
    fn test_switcher_store_before_cookie() {
        let store = store_with("es");
        let ctx = RequestContext::new("/docs").with_cookie(KEY, "ja");
        let resolution = resolver().resolve_for_switcher(&ctx, Some(&store));
        assert_eq!(resolution.locale.code(), "es");
    }

    // ==================== Chains ====================

    #[test]
    fn test_chain_orders() {
        assert_eq!(
            PrecedenceChain::REDIRECT.signals(),
            &[Signal::Cookie, Signal::Header]
        );
        assert_eq!(
            PrecedenceChain::RENDER.signals(),
            &[Signal::LocalStore, Signal::Cookie, Signal::Path]
        );
    }

    #[test]
    fn test_custom_registry_default() {
        let registry = LocaleRegistry::new(vec![
            LocaleConfig {
                code: "en",
                name: "English",
                native_name: "English",
                is_default: false,
                enabled: true,
            },
            LocaleConfig {
                code: "ja",
                name: "Japanese",
                native_name: "日本語",
                is_default: true,
                enabled: true,
            },
        ])
        .unwrap();
        let resolver = LocaleResolver::new(&registry, KEY);
        let ctx = RequestContext::new("/").with_accept_language("fr, de");
        assert_eq!(resolver.resolve_for_redirect(&ctx).locale.code(), "ja");
    }
}
