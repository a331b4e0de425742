//! Signal extraction: each function reads one candidate locale source.
//!
//! Every extractor is pure and returns `None` for missing, malformed or
//! unsupported values. No extractor fails.

use crate::i18n::{LocaleCode, LocaleRegistry, PreferenceStore};
use axum::http::header::{ACCEPT_LANGUAGE, COOKIE};
use axum::http::{HeaderMap, Uri};
use std::collections::HashMap;
use tracing::debug;

/// Read-only view of one inbound request.
///
/// Borrowed from the host's request for the duration of a single
/// resolve/decide call.
#[derive(Debug, Clone, Default)]
pub struct RequestContext<'a> {
    path: &'a str,
    query: Option<&'a str>,
    accept_language: Option<&'a str>,
    cookies: HashMap<&'a str, &'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    pub fn with_query(mut self, query: &'a str) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_accept_language(mut self, value: &'a str) -> Self {
        self.accept_language = Some(value);
        self
    }

    /// Add a cookie. The first value recorded for a name wins.
    pub fn with_cookie(mut self, name: &'a str, value: &'a str) -> Self {
        self.cookies.entry(name).or_insert(value);
        self
    }

    /// Build a context from an HTTP request's URI and headers.
    ///
    /// All `Cookie` headers are parsed; header values that are not visible
    /// ASCII are ignored.
    pub fn from_http(uri: &'a Uri, headers: &'a HeaderMap) -> Self {
        let mut context = Self::new(uri.path());
        context.query = uri.query();
        context.accept_language = headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());

        for header in headers.get_all(COOKIE) {
            if let Ok(raw) = header.to_str() {
                for (name, value) in parse_cookie_header(raw) {
                    context.cookies.entry(name).or_insert(value);
                }
            }
        }

        context
    }

    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Query string without the leading `?`.
    pub fn query(&self) -> Option<&'a str> {
        self.query
    }

    pub fn accept_language(&self) -> Option<&'a str> {
        self.accept_language
    }

    pub fn cookie(&self, name: &str) -> Option<&'a str> {
        self.cookies.get(name).copied()
    }
}

/// Split a `Cookie` header into `(name, value)` pairs.
///
/// Pairs without `=` are skipped; surrounding double quotes on values are removed.
pub fn parse_cookie_header(raw: &str) -> impl Iterator<Item = (&str, &str)> {
    raw.split(';').filter_map(|cookie| {
        let (name, value) = cookie.trim().split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        Some((name, value))
    })
}

/// Leading path segment, when it is a supported locale followed by `/` or end of path.
///
/// Comparison is exact: `/FR/docs` does not carry a locale.
pub fn extract_from_path(registry: &LocaleRegistry, path: &str) -> Option<LocaleCode> {
    let rest = path.strip_prefix('/')?;
    let segment = match rest.find('/') {
        Some(end) => &rest[..end],
        None => rest,
    };
    registry.lookup(segment)
}

/// The persisted cookie value, when supported.
///
/// Comparison is exact, like path segments: the switcher only ever writes
/// registry codes, so `FR` or ` fr` is not a stored preference.
pub fn extract_from_cookie(
    registry: &LocaleRegistry,
    context: &RequestContext<'_>,
    cookie_name: &str,
) -> Option<LocaleCode> {
    let raw = context.cookie(cookie_name)?;
    let locale = registry.lookup(raw);
    if locale.is_none() {
        debug!(cookie = cookie_name, value = raw, "Discarding unsupported locale cookie");
    }
    locale
}

/// The client-local stored value, when a store is available and holds a supported code.
///
/// Server contexts pass `None` for the store. Comparison is exact.
pub fn extract_from_local_store(
    registry: &LocaleRegistry,
    store: Option<&dyn PreferenceStore>,
    key: &str,
) -> Option<LocaleCode> {
    let store = store?;
    match store.read(key) {
        Ok(Some(raw)) => registry.lookup(&raw),
        Ok(None) => None,
        Err(e) => {
            debug!("Local store read failed: {}", e);
            None
        }
    }
}

/// First supported primary subtag from an `Accept-Language` style list.
///
/// Entries are taken in textual order; quality values are stripped, not sorted.
/// Only two-letter primary subtags are considered and matching is case-insensitive.
pub fn extract_from_header(registry: &LocaleRegistry, header_value: &str) -> Option<LocaleCode> {
    header_value.split(',').find_map(|entry| {
        let tag = entry.split(';').next().unwrap_or(entry).trim();
        let primary = tag.split(['-', '_']).next().unwrap_or(tag);
        if primary.len() != 2 {
            return None;
        }
        LocaleCode::parse(registry, primary)
    })
}
