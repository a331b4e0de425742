//! Redirect decision for request interception.
//!
//! Every request that carries no supported locale segment is sent to
//! `/{locale}{path}` with its query preserved. Paths outside the interception
//! matcher and excluded system paths always pass through.

use crate::i18n::resolver::{LocaleResolver, Resolution};
use crate::i18n::signals::{extract_from_path, RequestContext};
use crate::i18n::LocaleCode;
use tracing::debug;

/// How an excluded path is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRule {
    Exact(&'static str),
    Prefix(&'static str),
}

impl PathRule {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathRule::Exact(exact) => path == *exact,
            PathRule::Prefix(prefix) => path.starts_with(prefix),
        }
    }
}

/// Routes that are never locale-prefixed: auth callbacks, the post-login
/// landing page and API routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedPathSet {
    rules: Vec<PathRule>,
}

impl ExcludedPathSet {
    pub fn new(rules: Vec<PathRule>) -> Self {
        Self { rules }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(path))
    }
}

impl Default for ExcludedPathSet {
    fn default() -> Self {
        Self::new(vec![
            PathRule::Prefix("/auth/callback"),
            PathRule::Exact("/dashboard"),
            PathRule::Prefix("/api/"),
        ])
    }
}

/// Which paths are subject to locale interception at all.
///
/// Anything whose remainder after the leading `/` starts with one of the
/// skipped prefixes, or that contains a `.` (a static asset), is not intercepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatcher {
    skipped_prefixes: Vec<&'static str>,
}

impl RouteMatcher {
    pub fn new(skipped_prefixes: Vec<&'static str>) -> Self {
        Self { skipped_prefixes }
    }

    pub fn intercepts(&self, path: &str) -> bool {
        let rest = path.strip_prefix('/').unwrap_or(path);
        if rest.contains('.') {
            return false;
        }
        !self
            .skipped_prefixes
            .iter()
            .any(|prefix| rest.starts_with(prefix))
    }
}

impl Default for RouteMatcher {
    fn default() -> Self {
        Self::new(vec!["api", "_next/static", "_next/image", "favicon.ico"])
    }
}

/// Why a request was let through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    /// Outside the interception matcher (assets, API).
    NotMatched,
    /// In the excluded path set.
    Excluded,
    /// Path already starts with a supported locale segment.
    Localized(LocaleCode),
}

/// Outcome of one interception pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    PassThrough(PassReason),
    /// Issue a temporary redirect to `location`.
    NeedsRedirect {
        location: String,
        resolution: Resolution,
    },
}

impl RedirectDecision {
    pub fn is_pass_through(&self) -> bool {
        matches!(self, RedirectDecision::PassThrough(_))
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            RedirectDecision::NeedsRedirect { location, .. } => Some(location),
            RedirectDecision::PassThrough(_) => None,
        }
    }
}

/// Two-state interception: pass through, or redirect to a locale-prefixed URL.
#[derive(Debug, Clone)]
pub struct RedirectDecider<'r> {
    resolver: LocaleResolver<'r>,
    matcher: RouteMatcher,
    excluded: ExcludedPathSet,
}

impl<'r> RedirectDecider<'r> {
    pub fn new(resolver: LocaleResolver<'r>) -> Self {
        Self {
            resolver,
            matcher: RouteMatcher::default(),
            excluded: ExcludedPathSet::default(),
        }
    }

    pub fn with_matcher(mut self, matcher: RouteMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_excluded(mut self, excluded: ExcludedPathSet) -> Self {
        self.excluded = excluded;
        self
    }

    pub fn decide(&self, context: &RequestContext<'_>) -> RedirectDecision {
        let path = context.path();

        if !self.matcher.intercepts(path) {
            return RedirectDecision::PassThrough(PassReason::NotMatched);
        }

        if self.excluded.contains(path) {
            debug!(path, "Excluded path, skipping locale redirect");
            return RedirectDecision::PassThrough(PassReason::Excluded);
        }

        if let Some(locale) = extract_from_path(self.resolver.registry(), path) {
            return RedirectDecision::PassThrough(PassReason::Localized(locale));
        }

        let resolution = self.resolver.resolve_for_redirect(context);
        let location = localized_location(resolution.locale, path, context.query());
        debug!(path, location = %location, "Redirecting to locale-prefixed path");

        RedirectDecision::NeedsRedirect {
            location,
            resolution,
        }
    }
}

/// `/{locale}{path}` followed by `?{query}` when the query is non-empty.
pub fn localized_location(locale: LocaleCode, path: &str, query: Option<&str>) -> String {
    let mut location = format!("/{}{}", locale, path);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(query);
    }
    location
}
