//! Locale routing metrics.
//!
//! Counts interception outcomes and which signal decided each redirect.

use crate::i18n::redirect::{PassReason, RedirectDecision};
use crate::i18n::Signal;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Atomic counters shared by all requests of one server.
#[derive(Debug, Default)]
pub struct LocaleMetrics {
    /// Requests redirected to a locale-prefixed path
    redirects: AtomicUsize,

    /// Requests that already carried a locale segment
    localized: AtomicUsize,

    /// Requests outside interception (excluded or unmatched paths)
    skipped: AtomicUsize,

    /// Redirects decided by the cookie
    by_cookie: AtomicUsize,

    /// Redirects decided by the Accept-Language header
    by_header: AtomicUsize,

    /// Redirects that fell back to the default locale
    by_default: AtomicUsize,

    /// Explicit locale switches
    switches: AtomicUsize,
}

impl LocaleMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one interception pass.
    pub fn record_decision(&self, decision: &RedirectDecision) {
        match decision {
            RedirectDecision::PassThrough(PassReason::Localized(_)) => {
                self.localized.fetch_add(1, Ordering::Relaxed);
            }
            RedirectDecision::PassThrough(_) => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
            }
            RedirectDecision::NeedsRedirect { resolution, .. } => {
                self.redirects.fetch_add(1, Ordering::Relaxed);
                let counter = match resolution.source {
                    Some(Signal::Cookie) => &self.by_cookie,
                    Some(Signal::Header) => &self.by_header,
                    None => &self.by_default,
                    // not part of the redirect-time chain
                    Some(Signal::Path) | Some(Signal::LocalStore) => return,
                };
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Record an explicit locale switch.
    pub fn record_switch(&self) {
        self.switches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::Relaxed)
    }

    pub fn switches(&self) -> usize {
        self.switches.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let redirects = self.redirects();
        let localized = self.localized.load(Ordering::Relaxed);
        let intercepted = redirects + localized;
        let redirect_rate = if intercepted > 0 {
            (redirects as f64 / intercepted as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            redirects,
            localized,
            skipped: self.skipped.load(Ordering::Relaxed),
            redirect_rate,
            resolved_by_cookie: self.by_cookie.load(Ordering::Relaxed),
            resolved_by_header: self.by_header.load(Ordering::Relaxed),
            resolved_by_default: self.by_default.load(Ordering::Relaxed),
            switches: self.switches(),
        }
    }
}

/// Snapshot of the locale metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub redirects: usize,
    pub localized: usize,
    pub skipped: usize,
    /// Percentage of intercepted requests that needed a redirect
    pub redirect_rate: f64,
    pub resolved_by_cookie: usize,
    pub resolved_by_header: usize,
    pub resolved_by_default: usize,
    pub switches: usize,
}
