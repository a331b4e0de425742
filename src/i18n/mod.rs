//! Locale resolution, redirection and translation lookup.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported locales and the default
//! - `locale`: `LocaleCode`, a code validated against the registry
//! - `signals`: Extraction of path, cookie, local store and header signals
//! - `resolver`: Ordered precedence chains over those signals
//! - `redirect`: Pass-through / redirect decision for request interception
//! - `preference`: Explicit locale changes as executable commands
//! - `translator`: Dotted-key lookup with placeholder substitution
//! - `validator`: Bundle consistency checks
//! - `metrics`: Routing counters
//!
//! # Example
//!
//! ```rust,ignore
//! use locale_gate::i18n::{LocaleRegistry, LocaleResolver, RedirectDecider, RequestContext};
//!
//! let resolver = LocaleResolver::new(LocaleRegistry::get(), "NEXT_LOCALE");
//! let context = RequestContext::new("/pricing").with_accept_language("fr-FR,fr;q=0.9");
//! let decision = RedirectDecider::new(resolver).decide(&context);
//! assert_eq!(decision.location(), Some("/fr/pricing"));
//! ```

mod locale;
mod metrics;
mod preference;
mod redirect;
mod registry;
mod resolver;
mod signals;
mod translator;
mod validator;

pub use locale::LocaleCode;
pub use metrics::{LocaleMetrics, MetricsReport};
pub use preference::{
    CookieSink, CookieWrite, MemoryStore, Navigation, PreferenceCommand, PreferenceStore,
    PreferenceSynchronizer, StoreWrite, DEFAULT_PREFERENCE_KEY, PREFERENCE_MAX_AGE_SECS,
};
pub use redirect::{
    localized_location, ExcludedPathSet, PassReason, PathRule, RedirectDecider, RedirectDecision,
    RouteMatcher,
};
pub use registry::{LocaleConfig, LocaleRegistry};
pub use resolver::{LocaleResolver, PrecedenceChain, Resolution, Signal};
pub use signals::{
    extract_from_cookie, extract_from_header, extract_from_local_store, extract_from_path,
    parse_cookie_header, RequestContext,
};
pub use translator::{substitute, TranslationCatalog, TranslationTree, Translator};
pub use validator::{BundleValidator, ValidationReport};
