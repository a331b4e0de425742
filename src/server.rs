//! HTTP host for the locale core.
//!
//! Every request passes through [`locale_layer`], which either answers with a
//! temporary redirect to a locale-prefixed URL or attaches the render-time
//! [`ResolvedLocale`] for downstream handlers.

use crate::config::Config;
use crate::error::LocaleError;
use crate::i18n::{
    LocaleCode, LocaleConfig, LocaleMetrics, LocaleRegistry, LocaleResolver, MetricsReport,
    Navigation, PreferenceSynchronizer, RedirectDecider, RequestContext, Resolution, Signal,
    TranslationCatalog,
};
use anyhow::{Context, Result};
use axum::{
    extract::{Query, Request, State},
    http::{uri::PathAndQuery, HeaderMap, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Shared, read-only server state.
#[derive(Clone)]
pub struct AppState {
    pub registry: &'static LocaleRegistry,
    pub catalog: Arc<TranslationCatalog>,
    pub metrics: Arc<LocaleMetrics>,
    pub cookie_name: Arc<str>,
}

impl AppState {
    pub fn new(
        registry: &'static LocaleRegistry,
        catalog: TranslationCatalog,
        cookie_name: &str,
    ) -> Self {
        Self {
            registry,
            catalog: Arc::new(catalog),
            metrics: Arc::new(LocaleMetrics::new()),
            cookie_name: Arc::from(cookie_name),
        }
    }

    pub fn resolver(&self) -> LocaleResolver<'_> {
        LocaleResolver::new(self.registry, &self.cookie_name)
    }
}

/// Render-time locale attached to every request that was not redirected.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedLocale(pub Resolution);

/// Locale interception middleware.
pub async fn locale_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let resolution = {
        let resolver = state.resolver();
        let context = RequestContext::from_http(request.uri(), request.headers());
        let decision = RedirectDecider::new(resolver).decide(&context);
        state.metrics.record_decision(&decision);

        if let Some(location) = decision.location() {
            return Redirect::temporary(location).into_response();
        }

        resolver.resolve_for_render(&context, None)
    };

    request.extensions_mut().insert(ResolvedLocale(resolution));
    next.run(request).await
}

/// JSON error body for rejected requests.
#[derive(Debug)]
pub struct ApiError(LocaleError);

impl From<LocaleError> for ApiError {
    fn from(err: LocaleError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.0.to_string() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SwitchParams {
    pub locale: String,
    pub from: Option<String>,
}

/// Persist an explicit locale choice and send the browser where it should go next.
async fn switch_locale(
    State(state): State<AppState>,
    Query(params): Query<SwitchParams>,
) -> Result<Response, ApiError> {
    let locale = LocaleCode::from_code_in(state.registry, &params.locale)?;

    let from = same_site_path(params.from.as_deref());

    let command = PreferenceSynchronizer::new(state.registry, &state.cookie_name).select(from, locale);
    let mut headers = HeaderMap::new();
    let target = match command.apply(&mut headers, None) {
        Navigation::Navigate { target } => target.clone(),
        Navigation::Reload | Navigation::Stay => from.to_string(),
    };

    state.metrics.record_switch();
    info!("Locale switched to {} from {}, continuing to {}", locale, from, target);

    Ok((headers, Redirect::to(&target)).into_response())
}

/// Return location for the switch endpoint, or `/` when `from` is unusable.
///
/// Accepted values are site-relative paths made of visible ASCII that parse as
/// a path-and-query. Backslashes are rejected anywhere, and the second byte may
/// not be `/` or `\`, since browsers read `/\host` and `//host` as another origin.
pub fn same_site_path(from: Option<&str>) -> &str {
    let Some(from) = from else {
        return "/";
    };

    let bytes = from.as_bytes();
    let usable = bytes.first() == Some(&b'/')
        && !matches!(bytes.get(1), Some(b'/') | Some(b'\\'))
        && !from.contains('\\')
        && bytes.iter().all(|b| b.is_ascii_graphic())
        && from.parse::<PathAndQuery>().is_ok();

    if usable {
        from
    } else {
        debug!(from, "Rejecting switch return location");
        "/"
    }
}

async fn list_locales(State(state): State<AppState>) -> Json<Vec<LocaleConfig>> {
    Json(state.registry.list_enabled().into_iter().cloned().collect())
}

async fn metrics_report(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.metrics.report())
}

#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub locale: LocaleCode,
    pub source: Option<Signal>,
    pub path: String,
    pub greeting: String,
}

/// Stand-in for the host's page rendering: reports the locale governing the path.
async fn page(
    State(state): State<AppState>,
    Extension(ResolvedLocale(resolution)): Extension<ResolvedLocale>,
    uri: Uri,
) -> Json<PageInfo> {
    let translator = state.catalog.translator(resolution.locale);
    Json(PageInfo {
        locale: resolution.locale,
        source: resolution.source,
        path: uri.path().to_string(),
        greeting: translator.t("home.greeting"),
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/locales", get(list_locales))
        .route("/api/locale/switch", get(switch_locale))
        .route("/api/locale/metrics", get(metrics_report))
        .fallback(page)
        .layer(middleware::from_fn_with_state(state.clone(), locale_layer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn serve(config: &Config, state: AppState) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);
    axum::serve(listener, router(state))
        .await
        .context("Server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_site_path_accepts_site_paths() {
        assert_eq!(same_site_path(Some("/zh/dashboard?tab=1")), "/zh/dashboard?tab=1");
        assert_eq!(same_site_path(Some("/")), "/");
    }

    #[test]
    fn test_same_site_path_missing_or_relative() {
        assert_eq!(same_site_path(None), "/");
        assert_eq!(same_site_path(Some("")), "/");
        assert_eq!(same_site_path(Some("dashboard")), "/");
        assert_eq!(same_site_path(Some("https://evil.example/")), "/");
    }

    #[test]
    fn test_same_site_path_rejects_other_origins() {
        assert_eq!(same_site_path(Some("//evil.example")), "/");
        assert_eq!(same_site_path(Some("/\\evil.example")), "/");
        assert_eq!(same_site_path(Some("/docs\\..\\x")), "/");
    }

    #[test]
    fn test_same_site_path_rejects_non_visible_bytes() {
        assert_eq!(same_site_path(Some("/a\nb")), "/");
        assert_eq!(same_site_path(Some("/a b")), "/");
        assert_eq!(same_site_path(Some("/a\tb")), "/");
        assert_eq!(same_site_path(Some("/caf\u{e9}")), "/");
    }
}
