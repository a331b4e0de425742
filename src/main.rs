use anyhow::{Context, Result};
use locale_gate::config::Config;
use locale_gate::i18n::{BundleValidator, LocaleRegistry, TranslationCatalog};
use locale_gate::server::{self, AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_gate=info".parse()?),
        )
        .init();

    info!("Starting locale gate");

    let config = Config::from_env()?;
    let registry = LocaleRegistry::get();

    let catalog = TranslationCatalog::load_dir(registry, &config.locales_dir)
        .with_context(|| format!("Failed to load bundles from {}", config.locales_dir.display()))?;

    // Missing keys render as raw keys, so surface them now
    let default_locale = registry.default_locale();
    if let Some(reference) = catalog.tree(default_locale) {
        for locale in registry.supported_locales() {
            if locale == default_locale {
                continue;
            }
            let Some(tree) = catalog.tree(locale) else {
                continue;
            };
            let report = BundleValidator::validate(reference, tree);
            for error in &report.errors {
                warn!("Bundle '{}': {}", locale, error);
            }
            for warning in &report.warnings {
                warn!("Bundle '{}': {}", locale, warning);
            }
        }
    }

    info!(
        "Default locale '{}', preference cookie '{}'",
        default_locale, config.locale_cookie_name
    );

    let state = AppState::new(registry, catalog, &config.locale_cookie_name);
    server::serve(&config, state).await
}
