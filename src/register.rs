//! Store, provider and browser wiring shared by every command.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use searchlens_config::{JsonFileStore, Settings, seed_defaults};
use searchlens_core::ProviderRegistry;
use searchlens_protocols::provider::Connectivity;
use searchlens_provider_completion::{
    CompletionOptions, DirectCompletionProvider, RouteConnectivity,
};
use searchlens_provider_scrape::{BrowserManager, BrowserOptions, CdpHost, ScrapeOptions, ScrapeProvider};

/// Open the persisted key/value store and seed absent defaults.
pub(crate) async fn open_store(settings: &Settings) -> anyhow::Result<Arc<JsonFileStore>> {
    let store = Arc::new(JsonFileStore::new(&settings.store.path));
    seed_defaults(store.as_ref(), &settings.defaults)
        .await
        .with_context(|| format!("Failed to seed {}", settings.store.path.display()))?;
    Ok(store)
}

/// The direct completion provider as configured.
pub(crate) fn completion_provider(settings: &Settings) -> DirectCompletionProvider {
    let completion = &settings.completion;
    let provider = DirectCompletionProvider::new(CompletionOptions {
        endpoint: completion.endpoint.clone(),
        request_timeout: completion.request_timeout_secs.map(Duration::from_secs),
    });

    if !completion.probe_connectivity {
        return provider;
    }
    let connectivity: Arc<dyn Connectivity> = Arc::new(RouteConnectivity::default());
    provider.with_connectivity(connectivity)
}

/// Browser connection for the scrape provider. `headless` overrides the
/// settings when given.
pub(crate) fn browser_manager(settings: &Settings, headless: Option<bool>) -> Arc<BrowserManager> {
    Arc::new(BrowserManager::new(BrowserOptions {
        debug_port: settings.scrape.debug_port,
        profile_dir: settings.scrape.profile_dir.clone(),
        headless: headless.unwrap_or(settings.scrape.headless),
    }))
}

fn scrape_options(settings: &Settings) -> ScrapeOptions {
    let scrape = &settings.scrape;
    ScrapeOptions {
        chat_url: scrape.chat_url.clone(),
        load_grace: Duration::from_millis(scrape.load_grace_ms),
        discovery_max_attempts: scrape.discovery_max_attempts,
        answer_max_attempts: scrape.answer_max_attempts,
        poll_interval: Duration::from_millis(scrape.poll_interval_ms),
        search_mode_settle: Duration::from_millis(scrape.search_mode_settle_ms),
        submit_delay: Duration::from_millis(scrape.submit_delay_ms),
        max_open_contexts: scrape.max_open_contexts,
    }
}

/// Everything the dispatcher needs to answer queries.
pub(crate) struct Providers {
    pub registry: Arc<ProviderRegistry>,
    pub browser: Arc<BrowserManager>,
    pub host: Arc<CdpHost>,
}

impl Providers {
    /// Disconnect from the browser, stopping it if this process launched it.
    pub async fn shutdown(&self) {
        self.browser.shutdown_chrome().await;
    }
}

/// Register both answer strategies.
pub(crate) fn register_providers(settings: &Settings) -> anyhow::Result<Providers> {
    let registry = Arc::new(ProviderRegistry::new());

    registry.register(Arc::new(completion_provider(settings)))?;

    let browser = browser_manager(settings, None);
    let host = Arc::new(CdpHost::new(Arc::clone(&browser), settings.scrape.chat_url.clone()));
    registry.register(Arc::new(ScrapeProvider::new(
        host.clone(),
        scrape_options(settings),
    )))?;

    info!("Registered answer providers: {:?}", registry.kinds());
    Ok(Providers {
        registry,
        browser,
        host,
    })
}
