//! One-shot commands: `ask`, `probe` and `open`.

use std::sync::Arc;

use anyhow::{Context, bail};
use serde_json::Value;
use tracing::{info, warn};

use searchlens_config::{MemoryStore, Settings};
use searchlens_core::{DispatchOutcome, Dispatcher, LocalBus, ResponseRelay};
use searchlens_protocols::bus::BusMessage;
use searchlens_protocols::challenge::{VERIFICATION_PROMPT, is_verification_challenge};
use searchlens_protocols::provider::OriginalPageOpener;
use searchlens_protocols::store::{ConfigStore, keys};
use searchlens_protocols::types::{ContextId, PayloadKind, ProviderKind};
use searchlens_provider_scrape::CdpHost;

use crate::register::{browser_manager, completion_provider, open_store, register_providers};

/// Answer `query` through the same dispatcher the bridge uses, delivering to
/// an in-process context. Ctrl-C cancels the request.
pub(crate) async fn ask(
    settings: &Settings,
    query: &str,
    provider: Option<&str>,
) -> anyhow::Result<()> {
    let file_store = open_store(settings).await?;
    let mut values = file_store.get(keys::ALL).await?;

    // An override applies to this query only, so work on a snapshot.
    if let Some(name) = provider {
        let Some(kind) = ProviderKind::parse(name) else {
            bail!("Unknown provider '{}' (expected direct or scrape)", name);
        };
        values.insert(keys::PROVIDER.to_string(), Value::from(kind.as_str()));
    }
    let store = Arc::new(MemoryStore::with_values(values));

    let providers = register_providers(settings)?;
    let bus = Arc::new(LocalBus::new());
    let origin = ContextId::from("cli");
    let mut inbox = bus.attach(origin.clone());

    let dispatcher = Arc::new(Dispatcher::new(
        store,
        Arc::clone(&providers.registry),
        ResponseRelay::new(bus.clone()),
    ));

    let mut request = dispatcher.handle(query.to_string(), origin);
    let outcome = tokio::select! {
        outcome = &mut request => outcome?,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, cancelling request");
            dispatcher.shutdown();
            request.await?
        }
    };
    providers.shutdown().await;

    match outcome {
        DispatchOutcome::Disabled => {
            bail!("searchlens is disabled; run `searchlens toggle` to enable it")
        }
        DispatchOutcome::EmptyQuery => bail!("Query is empty"),
        DispatchOutcome::Relayed(kind) => {
            let Ok(BusMessage::DisplayAnswer { response }) = inbox.try_recv() else {
                bail!("No answer was delivered");
            };
            if kind == PayloadKind::Error {
                bail!("{}", response);
            }
            if is_verification_challenge(&response) {
                println!("{}", VERIFICATION_PROMPT);
                println!("Run `searchlens open` to complete it in a browser window.");
            } else {
                println!("{}", response);
            }
            Ok(())
        }
    }
}

/// Minimal completion request with the stored model and token.
pub(crate) async fn probe(settings: &Settings) -> anyhow::Result<()> {
    let store = open_store(settings).await?;
    let config = store.load_config().await?;
    let provider = completion_provider(settings);

    println!("Endpoint: {}", provider.endpoint());
    println!("Model:    {}", config.model);
    println!("Token:    {}", config.redacted_token());

    match provider.probe(&config).await {
        Ok(reply) => {
            println!("Connection OK");
            println!("{}", reply);
            Ok(())
        }
        Err(e) => {
            warn!("Probe failed: {}", e);
            bail!("{}\n({})", e.user_message(), e)
        }
    }
}

/// Open the chat page visibly, for completing a verification challenge.
pub(crate) async fn open(settings: &Settings) -> anyhow::Result<()> {
    let browser = browser_manager(settings, Some(false));
    let host = CdpHost::new(Arc::clone(&browser), settings.scrape.chat_url.clone());

    host.open_original_page()
        .await
        .with_context(|| format!("Could not open {}", settings.scrape.chat_url))?;
    println!("Opened {}", settings.scrape.chat_url);

    // Leave the window (and any browser launched for it) to the user.
    browser.close().await;
    Ok(())
}
