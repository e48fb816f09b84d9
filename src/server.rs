//! Tracing setup and the `serve` command.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use searchlens_bridge_ws::{WsBridge, WsBus};
use searchlens_config::{LoggingSettings, Settings};
use searchlens_core::{Dispatcher, ResponseRelay, Router};
use searchlens_protocols::CancellationToken;

use crate::register::{open_store, register_providers};

/// Initialize tracing with console and file output.
///
/// Log files rotate daily under `logging.dir`. `RUST_LOG` overrides
/// `default_level`.
pub(crate) fn init_tracing(logging: &LoggingSettings, default_level: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(&logging.dir)
        .with_context(|| format!("Failed to create {}", logging.dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("searchlens")
        .filename_suffix("log")
        .max_log_files(logging.max_files)
        .build(&logging.dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop; keep it for the process lifetime.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Run the WebSocket bridge until Ctrl-C.
pub(crate) async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let store = open_store(&settings).await?;
    let providers = register_providers(&settings)?;

    let bus = Arc::new(WsBus::new());
    let relay = ResponseRelay::new(bus.clone());
    let dispatcher = Arc::new(Dispatcher::new(
        store.clone(),
        Arc::clone(&providers.registry),
        relay,
    ));
    let router = Router::new(store, Arc::clone(&dispatcher), bus.clone())
        .with_opener(providers.host.clone());

    let bridge = WsBridge::new(
        settings.server.host.clone(),
        settings.server.port,
        bus,
        Arc::new(router),
    );
    let shutdown = CancellationToken::new();
    let (addr, server) = bridge.start(shutdown.clone()).await?;
    info!("searchlens ready: ws://{}/ws", addr);

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    dispatcher.shutdown();
    shutdown.cancel();
    server.await?;
    providers.shutdown().await;

    info!("searchlens stopped");
    Ok(())
}
