mod api;
mod bot;
mod metrics;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::Bot;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hls_relay_core::{
    create_link_resolver, load_config, validate_config,
    telegram::{ChannelStorage, TelegramSource, TelegramStatusSink},
    BucketStorage, Config, FfmpegTranscoder, Pipeline, SanitizedConfig, Storage, StorageBackend,
    Transcoder,
};

use api::create_router;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("HLS_RELAY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!(
        "Configuration loaded: {}",
        serde_json::to_string(&SanitizedConfig::from(&config))?
    );

    let bot = Bot::new(&config.telegram.bot_token);

    let transcoder = FfmpegTranscoder::new(config.transcoder.clone());
    if config.pipeline.enable_hls {
        match transcoder.validate().await {
            Ok(()) => info!("FFmpeg available at {:?}", config.transcoder.ffmpeg_path),
            Err(e) => warn!("FFmpeg check failed, conversions will fail: {}", e),
        }
    } else {
        info!("HLS conversion disabled, originals are relayed as-is");
    }

    let storage = create_storage(&config, &bot)?;
    info!("Using storage backend: {}", storage.name());
    if let Err(e) = storage.check_access().await {
        warn!("Storage is not writable yet: {}", e);
        if let Some(hint) = e.remediation() {
            warn!("{}", hint);
        }
    }

    tokio::fs::create_dir_all(&config.pipeline.temp_dir)
        .await
        .with_context(|| format!("Failed to create {:?}", config.pipeline.temp_dir))?;

    let pipeline = Arc::new(Pipeline::new(
        config.pipeline.clone(),
        Arc::new(TelegramSource::new(bot.clone())),
        Arc::new(transcoder),
        storage,
        create_link_resolver(&config),
        Arc::new(TelegramStatusSink::new(bot.clone())),
    ));
    info!("Pipeline ready (link strategy: {})", config.link.strategy);

    // Start liveness server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting liveness server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    let server = tokio::spawn(async move {
        axum::serve(listener, create_router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    info!("HLS relay v{} polling for updates", VERSION);
    bot::run(bot, pipeline).await;

    info!("Bot stopped, waiting for liveness server...");
    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Liveness server error: {}", e),
        Err(e) => warn!("Liveness server task failed: {}", e),
    }

    Ok(())
}

fn create_storage(config: &Config, bot: &Bot) -> Result<Arc<dyn Storage>> {
    match config.storage.backend() {
        StorageBackend::Telegram => Ok(Arc::new(ChannelStorage::new(
            bot.clone(),
            config.telegram.channel_id,
        ))),
        StorageBackend::ObjectStore => {
            let object_store = config
                .storage
                .object_store
                .as_ref()
                .context("storage.object_store must be set when use_object_store is true")?;
            let storage = BucketStorage::new(object_store)
                .context("Failed to initialize object store client")?;
            Ok(Arc::new(storage))
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
