//! Shutter server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use shutter_core::config::AppConfig;
use shutter_metadata::JsonStore;
use shutter_server::bootstrap::seed_project_images;
use shutter_server::{AppState, create_router};
use shutter_storage::FileStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shutter - a minimal image-hosting HTTP API
#[derive(Parser, Debug)]
#[command(name = "shutterd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "SHUTTER_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Shutter v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("SHUTTER_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    if config.auth.api_key.is_none() {
        anyhow::bail!(
            "No API key configured.\n\n\
             Provide one via the SHUTTER_AUTH__API_KEY environment variable or the\n\
             [auth] section of the config file. See config/server.example.toml."
        );
    }
    if config.auth.is_dev_default() {
        tracing::warn!("Using the built-in development API key; do not expose this server");
    }

    // Initialize the file store (creates both directories if missing)
    let files = Arc::new(
        FileStore::new(&config.storage.project_dir, &config.storage.upload_dir)
            .await
            .context("failed to initialize file store")?,
    );
    tracing::info!("File store initialized");

    // Load the metadata document
    let index = Arc::new(
        JsonStore::open(&config.metadata.path)
            .await
            .context("failed to load metadata document")?,
    );
    tracing::info!(records = index.len().await, "Metadata store loaded");

    // Register project images on first run
    seed_project_images(&files, &index)
        .await
        .context("failed to register project images")?;

    // Create application state and router
    let state = AppState::new(config.clone(), files, index);
    let app = create_router(state);

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
