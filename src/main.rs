//! Lumina - AI-Assisted Personal Note Capture
//!
//! Serves the capture API, the daily focus summary, and the settings
//! endpoints over HTTP.

use anyhow::Result;
use clap::{Parser, Subcommand};
use lumina::{
    api::build_app,
    config::{LuminaConfig, StoreBackend},
    insight::GeminiProvider,
    service::EntryService,
    settings::{SettingsState, SettingsStore},
    store::open_store,
    workspace::Workspace,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lumina")]
#[command(version)]
#[command(about = "AI-assisted personal note capture")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LUMINA_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Lumina server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Storage backend
        #[arg(long, value_enum)]
        backend: Option<StoreBackend>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lumina={},tower_http=debug", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        LuminaConfig::load(config_path)?
    } else {
        LuminaConfig::default()
    };

    match cli.command {
        Commands::Serve {
            host,
            port,
            backend,
        } => {
            run_server(config, host, port, backend).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_server(
    mut config: LuminaConfig,
    host: Option<String>,
    port: Option<u16>,
    backend: Option<StoreBackend>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(backend) = backend {
        config.storage.backend = backend;
    }

    tracing::info!("Starting Lumina");

    let shared_key = config
        .insight
        .api_key
        .clone()
        .or_else(|| std::env::var("LUMINA_API_KEY").ok());

    let store = open_store(&config.storage).await?;
    let settings = Arc::new(SettingsStore::load(&config.storage.data_dir, shared_key));
    let provider = Arc::new(GeminiProvider::new(&config.insight)?);
    let service = Arc::new(EntryService::new(store, provider.clone(), settings.clone()));
    let workspace = Arc::new(Workspace::new(service));

    if let Err(e) = workspace.refresh().await {
        tracing::warn!("Failed to pre-load entries: {}", e);
    }

    let settings_state = SettingsState {
        settings,
        workspace: workspace.clone(),
        provider,
    };
    let app = build_app(workspace, settings_state, &config.server.cors_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Lumina listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn show_config(config: Option<&LuminaConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
