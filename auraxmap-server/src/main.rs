//! auraxmap-server - HTTP host for the map read API
//!
//! Loads the world topology at startup (refusing to start on a corrupt
//! graph), spawns the ownership refresh loop, and serves the read-only
//! HTTP surface until shutdown.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use auraxmap::config::{ConfigFile, SourceKind};
use auraxmap::graph::WorldGraph;
use auraxmap::logging::{default_log_dir, default_log_file, init_logging};
use auraxmap::ownership::{OwnershipOverlay, OwnershipRefresher};
use auraxmap::query::{QueryService, TrackingConfig};
use auraxmap::source::{DataSource, JsonDirectorySource, RestSource};

use auraxmap_server::api::{self, AppState};

#[derive(Parser)]
#[command(name = "auraxmap-server")]
#[command(about = "Serve the read-only world map API", long_about = None)]
#[command(version = auraxmap::VERSION)]
struct Args {
    /// Path to the INI configuration file
    #[arg(long, default_value = "auraxmap.ini")]
    config: PathBuf,

    /// Override the listener host from the config file
    #[arg(long)]
    host: Option<String>,

    /// Override the listener port from the config file
    #[arg(long)]
    port: Option<u16>,

    /// Override the JSON data directory from the config file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the static asset directory from the config file
    #[arg(long)]
    asset_dir: Option<PathBuf>,
}

impl Args {
    /// Load the configuration file and apply the CLI overrides.
    fn resolve_config(&self) -> anyhow::Result<ConfigFile> {
        let mut config = ConfigFile::load_from(&self.config)
            .with_context(|| format!("loading config from {}", self.config.display()))?;
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.data_dir {
            config.data.data_dir = dir.clone();
        }
        if let Some(dir) = &self.asset_dir {
            config.data.asset_dir = dir.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _guard = match init_logging(default_log_dir(), default_log_file()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Failed to initialize logging: {}", err);
            process::exit(1);
        }
    };

    if let Err(err) = run(&args).await {
        error!(error = %err, "server startup failed");
        process::exit(1);
    }
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.resolve_config()?;
    info!(version = auraxmap::VERSION, "starting auraxmap-server");

    match config.data.source {
        SourceKind::Json => {
            let source = JsonDirectorySource::new(config.data.data_dir.clone());
            serve(source, config).await
        }
        SourceKind::Rest => {
            let url = config
                .data
                .upstream_url
                .clone()
                .context("rest source requires data.upstream_url")?;
            serve(RestSource::new(url), config).await
        }
    }
}

/// Load the world, start the refresh loop, and serve until shutdown.
async fn serve<D: DataSource + 'static>(source: D, config: ConfigFile) -> anyhow::Result<()> {
    // A corrupt topology must never be served; abort startup instead
    let graph = Arc::new(
        WorldGraph::load(&source)
            .await
            .context("refusing to start on invalid world topology")?,
    );

    let overlay = OwnershipOverlay::new();
    let refresher = OwnershipRefresher::new(
        source,
        Arc::clone(&graph),
        overlay.clone(),
        config.refresh.interval(),
    );
    let warmed = refresher.refresh_all().await;
    info!(pairs = warmed, "initial ownership refresh complete");
    tokio::spawn(refresher.run());

    let service = QueryService::new(
        graph,
        overlay,
        TrackingConfig {
            continents: config.tracking.continents.clone(),
            servers: config.tracking.servers.clone(),
        },
    );
    let state = AppState {
        query: Arc::new(service),
        asset_dir: config.data.asset_dir.clone(),
    };

    let bind_address = config.server.bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {}", bind_address))?;
    info!(address = %bind_address, "listening");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install shutdown signal handler");
    }
}
