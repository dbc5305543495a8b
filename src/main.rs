//! Arenaops - operational control plane for match runners and the compute grid.
//!
//! Main entry point for the arenaops CLI and server.

mod cli;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use arenaops_api::{ApiConfig, ApiServer, AppState};
use arenaops_compute::{GridClientConfig, GridComputeClient};
use arenaops_config::{Config, ConfigLoader};
use arenaops_runner::{ProcessRunnerRegistry, RunnerRegistryConfig};

use crate::cli::{Cli, Commands};

/// Get the .arenaops directory path.
fn arenaops_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".arenaops"))
        .unwrap_or_else(|| PathBuf::from(".arenaops"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.arenaops/debug/ with daily rotation.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = arenaops_dir().join("debug");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("arenaops")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the writer guard alive for the program duration
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        // Console layer (human-readable text format with colors)
        .with(fmt::layer().with_target(true).with_ansi(true))
        // File layer (text format without colors)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load configuration, falling back to defaults when the file is absent.
fn load_config(path: &Path) -> Config {
    match ConfigLoader::load(path) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                "Failed to load config {}: {} (using defaults)",
                path.display(),
                e
            );
            Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(&cli.config);

    match cli.command {
        None => run_server(config, None, None).await,
        Some(Commands::Run { host, port }) => run_server(config, host, port).await,
        Some(Commands::Status { url, match_id }) => show_status(&url, match_id.as_deref()).await,
    }
}

/// Run the server in foreground.
async fn run_server(
    config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info!("Starting arenaops v{}", env!("CARGO_PKG_VERSION"));

    // Construct the collaborators once; handlers receive them via AppState
    let registry = Arc::new(ProcessRunnerRegistry::new(RunnerRegistryConfig {
        command: config.runner.command.clone(),
        args: config.runner.args.clone(),
        max_concurrent: config.runner.max_concurrent,
    }));
    info!("Runner registry ready (command: {})", config.runner.command);

    let compute = Arc::new(GridComputeClient::new(GridClientConfig {
        base_url: config.compute.base_url.clone(),
        api_token: config.compute.api_token.clone(),
        inference_log_limit: config.compute.inference_log_limit,
    }));
    info!("Compute grid gateway: {}", config.compute.base_url);

    let state = Arc::new(AppState::new(compute, registry));
    let server = ApiServer::new(ApiConfig::new(&host, port), state);

    info!("arenaops ready:");
    info!("  API Server: http://{}:{}", host, port);
    info!("");
    info!("API Endpoints:");
    info!("  GET  /compute/status - Compute grid report");
    info!("  GET  /runner/status  - Runner status");
    info!("  POST /runner/launch  - Launch runner");
    info!("  POST /runner/stop    - Stop runner");

    // Run server (this will block until shutdown)
    server.run().await?;

    info!("Shutting down...");
    Ok(())
}

/// Query a running instance and print runner status.
async fn show_status(
    url: &str,
    match_id: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut request_url = format!("{}/runner/status", url.trim_end_matches('/'));
    if let Some(id) = match_id {
        request_url = format!("{}?matchId={}", request_url, id);
    }

    let body: serde_json::Value = reqwest::get(&request_url).await?.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    Ok(())
}
