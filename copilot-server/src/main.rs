//! Copilot Gateway Server - Headless Daemon
//!
//! Serves an OpenAI-compatible API on /v1/* backed by GitHub Copilot:
//! - exchanges client credentials for upstream tokens and caches them
//! - rotates per-credential session identifiers
//! - rewrites upstream replies into OpenAI response shapes
//!
//! Configuration comes from flags, environment and an optional `config.env`.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod scheduler;
mod server_utils;
mod startup;

use cli::Cli;
use copilot_core::{build_proxy_router, open_credential_store, AppState, GatewayConfig};

fn init_tracing(config: &GatewayConfig) -> Result<()> {
    let filter = EnvFilter::try_new(config.effective_log_level())
        .unwrap_or_else(|_| EnvFilter::new(copilot_types::models::config::DEFAULT_LOG_LEVEL));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing config.env is fine; flags and the process environment still apply.
    let _ = dotenvy::from_filename("config.env");

    let (config, mut warnings) = Cli::parse().into_config();
    init_tracing(&config)?;

    warnings.extend(startup::startup_warnings(&config));
    for warning in &warnings {
        warn!("{}", warning);
    }
    startup::log_configuration(&config);

    let store = open_credential_store(&config).await?;
    let state = AppState::from_config(&config, Arc::clone(&store))?;
    let app = build_proxy_router(state);

    let sweeper = scheduler::spawn_sweep_task(Arc::clone(&store), config.sweep_interval_secs);

    let listener = server_utils::create_listener(&config).await?;
    info!("Server listening on http://{}", listener.local_addr()?);
    info!("Local endpoint: http://127.0.0.1:{}/v1/chat/completions", config.port);

    axum::serve(listener, app).with_graceful_shutdown(server_utils::shutdown_signal()).await?;

    sweeper.abort();
    let removed = scheduler::sweep_once(store.as_ref()).await;
    info!("Shutdown complete ({} stale credential(s) swept)", removed);

    Ok(())
}
