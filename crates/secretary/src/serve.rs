// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `secretary serve` command implementation.
//!
//! Builds every collaborator once from validated configuration, injects them
//! into the engine and hosts the webhook until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use secretary_agent::{Adapters, Engine, EngineConfig, telemetry};
use secretary_config::SecretaryConfig;
use secretary_core::{HealthStatus, SecretaryError};
use secretary_gateway::{GatewayState, ServerConfig, start_server};
use secretary_notion::NotionTaskStore;
use secretary_openai::{ChatIntentParser, WhisperTranscriber, client_from_config};
use secretary_storage::SqliteLedger;
use secretary_telegram::TelegramChannel;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs the `secretary serve` command.
pub async fn run_serve(config: SecretaryConfig) -> Result<(), SecretaryError> {
    crate::init_tracing(&config.agent.log_level);
    info!(name = %config.agent.name, mode = %config.workflow.mode, "starting secretary serve");

    let engine = Arc::new(build_engine(&config).await?);
    log_health(&engine).await;
    let metrics = telemetry::install_recorder()?;

    let state = GatewayState::new(engine.clone(), &config.telegram)
        .with_metrics(Arc::new(move || metrics.render()));
    if state.webhook_secret.is_none() {
        warn!("telegram.webhook_secret is not set, webhook requests are not authenticated");
    }
    if state.allowed_users.is_empty() {
        warn!("telegram.allowed_users is empty, every sender will be ignored");
    }

    let cancel = install_signal_handler();

    #[cfg(not(target_env = "msvc"))]
    {
        let cancel = cancel.clone();
        tokio::spawn(async move { memory_monitor(MEMORY_SAMPLE_INTERVAL, cancel).await });
    }

    let result = start_server(&ServerConfig::from(&config.gateway), state, cancel).await;

    engine.shutdown().await;
    info!("secretary stopped");
    result
}

/// Construct every collaborator from configuration and wire the engine.
pub async fn build_engine(config: &SecretaryConfig) -> Result<Engine, SecretaryError> {
    secretary_config::validation::require_credentials(config).map_err(|errors| {
        let missing: Vec<String> = errors.iter().map(ToString::to_string).collect();
        SecretaryError::Config(missing.join("; "))
    })?;

    let mode = config.workflow.mode;
    let ledger = Arc::new(SqliteLedger::open(&config.storage).await?);
    let channel = Arc::new(TelegramChannel::new(&config.telegram)?);
    let openai = client_from_config(&config.openai)?;
    let transcriber = Arc::new(WhisperTranscriber::new(openai.clone(), &config.openai));
    let intent_parser = Arc::new(ChatIntentParser::new(openai, &config.openai, mode));
    let task_store = Arc::new(NotionTaskStore::from_config(&config.notion, mode)?);

    debug!(database = %config.storage.database_path, "collaborators constructed");

    let adapters = Adapters {
        channel,
        transcriber,
        intent_parser,
        task_store,
        ledger,
    };
    Ok(Engine::new(adapters, EngineConfig::from_config(config)))
}

async fn log_health(engine: &Engine) {
    for (name, status) in engine.health().await {
        match status {
            HealthStatus::Healthy => info!(adapter = %name, "adapter healthy"),
            HealthStatus::Degraded(reason) => {
                warn!(adapter = %name, reason = %reason, "adapter degraded")
            }
            HealthStatus::Unhealthy(reason) => {
                warn!(adapter = %name, reason = %reason, "adapter unhealthy")
            }
        }
    }
}

#[cfg(not(target_env = "msvc"))]
const MEMORY_SAMPLE_INTERVAL: Duration = Duration::from_secs(60);

/// Samples jemalloc heap statistics into gauges until cancelled.
#[cfg(not(target_env = "msvc"))]
async fn memory_monitor(every: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let (allocated, resident) = jemalloc_stats();
                telemetry::set_memory(allocated, resident);
                debug!(
                    allocated_mb = allocated / (1024 * 1024),
                    resident_mb = resident / (1024 * 1024),
                    "memory sample"
                );
            }
            _ = cancel.cancelled() => {
                debug!("memory monitor shutting down");
                return;
            }
        }
    }
}

/// Fresh `(allocated, resident)` byte counts; zero when unavailable.
#[cfg(not(target_env = "msvc"))]
fn jemalloc_stats() -> (usize, usize) {
    if let Err(e) = tikv_jemalloc_ctl::epoch::advance() {
        warn!(error = %e, "jemalloc epoch advance failed");
    }
    let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
    let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
    (allocated, resident)
}

/// Returns a token cancelled on SIGINT or SIGTERM.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => info!("received SIGINT, shutting down"),
                        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C");
                    let _ = ctrl_c.await;
                    info!("received SIGINT, shutting down");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, shutting down");
        }

        trigger.cancel();
    });

    token
}
