// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use axum::{Router, routing::get};
use secretary_agent::Engine;
use secretary_config::model::{GatewayConfig, TelegramConfig};
use secretary_core::SecretaryError;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub engine: Arc<Engine>,
    /// Numeric ids or `@usernames` allowed to talk to the bot.
    pub allowed_users: Arc<Vec<String>>,
    /// Expected `X-Telegram-Bot-Api-Secret-Token`; `None` skips the check.
    pub webhook_secret: Option<Arc<str>>,
    pub start_time: Instant,
    /// Renders Prometheus text for `/metrics`; `None` disables the route.
    pub metrics_render: Option<MetricsRender>,
}

pub type MetricsRender = Arc<dyn Fn() -> String + Send + Sync>;

impl GatewayState {
    pub fn new(engine: Arc<Engine>, telegram: &TelegramConfig) -> Self {
        Self {
            engine,
            allowed_users: Arc::new(telegram.allowed_users.clone()),
            webhook_secret: telegram
                .webhook_secret
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(Arc::from),
            start_time: Instant::now(),
            metrics_render: None,
        }
    }

    pub fn with_metrics(mut self, render: MetricsRender) -> Self {
        self.metrics_render = Some(render);
        self
    }
}

impl fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayState")
            .field("allowed_users", &self.allowed_users)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "[redacted]"))
            .field("metrics", &self.metrics_render.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub webhook_path: String,
}

impl From<&GatewayConfig> for ServerConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            webhook_path: config.webhook_path.clone(),
        }
    }
}

/// Routes:
/// - `POST {webhook_path}`: Telegram updates
/// - `GET {webhook_path}`: webhook liveness
/// - `GET /health`: process liveness
/// - `GET /metrics`: Prometheus text, 404 when no recorder is installed
pub fn build_router(config: &ServerConfig, state: GatewayState) -> Router {
    Router::new()
        .route(
            &config.webhook_path,
            get(handlers::get_webhook).post(handlers::post_webhook),
        )
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds and serves until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), SecretaryError> {
    let app = build_router(config, state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SecretaryError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!(webhook_path = %config.webhook_path, "gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| SecretaryError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_from_gateway_section() {
        let config = ServerConfig::from(&GatewayConfig::default());
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.webhook_path, "/api/telegram/webhook");
    }
}
