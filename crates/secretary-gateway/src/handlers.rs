// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook and liveness handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use secretary_agent::ProcessOutcome;
use secretary_telegram::{Disposition, parse_update, screen_update};
use serde_json::{Value, json};
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use crate::server::GatewayState;

/// Header Telegram echoes the configured webhook secret in.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Handles one Telegram delivery. Always acknowledges.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    if !secret_matches(state.webhook_secret.as_deref(), &headers) {
        warn!("webhook secret mismatch, dropping update");
        return ack();
    }

    let update = match parse_update(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "dropping undecodable update");
            return ack();
        }
    };

    let voice = match screen_update(&update, &state.allowed_users) {
        Disposition::Voice(voice) => voice,
        Disposition::Ignored(reason) => {
            debug!(reason = reason.as_str(), "update ignored");
            return ack();
        }
    };

    match state.engine.process(&voice).await {
        ProcessOutcome::Duplicate => debug!("duplicate delivery acknowledged"),
        ProcessOutcome::Synced { event_id, action } => {
            info!(event_id, action = action.name(), "delivery processed");
        }
        ProcessOutcome::Failed { event_id, error } => {
            warn!(?event_id, error = %error, "delivery failed");
        }
    }
    ack()
}

pub async fn get_webhook() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Secretary webhook is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn get_health(State(state): State<GatewayState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "mode": state.engine.config().mode.to_string(),
    }))
}

pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.metrics_render {
        Some(render) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Compares in constant time for equal-length secrets.
fn secret_matches(expected: Option<&str>, headers: &HeaderMap) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|provided| bool::from(provided.as_bytes().ct_eq(expected.as_bytes())))
}

fn ack() -> Json<Value> {
    Json(json!({ "ok": true }))
}
