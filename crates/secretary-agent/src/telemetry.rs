// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric descriptions and recording helpers.
//!
//! Uses the metrics facade with the Prometheus exporter. The rendered text
//! is served by the gateway's `/metrics` route.

use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use secretary_core::SecretaryError;

/// Installs the process-wide Prometheus recorder and registers descriptions.
///
/// Only one recorder can be installed per process.
pub fn install_recorder() -> Result<PrometheusHandle, SecretaryError> {
    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        SecretaryError::Internal(format!("failed to install Prometheus recorder: {e}"))
    })?;
    register_metrics();
    tracing::info!("prometheus metrics recorder installed");
    Ok(handle)
}

/// Register metric descriptions. Call once after installing a recorder.
pub fn register_metrics() {
    describe_counter!(
        "secretary_events_total",
        "Voice messages processed, by final outcome"
    );
    describe_counter!(
        "secretary_actions_total",
        "Reconciliation actions recorded, by action"
    );
    describe_counter!(
        "secretary_duplicates_total",
        "Redelivered messages skipped by the idempotency check"
    );
    describe_gauge!("secretary_memory_heap_bytes", "Bytes allocated by jemalloc");
    describe_gauge!(
        "secretary_memory_resident_bytes",
        "Bytes in physically resident jemalloc pages"
    );
}

pub fn record_event(outcome: &'static str) {
    metrics::counter!("secretary_events_total", "outcome" => outcome).increment(1);
}

pub fn record_action(action: &'static str) {
    metrics::counter!("secretary_actions_total", "action" => action).increment(1);
}

pub fn record_duplicate() {
    metrics::counter!("secretary_duplicates_total").increment(1);
}

pub fn set_memory(allocated: usize, resident: usize) {
    metrics::gauge!("secretary_memory_heap_bytes").set(allocated as f64);
    metrics::gauge!("secretary_memory_resident_bytes").set(resident as f64);
}
