// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `secretary failed` and `secretary reprocess` command implementations.
//!
//! Failed events are never retried automatically; these commands are the
//! out-of-band sweep over them.

use secretary_agent::ProcessOutcome;
use secretary_config::SecretaryConfig;
use secretary_core::{Event, LedgerAdapter, SecretaryError};
use secretary_storage::SqliteLedger;

/// Longest error text shown per row in table output.
const ERROR_PREVIEW_CHARS: usize = 60;

/// Runs the `secretary failed` command. Only touches the ledger.
pub async fn run_failed(
    config: &SecretaryConfig,
    limit: usize,
    json: bool,
) -> Result<(), SecretaryError> {
    let ledger = SqliteLedger::open(&config.storage).await?;
    let report = failed_report(&ledger, limit, json).await?;
    println!("{report}");
    Ok(())
}

/// Runs the `secretary reprocess <id>` command.
pub async fn run_reprocess(config: SecretaryConfig, id: i64) -> Result<(), SecretaryError> {
    crate::init_tracing(&config.agent.log_level);

    let engine = crate::serve::build_engine(&config).await?;
    let event = engine
        .ledger()
        .get_event(id)
        .await?
        .ok_or_else(|| SecretaryError::Internal(format!("no event with id {id}")))?;

    let outcome = engine.reprocess(&event).await;
    engine.shutdown().await;
    println!("{}", describe_outcome(&outcome?));
    Ok(())
}

pub(crate) async fn failed_report(
    ledger: &dyn LedgerAdapter,
    limit: usize,
    json: bool,
) -> Result<String, SecretaryError> {
    let events = ledger.list_failed(limit).await?;

    if json {
        return serde_json::to_string_pretty(&events)
            .map_err(|e| SecretaryError::Internal(format!("failed to encode events: {e}")));
    }
    if events.is_empty() {
        return Ok("no failed events".to_string());
    }

    let mut lines = vec![format!(
        "{:>6}  {:<24}  {:<20}  ERROR",
        "ID", "ORIGIN", "UPDATED"
    )];
    lines.extend(events.iter().map(format_row));
    Ok(lines.join("\n"))
}

fn format_row(event: &Event) -> String {
    let origin = format!("{}:{}", event.chat_id, event.message_id);
    let error = event.error_message.as_deref().unwrap_or("-");
    let error: String = if error.chars().count() > ERROR_PREVIEW_CHARS {
        let cut: String = error.chars().take(ERROR_PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        error.to_string()
    };
    format!(
        "{:>6}  {:<24}  {:<20}  {}",
        event.id, origin, event.updated_at, error
    )
}

pub(crate) fn describe_outcome(outcome: &ProcessOutcome) -> String {
    match outcome {
        ProcessOutcome::Duplicate => "event was already being processed".to_string(),
        ProcessOutcome::Synced { event_id, action } => {
            format!("event {event_id} synced: {}", action.name())
        }
        ProcessOutcome::Failed {
            event_id: Some(id),
            error,
        } => format!("event {id} failed again: {error}"),
        ProcessOutcome::Failed {
            event_id: None,
            error,
        } => format!("event failed: {error}"),
    }
}
