// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event rows: idempotent insert, merge update, lookups.

use std::str::FromStr;

use rusqlite::{OptionalExtension, Row, params};
use secretary_core::{CreateOutcome, Event, EventHandle, EventStatus, EventUpdate, NewEvent, SecretaryError};

use crate::database::{Database, map_tr_err};

const EVENT_COLUMNS: &str = "id, trace_id, chat_id, message_id, from_user_id, audio_file_id, \
     audio_duration_secs, transcription, parsed_intent, task_action, status, error_message, \
     created_at, updated_at";

/// Point lookup on the idempotency key.
pub async fn exists(db: &Database, chat_id: i64, message_id: i64) -> Result<bool, SecretaryError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM events WHERE chat_id = ?1 AND message_id = ?2)",
                params![chat_id, message_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a `received` event. A unique-key violation is a duplicate.
pub async fn create(db: &Database, event: &NewEvent) -> Result<CreateOutcome, SecretaryError> {
    let event = event.clone();
    db.connection()
        .call(move |conn| -> Result<CreateOutcome, rusqlite::Error> {
            let inserted = conn.execute(
                "INSERT INTO events (trace_id, chat_id, message_id, from_user_id, audio_file_id, audio_duration_secs)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    event.trace_id,
                    event.chat_id,
                    event.message_id,
                    event.from_user_id,
                    event.audio_file_id,
                    event.audio_duration_secs,
                ],
            );
            match inserted {
                Ok(_) => Ok(CreateOutcome::Created(EventHandle {
                    id: conn.last_insert_rowid(),
                    trace_id: event.trace_id,
                })),
                Err(e) if is_unique_violation(&e) => Ok(CreateOutcome::Duplicate),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Merge the supplied fields; absent ones keep their stored value.
/// Returns the number of rows touched.
pub async fn update(db: &Database, id: i64, update: &EventUpdate) -> Result<usize, SecretaryError> {
    let status = update.status.map(|s| s.to_string());
    let transcription = update.transcription.clone();
    let parsed_intent = update.parsed_intent.as_ref().map(|v| v.to_string());
    let task_action = update.task_action.as_ref().map(|v| v.to_string());
    let error_message = update.error_message.clone();

    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE events SET
                    status = COALESCE(?2, status),
                    transcription = COALESCE(?3, transcription),
                    parsed_intent = COALESCE(?4, parsed_intent),
                    task_action = COALESCE(?5, task_action),
                    error_message = COALESCE(?6, error_message),
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![id, status, transcription, parsed_intent, task_action, error_message],
            )
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get(db: &Database, id: i64) -> Result<Option<Event>, SecretaryError> {
    db.connection()
        .call(move |conn| -> Result<Option<Event>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
                params![id],
                event_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Failed events, newest first.
pub async fn list_failed(db: &Database, limit: usize) -> Result<Vec<Event>, SecretaryError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<Vec<Event>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM events WHERE status = 'failed'
                 ORDER BY created_at DESC, id DESC LIMIT ?1"
            ))?;
            let events = stmt
                .query_map(params![limit], event_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(events)
        })
        .await
        .map_err(map_tr_err)
}

fn event_from_row(row: &Row<'_>) -> Result<Event, rusqlite::Error> {
    let status: String = row.get(10)?;
    let status = EventStatus::from_str(&status).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(10, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Event {
        id: row.get(0)?,
        trace_id: row.get(1)?,
        chat_id: row.get(2)?,
        message_id: row.get(3)?,
        from_user_id: row.get(4)?,
        audio_file_id: row.get(5)?,
        audio_duration_secs: row.get(6)?,
        transcription: row.get(7)?,
        parsed_intent: json_column(row, 8)?,
        task_action: json_column(row, 9)?,
        status,
        error_message: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn json_column(row: &Row<'_>, idx: usize) -> Result<Option<serde_json::Value>, rusqlite::Error> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|text| {
        serde_json::from_str(&text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    })
    .transpose()
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_event(chat_id: i64, message_id: i64) -> NewEvent {
        NewEvent {
            trace_id: format!("trace-{chat_id}-{message_id}"),
            chat_id,
            message_id,
            from_user_id: Some(1001),
            audio_file_id: Some("file-abc".into()),
            audio_duration_secs: Some(4),
        }
    }

    async fn created(db: &Database, chat_id: i64, message_id: i64) -> EventHandle {
        match create(db, &new_event(chat_id, message_id)).await.unwrap() {
            CreateOutcome::Created(handle) => handle,
            CreateOutcome::Duplicate => panic!("unexpected duplicate"),
        }
    }

    #[tokio::test]
    async fn create_then_exists() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(!exists(&db, 42, 7).await.unwrap());

        let handle = created(&db, 42, 7).await;
        assert_eq!(handle.trace_id, "trace-42-7");
        assert!(exists(&db, 42, 7).await.unwrap());
        assert!(!exists(&db, 42, 8).await.unwrap());

        let event = get(&db, handle.id).await.unwrap().unwrap();
        assert_eq!(event.status, EventStatus::Received);
        assert_eq!(event.audio_duration_secs, Some(4));
        assert!(event.transcription.is_none());
    }

    #[tokio::test]
    async fn second_insert_is_duplicate() {
        let db = Database::open_in_memory().await.unwrap();
        created(&db, 42, 7).await;
        let again = create(&db, &new_event(42, 7)).await.unwrap();
        assert_eq!(again, CreateOutcome::Duplicate);

        // Same message id in another chat is a different key.
        created(&db, 43, 7).await;
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let db = Database::open_in_memory().await.unwrap();
        let handle = created(&db, 1, 1).await;

        let touched = update(
            &db,
            handle.id,
            &EventUpdate::status(EventStatus::Transcribed).with_transcription("pay the bill"),
        )
        .await
        .unwrap();
        assert_eq!(touched, 1);

        update(
            &db,
            handle.id,
            &EventUpdate::status(EventStatus::Parsed).with_parsed_intent(json!({"intent": "noop"})),
        )
        .await
        .unwrap();

        let event = get(&db, handle.id).await.unwrap().unwrap();
        assert_eq!(event.status, EventStatus::Parsed);
        assert_eq!(event.transcription.as_deref(), Some("pay the bill"));
        assert_eq!(event.parsed_intent, Some(json!({"intent": "noop"})));
        assert!(event.task_action.is_none());
    }

    #[tokio::test]
    async fn update_of_missing_row_touches_nothing() {
        let db = Database::open_in_memory().await.unwrap();
        let touched = update(&db, 999, &EventUpdate::status(EventStatus::Failed))
            .await
            .unwrap();
        assert_eq!(touched, 0);
        assert!(get(&db, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_failed_is_newest_first() {
        let db = Database::open_in_memory().await.unwrap();
        let first = created(&db, 1, 1).await;
        let ok = created(&db, 1, 2).await;
        let second = created(&db, 1, 3).await;

        for id in [first.id, second.id] {
            update(&db, id, &EventUpdate::status(EventStatus::Failed).with_error("boom"))
                .await
                .unwrap();
        }
        update(&db, ok.id, &EventUpdate::status(EventStatus::Synced)).await.unwrap();

        let failed = list_failed(&db, 10).await.unwrap();
        let ids: Vec<i64> = failed.iter().map(|e| e.id).collect();
        assert_eq!(ids, [second.id, first.id]);
        assert_eq!(failed[0].error_message.as_deref(), Some("boom"));

        assert_eq!(list_failed(&db, 1).await.unwrap().len(), 1);
    }
}
