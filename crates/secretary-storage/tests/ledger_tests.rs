// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger behavior across independent connections to one database file.

use std::sync::Arc;

use secretary_config::model::StorageConfig;
use secretary_core::{
    CreateOutcome, EventStatus, EventUpdate, LedgerAdapter, NewEvent, PluginAdapter,
};
use secretary_storage::SqliteLedger;

fn new_event(chat_id: i64, message_id: i64, trace: &str) -> NewEvent {
    NewEvent {
        trace_id: trace.to_string(),
        chat_id,
        message_id,
        from_user_id: None,
        audio_file_id: Some("voice-file".into()),
        audio_duration_secs: Some(3),
    }
}

async fn open(path: &std::path::Path) -> Arc<SqliteLedger> {
    let config = StorageConfig {
        database_path: path.display().to_string(),
        wal_mode: true,
    };
    Arc::new(SqliteLedger::open(&config).await.unwrap())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_inserts_of_same_key_yield_one_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    let first = open(&path).await;
    let second = open(&path).await;

    // Both writers pass the pre-check before either inserts.
    assert!(!first.exists(42, 7).await.unwrap());
    assert!(!second.exists(42, 7).await.unwrap());

    let a = {
        let ledger = first.clone();
        tokio::spawn(async move { ledger.create_event(&new_event(42, 7, "a")).await })
    };
    let b = {
        let ledger = second.clone();
        tokio::spawn(async move { ledger.create_event(&new_event(42, 7, "b")).await })
    };
    let outcomes = [a.await.unwrap().unwrap(), b.await.unwrap().unwrap()];

    let created = outcomes
        .iter()
        .filter(|o| matches!(o, CreateOutcome::Created(_)))
        .count();
    let duplicates = outcomes
        .iter()
        .filter(|o| matches!(o, CreateOutcome::Duplicate))
        .count();
    assert_eq!((created, duplicates), (1, 1));
    assert!(first.exists(42, 7).await.unwrap());
    assert!(second.exists(42, 7).await.unwrap());
}

#[tokio::test]
async fn progress_accumulates_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");

    let id = {
        let ledger = open(&path).await;
        let CreateOutcome::Created(handle) = ledger.create_event(&new_event(1, 2, "t")).await.unwrap()
        else {
            panic!("expected a new event");
        };
        assert!(
            ledger
                .update_event(
                    handle.id,
                    &EventUpdate::status(EventStatus::Transcribed).with_transcription("hello")
                )
                .await
        );
        assert!(
            ledger
                .update_event(
                    handle.id,
                    &EventUpdate::status(EventStatus::Failed).with_error("notion timeout")
                )
                .await
        );
        ledger.shutdown().await.unwrap();
        handle.id
    };

    let ledger = open(&path).await;
    let event = ledger.get_event(id).await.unwrap().unwrap();
    assert_eq!(event.status, EventStatus::Failed);
    assert_eq!(event.transcription.as_deref(), Some("hello"));
    assert_eq!(event.error_message.as_deref(), Some("notion timeout"));

    let failed = ledger.list_failed(5).await.unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id, id);
}
