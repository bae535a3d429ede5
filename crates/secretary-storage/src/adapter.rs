// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`LedgerAdapter`].

use async_trait::async_trait;
use tracing::{debug, warn};

use secretary_config::model::StorageConfig;
use secretary_core::{
    AdapterType, CreateOutcome, Event, EventUpdate, HealthStatus, LedgerAdapter, NewEvent,
    PluginAdapter, SecretaryError, TaskReference,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed event ledger and task reference cache.
pub struct SqliteLedger {
    db: Database,
}

impl SqliteLedger {
    /// Open the ledger at the configured path, running migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, SecretaryError> {
        let db = Database::open_with(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite ledger initialized");
        Ok(Self { db })
    }

    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl PluginAdapter for SqliteLedger {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Ledger
    }

    async fn health_check(&self) -> Result<HealthStatus, SecretaryError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> { conn.execute_batch("SELECT 1;") })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SecretaryError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
            })
            .await
            .map_err(map_tr_err)?;
        debug!("shutdown: WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl LedgerAdapter for SqliteLedger {
    async fn exists(&self, chat_id: i64, message_id: i64) -> Result<bool, SecretaryError> {
        queries::events::exists(&self.db, chat_id, message_id).await
    }

    async fn create_event(&self, event: &NewEvent) -> Result<CreateOutcome, SecretaryError> {
        queries::events::create(&self.db, event).await
    }

    async fn update_event(&self, id: i64, update: &EventUpdate) -> bool {
        match queries::events::update(&self.db, id, update).await {
            Ok(1) => true,
            Ok(_) => {
                warn!(event_id = id, "event update matched no row");
                false
            }
            Err(e) => {
                warn!(event_id = id, error = %e, "event update failed");
                false
            }
        }
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>, SecretaryError> {
        queries::events::get(&self.db, id).await
    }

    async fn list_failed(&self, limit: usize) -> Result<Vec<Event>, SecretaryError> {
        queries::events::list_failed(&self.db, limit).await
    }

    async fn upsert_task_ref(&self, task: &TaskReference) -> bool {
        match queries::tasks::upsert(&self.db, task).await {
            Ok(()) => true,
            Err(e) => {
                warn!(remote_id = %task.remote_id, error = %e, "task reference upsert failed");
                false
            }
        }
    }

    async fn get_task_ref(&self, remote_id: &str) -> Result<Option<TaskReference>, SecretaryError> {
        queries::tasks::get(&self.db, remote_id).await
    }

    async fn find_task_by_title(
        &self,
        fragment: &str,
    ) -> Result<Option<TaskReference>, SecretaryError> {
        queries::tasks::find_by_title(&self.db, fragment).await
    }
}
