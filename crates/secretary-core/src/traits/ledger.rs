// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event ledger and task reference cache.

use async_trait::async_trait;

use crate::error::SecretaryError;
use crate::event::{CreateOutcome, Event, EventUpdate, NewEvent};
use crate::task::TaskReference;
use crate::traits::adapter::PluginAdapter;

/// Audit and idempotency store keyed by `(chat_id, message_id)`.
///
/// `create_event` separates a duplicate from a real error. `update_event`
/// and `upsert_task_ref` never fail: errors are logged and reported as
/// `false`.
#[async_trait]
pub trait LedgerAdapter: PluginAdapter {
    async fn exists(&self, chat_id: i64, message_id: i64) -> Result<bool, SecretaryError>;

    /// Inserts a `Received` event. A uniqueness violation is
    /// [`CreateOutcome::Duplicate`], not an error.
    async fn create_event(&self, event: &NewEvent) -> Result<CreateOutcome, SecretaryError>;

    /// Merges the supplied fields into the event.
    async fn update_event(&self, id: i64, update: &EventUpdate) -> bool;

    async fn get_event(&self, id: i64) -> Result<Option<Event>, SecretaryError>;

    /// Failed events, newest first.
    async fn list_failed(&self, limit: usize) -> Result<Vec<Event>, SecretaryError>;

    async fn upsert_task_ref(&self, task: &TaskReference) -> bool;

    async fn get_task_ref(&self, remote_id: &str) -> Result<Option<TaskReference>, SecretaryError>;

    /// Case-insensitive substring match on the cached title. The most
    /// recently updated match wins.
    async fn find_task_by_title(
        &self,
        fragment: &str,
    ) -> Result<Option<TaskReference>, SecretaryError>;
}
