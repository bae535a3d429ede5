// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote task store (the source of truth for task state).

use async_trait::async_trait;

use crate::error::SecretaryError;
use crate::task::{RemoteTask, TaskDraft, TaskHandle, TaskPatch};
use crate::traits::adapter::PluginAdapter;

#[async_trait]
pub trait TaskStoreAdapter: PluginAdapter {
    /// Creates a task and returns its remote identity.
    async fn create_task(&self, draft: &TaskDraft) -> Result<TaskHandle, SecretaryError>;

    /// Patches only the fields present in `patch`.
    async fn update_task(
        &self,
        remote_id: &str,
        patch: &TaskPatch,
    ) -> Result<TaskHandle, SecretaryError>;

    /// Up to `limit` tasks not in the terminal column, store order.
    async fn query_pending(&self, limit: usize) -> Result<Vec<RemoteTask>, SecretaryError>;
}
