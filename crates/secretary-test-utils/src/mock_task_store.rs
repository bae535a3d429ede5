// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory task store that records every write.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secretary_core::{
    AdapterType, HealthStatus, PluginAdapter, RemoteTask, SecretaryError, TaskDraft, TaskHandle,
    TaskPatch, TaskStoreAdapter,
};
use tokio::sync::Mutex;

pub struct MockTaskStore {
    created: Mutex<Vec<TaskDraft>>,
    updated: Mutex<Vec<(String, TaskPatch)>>,
    pending: Mutex<Vec<RemoteTask>>,
    queries: AtomicUsize,
    next_id: AtomicUsize,
    fail_writes: AtomicBool,
    write_delay: Mutex<Option<Duration>>,
}

impl MockTaskStore {
    pub fn new() -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
            queries: AtomicUsize::new(0),
            next_id: AtomicUsize::new(1),
            fail_writes: AtomicBool::new(false),
            write_delay: Mutex::new(None),
        }
    }

    /// Make every create and update fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Sleep this long inside every create and update.
    pub async fn set_write_delay(&self, delay: Option<Duration>) {
        *self.write_delay.lock().await = delay;
    }

    /// Tasks returned by `query_pending`.
    pub async fn set_pending(&self, tasks: Vec<RemoteTask>) {
        *self.pending.lock().await = tasks;
    }

    pub async fn created(&self) -> Vec<TaskDraft> {
        self.created.lock().await.clone()
    }

    pub async fn updated(&self) -> Vec<(String, TaskPatch)> {
        self.updated.lock().await.clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Creates plus updates.
    pub async fn mutation_count(&self) -> usize {
        self.created.lock().await.len() + self.updated.lock().await.len()
    }

    async fn check_writable(&self) -> Result<(), SecretaryError> {
        let delay = *self.write_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(SecretaryError::task_store("task store unavailable"))
        } else {
            Ok(())
        }
    }
}

impl Default for MockTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

/// URL the mock reports for a task id.
pub fn task_url(remote_id: &str) -> String {
    format!("https://tasks.example/{remote_id}")
}

#[async_trait]
impl PluginAdapter for MockTaskStore {
    fn name(&self) -> &str {
        "mock-task-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::TaskStore
    }

    async fn health_check(&self) -> Result<HealthStatus, SecretaryError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl TaskStoreAdapter for MockTaskStore {
    async fn create_task(&self, draft: &TaskDraft) -> Result<TaskHandle, SecretaryError> {
        self.check_writable().await?;
        let remote_id = format!("task-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.created.lock().await.push(draft.clone());
        Ok(TaskHandle {
            url: Some(task_url(&remote_id)),
            remote_id,
        })
    }

    async fn update_task(
        &self,
        remote_id: &str,
        patch: &TaskPatch,
    ) -> Result<TaskHandle, SecretaryError> {
        self.check_writable().await?;
        self.updated
            .lock()
            .await
            .push((remote_id.to_string(), patch.clone()));
        Ok(TaskHandle {
            remote_id: remote_id.to_string(),
            url: Some(task_url(remote_id)),
        })
    }

    async fn query_pending(&self, limit: usize) -> Result<Vec<RemoteTask>, SecretaryError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .pending
            .lock()
            .await
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }
}
