// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notion database as the remote task store.
//!
//! Each task is a page in one database. Column labels come from the
//! configured [`WorkflowMode`], so a board never receives labels from the
//! other configuration.

pub mod client;
pub mod properties;

use std::time::Duration;

use async_trait::async_trait;
use secretary_config::model::NotionConfig;
use secretary_core::{
    AdapterType, HealthStatus, PluginAdapter, RemoteTask, SecretaryError, TaskDraft, TaskHandle,
    TaskPatch, TaskStoreAdapter,
};
use secretary_kanban::WorkflowMode;
use serde_json::{Value, json};
use tracing::{debug, info};

pub use client::NotionClient;
use properties::{Page, QueryResponse};

/// Notion caps `page_size` at 100.
const MAX_PAGE_SIZE: usize = 100;

pub struct NotionTaskStore {
    client: NotionClient,
    database_id: String,
    mode: WorkflowMode,
}

impl NotionTaskStore {
    /// Build from configuration. Token and database id are required.
    pub fn from_config(config: &NotionConfig, mode: WorkflowMode) -> Result<Self, SecretaryError> {
        let token = required(config.token.as_deref(), "notion.token")?;
        let database_id = required(config.database_id.as_deref(), "notion.database_id")?;
        let client = NotionClient::new(
            token,
            &config.api_version,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(database_id, %mode, "notion task store initialized");
        Ok(Self::new(client, database_id, mode))
    }

    pub fn new(client: NotionClient, database_id: impl Into<String>, mode: WorkflowMode) -> Self {
        Self {
            client,
            database_id: database_id.into(),
            mode,
        }
    }

    fn ensure_states(&self, draft_state: Option<secretary_kanban::WorkflowState>) -> Result<(), SecretaryError> {
        if let Some(state) = draft_state {
            self.mode.ensure(state)?;
        }
        Ok(())
    }
}

fn required<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str, SecretaryError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SecretaryError::Config(format!("{key} is required")))
}

fn handle(page: Page) -> TaskHandle {
    TaskHandle {
        remote_id: page.id,
        url: page.url,
    }
}

#[async_trait]
impl PluginAdapter for NotionTaskStore {
    fn name(&self) -> &str {
        "notion"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::TaskStore
    }

    /// Reads the database metadata; a failure means bad credentials or id.
    async fn health_check(&self) -> Result<HealthStatus, SecretaryError> {
        match self
            .client
            .get::<Value>(&format!("databases/{}", self.database_id))
            .await
        {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl TaskStoreAdapter for NotionTaskStore {
    async fn create_task(&self, draft: &TaskDraft) -> Result<TaskHandle, SecretaryError> {
        self.ensure_states(Some(draft.state))?;
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": properties::draft_properties(draft),
        });
        let page: Page = self.client.post("pages", &body).await?;
        debug!(remote_id = %page.id, "notion page created");
        Ok(handle(page))
    }

    async fn update_task(
        &self,
        remote_id: &str,
        patch: &TaskPatch,
    ) -> Result<TaskHandle, SecretaryError> {
        self.ensure_states(patch.state)?;
        let body = json!({ "properties": properties::patch_properties(patch) });
        let page: Page = self.client.patch(&format!("pages/{remote_id}"), &body).await?;
        debug!(remote_id = %page.id, "notion page updated");
        Ok(handle(page))
    }

    async fn query_pending(&self, limit: usize) -> Result<Vec<RemoteTask>, SecretaryError> {
        let body = json!({
            "filter": {
                "property": properties::STATUS,
                "select": { "does_not_equal": self.mode.done_state().label() },
            },
            "sorts": [{ "timestamp": "created_time", "direction": "descending" }],
            "page_size": limit.clamp(1, MAX_PAGE_SIZE),
        });
        let response: QueryResponse = self
            .client
            .post(&format!("databases/{}/query", self.database_id), &body)
            .await?;
        let mut tasks = response.into_tasks();
        tasks.truncate(limit);
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secretary_kanban::{PriorityLevel, PriorityState, SimpleState, WorkflowState};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(uri: &str, mode: WorkflowMode) -> NotionTaskStore {
        let client = NotionClient::new("secret_test", "2022-06-28", uri, Duration::from_secs(5)).unwrap();
        NotionTaskStore::new(client, "db-1", mode)
    }

    fn draft(state: WorkflowState) -> TaskDraft {
        TaskDraft {
            title: "Pay electricity bill".into(),
            state,
            priority: None,
            importance: PriorityLevel::Unset,
            urgency: PriorityLevel::Unset,
            due_date: None,
            notes: None,
            source: "telegram:42:7".into(),
            confidence: 90,
            tags: vec![],
            effort: None,
        }
    }

    #[tokio::test]
    async fn create_posts_page_under_database() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pages"))
            .and(header("authorization", "Bearer secret_test"))
            .and(header("notion-version", "2022-06-28"))
            .and(body_partial_json(json!({
                "parent": {"database_id": "db-1"},
                "properties": {"Status": {"select": {"name": "Backlog"}}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "page", "id": "page-1", "url": "https://notion.so/page-1", "properties": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let handle = store(&server.uri(), WorkflowMode::Simple)
            .create_task(&draft(WorkflowState::Simple(SimpleState::Backlog)))
            .await
            .unwrap();
        assert_eq!(handle.remote_id, "page-1");
        assert_eq!(handle.url.as_deref(), Some("https://notion.so/page-1"));
    }

    #[tokio::test]
    async fn wrong_board_state_is_rejected_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = store(&server.uri(), WorkflowMode::Simple)
            .create_task(&draft(WorkflowState::Priority(PriorityState::DoNow)))
            .await
            .unwrap_err();
        assert!(matches!(err, SecretaryError::Workflow(_)));
    }

    #[tokio::test]
    async fn update_patches_page() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/pages/page-9"))
            .and(body_partial_json(json!({
                "properties": {"Status": {"select": {"name": "DONE"}}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "page-9", "url": "https://notion.so/page-9"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let patch = TaskPatch {
            state: Some(WorkflowState::Priority(PriorityState::Done)),
            ..TaskPatch::default()
        };
        let handle = store(&server.uri(), WorkflowMode::Priority)
            .update_task("page-9", &patch)
            .await
            .unwrap();
        assert_eq!(handle.remote_id, "page-9");
    }

    #[tokio::test]
    async fn pending_query_excludes_done_column() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/databases/db-1/query"))
            .and(body_partial_json(json!({
                "filter": {"property": "Status", "select": {"does_not_equal": "Concluido"}},
                "page_size": 5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"object": "page", "id": "p1", "url": "u1", "properties": {
                        "Name": {"title": [{"plain_text": "First"}]},
                        "Status": {"select": {"name": "Backlog"}}
                    }},
                    {"object": "page", "id": "p2", "url": "u2", "properties": {
                        "Name": {"title": [{"plain_text": "Second"}]},
                        "Status": {"select": {"name": "Em Andamento"}}
                    }}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tasks = store(&server.uri(), WorkflowMode::Simple)
            .query_pending(5)
            .await
            .unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].title, "Second");
        assert_eq!(tasks[1].state_label.as_deref(), Some("Em Andamento"));
    }

    #[tokio::test]
    async fn api_error_becomes_task_store_error() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "object": "error", "status": 404, "code": "object_not_found",
                "message": "Could not find page with ID: nope."
            })))
            .mount(&server)
            .await;

        let err = store(&server.uri(), WorkflowMode::Simple)
            .update_task("nope", &TaskPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SecretaryError::TaskStore { .. }));
        assert!(err.to_string().contains("object_not_found"));
    }

    #[test]
    fn missing_credentials_fail_construction() {
        let err = NotionTaskStore::from_config(&NotionConfig::default(), WorkflowMode::Simple)
            .err()
            .unwrap();
        assert!(matches!(err, SecretaryError::Config(ref m) if m.contains("notion.token")));
    }
}
