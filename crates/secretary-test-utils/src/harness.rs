// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline tests.
//!
//! `TestHarness` assembles an [`Engine`] from mock collaborators and a real
//! SQLite ledger in a temp directory, then drives deliveries through it.

use std::sync::Arc;
use std::time::Duration;

use secretary_agent::{Adapters, Engine, EngineConfig, ProcessOutcome};
use secretary_config::model::StorageConfig;
use secretary_core::{Event, SecretaryError, VoiceMessage};
use secretary_kanban::WorkflowMode;
use secretary_storage::SqliteLedger;
use serde_json::{Value, json};

use crate::mock_channel::MockChannel;
use crate::mock_oracle::{MockIntentParser, MockTranscriber};
use crate::mock_task_store::MockTaskStore;

pub struct TestHarnessBuilder {
    mode: WorkflowMode,
    confidence_threshold: u8,
    transcript: String,
    intent: String,
    processing_timeout: Option<Duration>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let defaults = EngineConfig::default();
        Self {
            mode: defaults.mode,
            confidence_threshold: defaults.confidence_threshold,
            transcript: "criar tarefa pagar a conta de luz".into(),
            intent: json!({
                "intent": "create_task",
                "confidence": 92,
                "task_ref": {"task_id": null, "title_guess": null},
                "fields": {"title": "Pagar conta de luz", "tags": []}
            })
            .to_string(),
            processing_timeout: None,
        }
    }

    pub fn with_mode(mut self, mode: WorkflowMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = transcript.into();
        self
    }

    /// Raw oracle payload; need not be valid JSON.
    pub fn with_raw_intent(mut self, raw: impl Into<String>) -> Self {
        self.intent = raw.into();
        self
    }

    pub fn with_intent(self, intent: Value) -> Self {
        self.with_raw_intent(intent.to_string())
    }

    pub fn with_processing_timeout(mut self, budget: Duration) -> Self {
        self.processing_timeout = Some(budget);
        self
    }

    pub async fn build(self) -> Result<TestHarness, SecretaryError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| SecretaryError::Storage { source: e.into() })?;
        let storage_config = StorageConfig {
            database_path: temp_dir.path().join("ledger.db").display().to_string(),
            wal_mode: true,
        };
        let ledger = Arc::new(SqliteLedger::open(&storage_config).await?);

        let channel = Arc::new(MockChannel::new());
        let transcriber = Arc::new(MockTranscriber::new(self.transcript));
        let intent_parser = Arc::new(MockIntentParser::new(self.intent));
        let task_store = Arc::new(MockTaskStore::new());

        let adapters = Adapters {
            channel: channel.clone(),
            transcriber: transcriber.clone(),
            intent_parser: intent_parser.clone(),
            task_store: task_store.clone(),
            ledger: ledger.clone(),
        };
        let config = EngineConfig {
            mode: self.mode,
            confidence_threshold: self.confidence_threshold,
            processing_timeout: self.processing_timeout,
            ..EngineConfig::default()
        };

        Ok(TestHarness {
            engine: Arc::new(Engine::new(adapters, config)),
            channel,
            transcriber,
            intent_parser,
            task_store,
            ledger,
            _temp_dir: temp_dir,
        })
    }
}

pub struct TestHarness {
    pub engine: Arc<Engine>,
    pub channel: Arc<MockChannel>,
    pub transcriber: Arc<MockTranscriber>,
    pub intent_parser: Arc<MockIntentParser>,
    pub task_store: Arc<MockTaskStore>,
    pub ledger: Arc<SqliteLedger>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A voice note from user 1001 in `chat_id`.
    pub fn voice(chat_id: i64, message_id: i64) -> VoiceMessage {
        VoiceMessage {
            chat_id,
            message_id,
            from_user_id: Some(1001),
            from_username: Some("tester".into()),
            file_id: format!("voice-{chat_id}-{message_id}"),
            duration_secs: Some(4),
            mime_type: Some("audio/ogg".into()),
        }
    }

    pub async fn deliver(&self, chat_id: i64, message_id: i64) -> ProcessOutcome {
        self.engine.process(&Self::voice(chat_id, message_id)).await
    }

    /// The ledger row behind an outcome, if one was written.
    pub async fn event(&self, outcome: &ProcessOutcome) -> Option<Event> {
        use secretary_core::LedgerAdapter;

        let id = match outcome {
            ProcessOutcome::Synced { event_id, .. } => *event_id,
            ProcessOutcome::Failed {
                event_id: Some(id), ..
            } => *id,
            _ => return None,
        };
        self.ledger.get_event(id).await.ok().flatten()
    }
}
