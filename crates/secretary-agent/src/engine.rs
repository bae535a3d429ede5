// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message processing pass.
//!
//! Every event that gets past the idempotency check ends with exactly one
//! ledger write of its final status and exactly one reply. Collaborator
//! errors never reach the user; they become `Failed` plus a generic apology.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use secretary_config::model::SecretaryConfig;
use secretary_core::{
    ChannelAdapter, CreateOutcome, Event, EventStatus, EventUpdate, HealthStatus,
    IntentParserAdapter, LedgerAdapter, NewEvent, OutboundMessage, SecretaryError,
    TaskStoreAdapter, TranscriptionAdapter, VoiceMessage,
};
use secretary_intent::{IntentValidator, ParsedIntent};
use secretary_kanban::WorkflowMode;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::action::{Resolution, TaskAction};
use crate::reconcile::{Origin, Reconciler};
use crate::{reply, telemetry};

/// Engine policy, fixed at startup.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub mode: WorkflowMode,
    pub confidence_threshold: u8,
    pub list_limit: usize,
    pub fallback_title_chars: usize,
    /// Wall-clock budget for download, transcription and intent parsing.
    /// Task store writes are never cut short. `None` waits as long as the
    /// collaborators take.
    pub processing_timeout: Option<Duration>,
}

impl EngineConfig {
    pub fn from_config(config: &SecretaryConfig) -> Self {
        let workflow = &config.workflow;
        Self {
            mode: workflow.mode,
            confidence_threshold: workflow.confidence_threshold,
            list_limit: workflow.list_limit,
            fallback_title_chars: workflow.fallback_title_chars,
            processing_timeout: Some(Duration::from_secs(
                config.gateway.processing_timeout_secs,
            )),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_config(&SecretaryConfig::default())
    }
}

/// The collaborators the engine talks to.
#[derive(Clone)]
pub struct Adapters {
    pub channel: Arc<dyn ChannelAdapter>,
    pub transcriber: Arc<dyn TranscriptionAdapter>,
    pub intent_parser: Arc<dyn IntentParserAdapter>,
    pub task_store: Arc<dyn TaskStoreAdapter>,
    pub ledger: Arc<dyn LedgerAdapter>,
}

/// How one delivery ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Already recorded; nothing was done.
    Duplicate,
    Synced { event_id: i64, action: TaskAction },
    /// `event_id` is `None` when the event could not even be recorded.
    Failed { event_id: Option<i64>, error: String },
}

pub struct Engine {
    adapters: Adapters,
    validator: IntentValidator,
    reconciler: Reconciler,
    config: EngineConfig,
}

impl Engine {
    pub fn new(adapters: Adapters, config: EngineConfig) -> Self {
        let reconciler = Reconciler::new(
            adapters.task_store.clone(),
            adapters.ledger.clone(),
            config.mode,
            config.list_limit,
            config.fallback_title_chars,
        );
        Self {
            validator: IntentValidator::new(config.mode),
            reconciler,
            adapters,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerAdapter> {
        &self.adapters.ledger
    }

    /// Processes one inbound voice message.
    pub async fn process(&self, voice: &VoiceMessage) -> ProcessOutcome {
        let span = info_span!(
            "voice_message",
            chat_id = voice.chat_id,
            message_id = voice.message_id,
            trace_id = tracing::field::Empty,
        );
        self.process_inner(voice).instrument(span).await
    }

    async fn process_inner(&self, voice: &VoiceMessage) -> ProcessOutcome {
        let ledger = &self.adapters.ledger;
        match ledger.exists(voice.chat_id, voice.message_id).await {
            Ok(true) => return self.duplicate(),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "existence check failed, relying on insert constraint"),
        }

        let new_event = NewEvent {
            trace_id: Uuid::new_v4().to_string(),
            chat_id: voice.chat_id,
            message_id: voice.message_id,
            from_user_id: voice.from_user_id,
            audio_file_id: Some(voice.file_id.clone()),
            audio_duration_secs: voice.duration_secs,
        };
        let handle = match ledger.create_event(&new_event).await {
            Ok(CreateOutcome::Created(handle)) => handle,
            Ok(CreateOutcome::Duplicate) => return self.duplicate(),
            Err(e) => {
                error!(error = %e, "failed to record event");
                self.reply(voice.chat_id, voice.message_id, reply::apology())
                    .await;
                telemetry::record_event("failed");
                return ProcessOutcome::Failed {
                    event_id: None,
                    error: e.to_string(),
                };
            }
        };

        tracing::Span::current().record("trace_id", handle.trace_id.as_str());
        info!(event_id = handle.id, "processing voice message");
        self.run(handle.id, voice.chat_id, voice.message_id, &voice.file_id)
            .await
    }

    /// Re-runs a failed event from the download step, reusing its row.
    pub async fn reprocess(&self, event: &Event) -> Result<ProcessOutcome, SecretaryError> {
        if event.status != EventStatus::Failed {
            return Err(SecretaryError::Internal(format!(
                "event {} is {}, only failed events can be reprocessed",
                event.id, event.status
            )));
        }
        let file_id = event.audio_file_id.as_deref().ok_or_else(|| {
            SecretaryError::Internal(format!("event {} has no audio reference", event.id))
        })?;

        let span = info_span!(
            "voice_message",
            chat_id = event.chat_id,
            message_id = event.message_id,
            trace_id = %event.trace_id,
        );
        let outcome = async {
            info!(event_id = event.id, "reprocessing failed event");
            self.run(event.id, event.chat_id, event.message_id, file_id)
                .await
        }
        .instrument(span)
        .await;
        Ok(outcome)
    }

    /// Health of every collaborator, by adapter name.
    pub async fn health(&self) -> Vec<(String, HealthStatus)> {
        let a = &self.adapters;
        let checks = [
            (a.channel.name(), a.channel.health_check().await),
            (a.transcriber.name(), a.transcriber.health_check().await),
            (a.intent_parser.name(), a.intent_parser.health_check().await),
            (a.task_store.name(), a.task_store.health_check().await),
            (a.ledger.name(), a.ledger.health_check().await),
        ];
        checks
            .into_iter()
            .map(|(name, result)| {
                let status = result.unwrap_or_else(|e| HealthStatus::Unhealthy(e.to_string()));
                (name.to_string(), status)
            })
            .collect()
    }

    /// Shuts down every collaborator, logging failures.
    pub async fn shutdown(&self) {
        let a = &self.adapters;
        for (name, result) in [
            (a.channel.name(), a.channel.shutdown().await),
            (a.transcriber.name(), a.transcriber.shutdown().await),
            (a.intent_parser.name(), a.intent_parser.shutdown().await),
            (a.task_store.name(), a.task_store.shutdown().await),
            (a.ledger.name(), a.ledger.shutdown().await),
        ] {
            if let Err(e) = result {
                warn!(adapter = name, error = %e, "adapter shutdown failed");
            }
        }
    }

    fn duplicate(&self) -> ProcessOutcome {
        debug!("message already recorded, skipping");
        telemetry::record_duplicate();
        ProcessOutcome::Duplicate
    }

    /// Pipeline plus the final ledger write and reply.
    async fn run(&self, event_id: i64, chat_id: i64, message_id: i64, file_id: &str) -> ProcessOutcome {
        let result = self.pipeline(event_id, chat_id, message_id, file_id).await;

        let ledger = &self.adapters.ledger;
        match result {
            Ok(Resolution { reply, action }) => {
                let update =
                    EventUpdate::status(EventStatus::Synced).with_task_action(action.to_json());
                if !ledger.update_event(event_id, &update).await {
                    error!(event_id, "final ledger write failed, event left unsynced");
                }
                self.reply(chat_id, message_id, reply).await;
                telemetry::record_action(action.name());
                telemetry::record_event("synced");
                info!(action = action.name(), "event synced");
                ProcessOutcome::Synced { event_id, action }
            }
            Err(e) => {
                error!(error = %e, "processing failed");
                let update = EventUpdate::status(EventStatus::Failed).with_error(e.to_string());
                if !ledger.update_event(event_id, &update).await {
                    error!(event_id, "final ledger write failed, event left unfailed");
                }
                self.reply(chat_id, message_id, reply::apology()).await;
                telemetry::record_event("failed");
                ProcessOutcome::Failed {
                    event_id: Some(event_id),
                    error: e.to_string(),
                }
            }
        }
    }

    async fn pipeline(
        &self,
        event_id: i64,
        chat_id: i64,
        message_id: i64,
        file_id: &str,
    ) -> Result<Resolution, SecretaryError> {
        let (transcript, intent) = self
            .within_budget(self.understand(event_id, file_id))
            .await?;

        if !intent.meets(self.config.confidence_threshold) {
            info!(
                threshold = self.config.confidence_threshold,
                "confidence below threshold, task store untouched"
            );
            return Ok(Resolution {
                reply: reply::low_confidence(intent.confidence, &transcript),
                action: TaskAction::low_confidence(),
            });
        }

        let origin = Origin {
            chat_id,
            message_id,
            transcript: &transcript,
        };
        self.reconciler.apply(&intent, &origin).await
    }

    /// Download, transcription and intent parsing, with their progress writes.
    async fn understand(
        &self,
        event_id: i64,
        file_id: &str,
    ) -> Result<(String, ParsedIntent), SecretaryError> {
        let ledger = &self.adapters.ledger;

        let clip = self.adapters.channel.download_audio(file_id).await?;
        let transcript = self.adapters.transcriber.transcribe(&clip).await?;
        ledger
            .update_event(
                event_id,
                &EventUpdate::status(EventStatus::Transcribed).with_transcription(transcript.as_str()),
            )
            .await;
        debug!(chars = transcript.chars().count(), "audio transcribed");

        let intent = self.interpret(&transcript).await?;
        ledger
            .update_event(
                event_id,
                &EventUpdate::status(EventStatus::Parsed).with_parsed_intent(intent.to_json()),
            )
            .await;
        info!(intent = %intent.kind, confidence = intent.confidence, "intent parsed");
        Ok((transcript, intent))
    }

    /// Applies `processing_timeout`. Task store mutations never run inside it.
    async fn within_budget<T>(
        &self,
        work: impl Future<Output = Result<T, SecretaryError>>,
    ) -> Result<T, SecretaryError> {
        match self.config.processing_timeout {
            Some(budget) => tokio::time::timeout(budget, work)
                .await
                .unwrap_or_else(|_| Err(SecretaryError::Timeout { duration: budget })),
            None => work.await,
        }
    }

    /// A blank transcript never reaches the intent oracle.
    async fn interpret(&self, transcript: &str) -> Result<ParsedIntent, SecretaryError> {
        if transcript.trim().is_empty() {
            warn!("empty transcription, skipping intent oracle");
            return Ok(ParsedIntent::noop("empty transcription"));
        }
        let raw = self.adapters.intent_parser.parse_intent(transcript).await?;
        Ok(self.validator.from_oracle_output(&raw))
    }

    async fn reply(&self, chat_id: i64, reply_to: i64, content: String) {
        let msg = OutboundMessage {
            chat_id,
            content,
            reply_to: Some(reply_to),
        };
        if let Err(e) = self.adapters.channel.send(msg).await {
            warn!(error = %e, "failed to send reply");
        }
    }
}
