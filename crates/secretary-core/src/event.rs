// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger records: one event per inbound voice message.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Lifecycle of an event. Only moves forward; `Synced` and `Failed` are final.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventStatus {
    Received,
    Transcribed,
    Parsed,
    Synced,
    Failed,
}

impl EventStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, EventStatus::Synced | EventStatus::Failed)
    }
}

/// A stored ledger event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: i64,
    pub trace_id: String,
    pub chat_id: i64,
    pub message_id: i64,
    pub from_user_id: Option<i64>,
    pub audio_file_id: Option<String>,
    pub audio_duration_secs: Option<u32>,
    pub transcription: Option<String>,
    pub parsed_intent: Option<Value>,
    pub task_action: Option<Value>,
    pub status: EventStatus,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied when an event is first recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub trace_id: String,
    pub chat_id: i64,
    pub message_id: i64,
    pub from_user_id: Option<i64>,
    pub audio_file_id: Option<String>,
    pub audio_duration_secs: Option<u32>,
}

/// Identity of a freshly created event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventHandle {
    pub id: i64,
    pub trace_id: String,
}

/// Result of trying to record an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(EventHandle),
    /// Another writer already recorded `(chat_id, message_id)`.
    Duplicate,
}

/// Partial update of an event. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventUpdate {
    pub status: Option<EventStatus>,
    pub transcription: Option<String>,
    pub parsed_intent: Option<Value>,
    pub task_action: Option<Value>,
    pub error_message: Option<String>,
}

impl EventUpdate {
    pub fn status(status: EventStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_transcription(mut self, text: impl Into<String>) -> Self {
        self.transcription = Some(text.into());
        self
    }

    pub fn with_parsed_intent(mut self, intent: Value) -> Self {
        self.parsed_intent = Some(intent);
        self
    }

    pub fn with_task_action(mut self, action: Value) -> Self {
        self.task_action = Some(action);
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
