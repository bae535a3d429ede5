// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The validated intent shape.

use secretary_kanban::{PriorityLevel, WorkflowState};
use serde::Serialize;
use strum::{Display, EnumString};

/// What the speaker asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IntentKind {
    CreateTask,
    UpdateTask,
    CompleteTask,
    ListTasks,
    #[strum(serialize = "noop")]
    #[serde(rename = "noop")]
    NoOp,
}

/// Rough task size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
pub enum Effort {
    S,
    M,
    L,
}

impl Effort {
    pub fn as_str(self) -> &'static str {
        match self {
            Effort::S => "S",
            Effort::M => "M",
            Effort::L => "L",
        }
    }
}

/// How the speaker pointed at an existing task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskRefHint {
    /// Remote task identifier, when the oracle could name one.
    pub task_id: Option<String>,
    /// Best-guess title for a fuzzy lookup.
    pub title_guess: Option<String>,
}

/// Field bag. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntentFields {
    pub title: Option<String>,
    pub notes: Option<String>,
    /// Strict `YYYY-MM-DD`.
    pub due_date: Option<String>,
    pub tags: Vec<String>,
    pub effort: Option<Effort>,
    /// Canonical label of the configured board, never a fuzzy string.
    pub status: Option<WorkflowState>,
    pub importance: PriorityLevel,
    pub urgency: PriorityLevel,
}

/// A validated intent. Confidence is always within `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedIntent {
    #[serde(rename = "intent")]
    pub kind: IntentKind,
    pub confidence: u8,
    pub task_ref: TaskRefHint,
    pub fields: IntentFields,
}

impl ParsedIntent {
    /// Synthetic no-op carrying the reason in `notes`, confidence 0.
    pub fn noop(reason: impl Into<String>) -> Self {
        Self {
            kind: IntentKind::NoOp,
            confidence: 0,
            task_ref: TaskRefHint::default(),
            fields: IntentFields {
                notes: Some(reason.into()),
                ..IntentFields::default()
            },
        }
    }

    pub fn meets(&self, threshold: u8) -> bool {
        self.confidence >= threshold
    }

    /// Title to resolve an existing task by: the explicit guess first, then
    /// the title field.
    pub fn lookup_title(&self) -> Option<&str> {
        self.task_ref
            .title_guess
            .as_deref()
            .or(self.fields.title.as_deref())
    }

    /// JSON form stored on the ledger event.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
