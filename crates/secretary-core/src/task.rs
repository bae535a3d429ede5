// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task store payloads and the locally cached task reference.

use secretary_kanban::{PriorityCategory, PriorityLevel, WorkflowState};
use serde::Serialize;

/// Local cache row mapping a remote task to what we last knew about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskReference {
    pub remote_id: String,
    pub title: String,
    /// Last known column label.
    pub last_status: Option<String>,
    pub importance: PriorityLevel,
    pub urgency: PriorityLevel,
    /// Chat message that created the task, if it came from a voice note.
    pub created_from_message_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Everything needed to create a remote task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub state: WorkflowState,
    /// Quadrant, set on the priority board only.
    pub priority: Option<PriorityCategory>,
    pub importance: PriorityLevel,
    pub urgency: PriorityLevel,
    pub due_date: Option<String>,
    pub notes: Option<String>,
    /// Where the task came from, e.g. `telegram:<chat>:<message>`.
    pub source: String,
    pub confidence: u8,
    pub tags: Vec<String>,
    pub effort: Option<String>,
}

/// Partial update of a remote task. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub state: Option<WorkflowState>,
    pub priority: Option<PriorityCategory>,
    pub importance: Option<PriorityLevel>,
    pub urgency: Option<PriorityLevel>,
    pub due_date: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub effort: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Identity of a remote task after a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub remote_id: String,
    pub url: Option<String>,
}

/// A task as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTask {
    pub remote_id: String,
    pub url: Option<String>,
    pub title: String,
    pub state_label: Option<String>,
    pub due_date: Option<String>,
}
