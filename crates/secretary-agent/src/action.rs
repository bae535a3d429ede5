// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The action record persisted on every finished event.

use serde::Serialize;

/// Reason recorded when the confidence gate blocks an intent.
pub const LOW_CONFIDENCE: &str = "low_confidence";

/// Reason recorded when no task matches the reference.
pub const TASK_NOT_FOUND: &str = "task_not_found";

/// What the engine did for one event. Stored as JSON, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TaskAction {
    Create {
        task_id: String,
        url: Option<String>,
    },
    Update {
        task_id: String,
        url: Option<String>,
    },
    Complete {
        task_id: String,
        url: Option<String>,
    },
    List {
        count: usize,
    },
    Noop {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    UpdateFailed {
        reason: String,
    },
    CompleteFailed {
        reason: String,
    },
}

impl TaskAction {
    pub fn low_confidence() -> Self {
        TaskAction::Noop {
            reason: Some(LOW_CONFIDENCE.to_string()),
        }
    }

    /// Wire name of the action, also used as a metrics label.
    pub fn name(&self) -> &'static str {
        match self {
            TaskAction::Create { .. } => "create",
            TaskAction::Update { .. } => "update",
            TaskAction::Complete { .. } => "complete",
            TaskAction::List { .. } => "list",
            TaskAction::Noop { .. } => "noop",
            TaskAction::UpdateFailed { .. } => "update_failed",
            TaskAction::CompleteFailed { .. } => "complete_failed",
        }
    }

    /// Whether the task store was written to.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            TaskAction::Create { .. } | TaskAction::Update { .. } | TaskAction::Complete { .. }
        )
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Reply text and action record produced by one routing branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub reply: String,
    pub action: TaskAction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn low_confidence_shape() {
        assert_eq!(
            TaskAction::low_confidence().to_json(),
            json!({"action": "noop", "reason": "low_confidence"})
        );
    }

    #[test]
    fn plain_noop_omits_reason() {
        assert_eq!(
            TaskAction::Noop { reason: None }.to_json(),
            json!({"action": "noop"})
        );
    }

    #[test]
    fn failed_lookups_use_snake_case_tags() {
        let action = TaskAction::UpdateFailed {
            reason: TASK_NOT_FOUND.into(),
        };
        assert_eq!(
            action.to_json(),
            json!({"action": "update_failed", "reason": "task_not_found"})
        );
        assert_eq!(action.name(), "update_failed");
        assert!(!action.is_mutation());
    }

    #[test]
    fn mutation_carries_task_id() {
        let action = TaskAction::Create {
            task_id: "page-1".into(),
            url: Some("https://notion.so/page-1".into()),
        };
        assert_eq!(action.to_json()["task_id"], "page-1");
        assert!(action.is_mutation());
    }
}
