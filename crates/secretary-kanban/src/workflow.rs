// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board configuration and the states it admits.
//!
//! A deployment picks one [`WorkflowMode`] at startup. States from the other
//! board are rejected by [`WorkflowMode::ensure`] instead of being written
//! to the task store.

use serde::{Deserialize, Serialize, Serializer};
use strum::{Display, EnumString};

use crate::error::WorkflowError;
use crate::priority::{PriorityLevel, PriorityState, category_to_state, classify};
use crate::status::{SimpleState, normalize};

/// Which board the task store is organised as.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkflowMode {
    /// Backlog / in progress / paused / done.
    #[default]
    Simple,
    /// One column per priority quadrant plus done.
    Priority,
}

/// A column on either board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowState {
    Simple(SimpleState),
    Priority(PriorityState),
}

impl WorkflowState {
    pub fn label(self) -> &'static str {
        match self {
            WorkflowState::Simple(s) => s.label(),
            WorkflowState::Priority(s) => s.label(),
        }
    }

    /// The board this state belongs to.
    pub fn mode(self) -> WorkflowMode {
        match self {
            WorkflowState::Simple(_) => WorkflowMode::Simple,
            WorkflowState::Priority(_) => WorkflowMode::Priority,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            WorkflowState::Simple(SimpleState::Done) | WorkflowState::Priority(PriorityState::Done)
        )
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for WorkflowState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl WorkflowMode {
    /// Canonical labels of every column on this board, in board order.
    pub fn labels(self) -> Vec<&'static str> {
        match self {
            WorkflowMode::Simple => SimpleState::ALL.iter().map(|s| s.label()).collect(),
            WorkflowMode::Priority => PriorityState::ALL.iter().map(|s| s.label()).collect(),
        }
    }

    /// Strict, case-sensitive label lookup on this board only.
    pub fn parse_label(self, raw: &str) -> Option<WorkflowState> {
        match self {
            WorkflowMode::Simple => SimpleState::from_label(raw).map(WorkflowState::Simple),
            WorkflowMode::Priority => PriorityState::from_label(raw).map(WorkflowState::Priority),
        }
    }

    pub fn is_valid_label(self, raw: &str) -> bool {
        self.parse_label(raw).is_some()
    }

    /// The terminal column.
    pub fn done_state(self) -> WorkflowState {
        match self {
            WorkflowMode::Simple => WorkflowState::Simple(SimpleState::Done),
            WorkflowMode::Priority => WorkflowState::Priority(PriorityState::Done),
        }
    }

    /// Column for a newly created task.
    ///
    /// The simple board normalizes the status hint; the priority board
    /// classifies importance and urgency. Each board ignores the other's
    /// inputs.
    pub fn initial_state(
        self,
        status_hint: Option<&str>,
        importance: PriorityLevel,
        urgency: PriorityLevel,
    ) -> WorkflowState {
        match self {
            WorkflowMode::Simple => WorkflowState::Simple(normalize(status_hint)),
            WorkflowMode::Priority => {
                WorkflowState::Priority(category_to_state(classify(importance, urgency)))
            }
        }
    }

    /// Reject a state that belongs to the other board.
    pub fn ensure(self, state: WorkflowState) -> Result<WorkflowState, WorkflowError> {
        if state.mode() == self {
            Ok(state)
        } else {
            Err(WorkflowError::ModeMismatch {
                label: state.label().to_string(),
                expected: self,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixing_boards_is_rejected() {
        let priority_state = WorkflowState::Priority(PriorityState::DoNow);
        let err = WorkflowMode::Simple.ensure(priority_state).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::ModeMismatch {
                label: "DO (Agora)".into(),
                expected: WorkflowMode::Simple,
            }
        );

        let simple_state = WorkflowState::Simple(SimpleState::Backlog);
        assert!(WorkflowMode::Priority.ensure(simple_state).is_err());
        assert_eq!(WorkflowMode::Simple.ensure(simple_state), Ok(simple_state));
    }

    #[test]
    fn labels_do_not_cross_boards() {
        assert!(WorkflowMode::Simple.is_valid_label("Backlog"));
        assert!(!WorkflowMode::Simple.is_valid_label("DONE"));
        assert!(WorkflowMode::Priority.is_valid_label("DONE"));
        assert!(!WorkflowMode::Priority.is_valid_label("Concluido"));
        for label in WorkflowMode::Simple.labels() {
            assert!(!WorkflowMode::Priority.labels().contains(&label));
        }
    }

    #[test]
    fn initial_state_per_mode() {
        use PriorityLevel::*;
        assert_eq!(
            WorkflowMode::Simple.initial_state(Some("doing"), High, High),
            WorkflowState::Simple(SimpleState::InProgress)
        );
        assert_eq!(
            WorkflowMode::Simple.initial_state(None, High, High),
            WorkflowState::Simple(SimpleState::Backlog)
        );
        assert_eq!(
            WorkflowMode::Priority.initial_state(Some("Concluido"), High, High),
            WorkflowState::Priority(PriorityState::DoNow)
        );
        assert_eq!(
            WorkflowMode::Priority.initial_state(None, Unset, Unset),
            WorkflowState::Priority(PriorityState::Delete)
        );
    }

    #[test]
    fn done_state_is_terminal() {
        for mode in [WorkflowMode::Simple, WorkflowMode::Priority] {
            let done = mode.done_state();
            assert!(done.is_terminal());
            assert_eq!(done.mode(), mode);
        }
        assert!(!WorkflowState::Priority(PriorityState::Delete).is_terminal());
    }

    #[test]
    fn mode_parses_from_config_strings() {
        let mode: WorkflowMode = serde_json::from_str("\"priority\"").unwrap();
        assert_eq!(mode, WorkflowMode::Priority);
        assert_eq!(WorkflowMode::Simple.to_string(), "simple");
        assert_eq!(
            serde_json::to_string(&WorkflowState::Simple(SimpleState::Paused)).unwrap(),
            "\"Pausado\""
        );
    }
}
