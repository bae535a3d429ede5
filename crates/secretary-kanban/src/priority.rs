// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Importance x urgency classification (the 2x2 priority matrix).
//!
//! Both axes are tri-state signals plus "absent". High and Medium count as
//! affirmative, so an ambiguous Medium never sinks a task into the Delete
//! quadrant on its own.

use std::str::FromStr;

use serde::{Serialize, Serializer};
use strum::{Display, EnumString};

use crate::error::WorkflowError;

/// A single importance or urgency signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString)]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
    /// No signal was given on this axis.
    #[default]
    #[strum(disabled)]
    Unset,
}

impl PriorityLevel {
    /// All four levels, `Unset` included.
    pub const ALL: [PriorityLevel; 4] = [
        PriorityLevel::High,
        PriorityLevel::Medium,
        PriorityLevel::Low,
        PriorityLevel::Unset,
    ];

    /// Strict parse of an optional label. Anything but the exact strings
    /// `High`, `Medium` or `Low` is `Unset`.
    pub fn from_label(raw: Option<&str>) -> Self {
        raw.and_then(|s| PriorityLevel::from_str(s).ok())
            .unwrap_or(PriorityLevel::Unset)
    }

    /// Canonical label, or `None` for `Unset`.
    pub fn label(self) -> Option<&'static str> {
        match self {
            PriorityLevel::High => Some("High"),
            PriorityLevel::Medium => Some("Medium"),
            PriorityLevel::Low => Some("Low"),
            PriorityLevel::Unset => None,
        }
    }

    pub fn is_set(self) -> bool {
        self != PriorityLevel::Unset
    }

    fn is_affirmative(self) -> bool {
        matches!(self, PriorityLevel::High | PriorityLevel::Medium)
    }
}

impl Serialize for PriorityLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.label() {
            Some(label) => serializer.serialize_str(label),
            None => serializer.serialize_none(),
        }
    }
}

/// Quadrant of the priority matrix. Always derived from its two inputs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize,
)]
pub enum PriorityCategory {
    /// Important and urgent.
    Do,
    /// Important, not urgent.
    Decide,
    /// Urgent, not important.
    Delegate,
    /// Neither.
    Delete,
}

impl PriorityCategory {
    pub const ALL: [PriorityCategory; 4] = [
        PriorityCategory::Do,
        PriorityCategory::Decide,
        PriorityCategory::Delegate,
        PriorityCategory::Delete,
    ];
}

/// Columns of the priority-driven board: one per quadrant plus `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityState {
    DoNow,
    Decide,
    Delegate,
    Delete,
    Done,
}

impl PriorityState {
    pub const ALL: [PriorityState; 5] = [
        PriorityState::DoNow,
        PriorityState::Decide,
        PriorityState::Delegate,
        PriorityState::Delete,
        PriorityState::Done,
    ];

    /// Canonical column label as it appears on the board.
    pub fn label(self) -> &'static str {
        match self {
            PriorityState::DoNow => "DO (Agora)",
            PriorityState::Decide => "DECIDE (Agendar)",
            PriorityState::Delegate => "DELEGATE (Delegar)",
            PriorityState::Delete => "DELETE (Eliminar)",
            PriorityState::Done => "DONE",
        }
    }

    /// Exact, case-sensitive label lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

/// Classify a task into a quadrant. Total over all 16 input pairs.
pub fn classify(importance: PriorityLevel, urgency: PriorityLevel) -> PriorityCategory {
    match (importance.is_affirmative(), urgency.is_affirmative()) {
        (true, true) => PriorityCategory::Do,
        (true, false) => PriorityCategory::Decide,
        (false, true) => PriorityCategory::Delegate,
        (false, false) => PriorityCategory::Delete,
    }
}

/// Canonical column for a quadrant. Bijective onto the four non-terminal
/// priority states.
pub fn category_to_state(category: PriorityCategory) -> PriorityState {
    match category {
        PriorityCategory::Do => PriorityState::DoNow,
        PriorityCategory::Decide => PriorityState::Decide,
        PriorityCategory::Delegate => PriorityState::Delegate,
        PriorityCategory::Delete => PriorityState::Delete,
    }
}

/// Column for a category given by name. Unknown names are an error, never
/// a default column.
pub fn category_name_to_state(name: &str) -> Result<PriorityState, WorkflowError> {
    PriorityCategory::from_str(name)
        .map(category_to_state)
        .map_err(|_| WorkflowError::UnknownCategory(name.to_string()))
}

/// Partial inverse of [`category_to_state`]. `Done` carries no quadrant.
pub fn state_to_category(state: PriorityState) -> Option<PriorityCategory> {
    match state {
        PriorityState::DoNow => Some(PriorityCategory::Do),
        PriorityState::Decide => Some(PriorityCategory::Decide),
        PriorityState::Delegate => Some(PriorityCategory::Delegate),
        PriorityState::Delete => Some(PriorityCategory::Delete),
        PriorityState::Done => None,
    }
}

/// Quadrant recovered from a board label, if the label is one of the four
/// quadrant columns.
pub fn label_to_category(label: &str) -> Option<PriorityCategory> {
    PriorityState::from_label(label).and_then(state_to_category)
}
