// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors raised by workflow lookups that must not fall back silently.

use thiserror::Error;

use crate::workflow::WorkflowMode;

/// Failure of a strict workflow lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// A priority category name that is not one of Do/Decide/Delegate/Delete.
    #[error("unknown priority category `{0}`")]
    UnknownCategory(String),

    /// A state from one board configuration was offered to the other.
    #[error("workflow state `{label}` does not belong to the {expected} board")]
    ModeMismatch {
        /// Label of the offending state.
        label: String,
        /// The configured mode the state was checked against.
        expected: WorkflowMode,
    },
}
