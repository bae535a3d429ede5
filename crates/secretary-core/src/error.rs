// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Secretary.

use secretary_kanban::WorkflowError;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across all adapter traits and the engine.
#[derive(Debug, Error)]
pub enum SecretaryError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Ledger backend errors (connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage { source: BoxError },

    /// Chat channel errors (download failure, send failure, malformed update).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<BoxError>,
    },

    /// Transcription or intent oracle errors (HTTP failure, bad status, decode).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<BoxError>,
    },

    /// Remote task store errors.
    #[error("task store error: {message}")]
    TaskStore {
        message: String,
        source: Option<BoxError>,
    },

    /// A status label or category that does not belong to the configured board.
    #[error("workflow error: {0}")]
    Workflow(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SecretaryError {
    pub fn channel(message: impl Into<String>) -> Self {
        SecretaryError::Channel {
            message: message.into(),
            source: None,
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        SecretaryError::Provider {
            message: message.into(),
            source: None,
        }
    }

    pub fn task_store(message: impl Into<String>) -> Self {
        SecretaryError::TaskStore {
            message: message.into(),
            source: None,
        }
    }
}

impl From<WorkflowError> for SecretaryError {
    fn from(e: WorkflowError) -> Self {
        SecretaryError::Workflow(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secretary_kanban::WorkflowMode;

    #[test]
    fn display_includes_message() {
        let err = SecretaryError::provider("whisper returned 500");
        assert_eq!(err.to_string(), "provider error: whisper returned 500");

        let err = SecretaryError::Storage {
            source: Box::new(std::io::Error::other("disk full")),
        };
        assert_eq!(err.to_string(), "storage error: disk full");
    }

    #[test]
    fn workflow_errors_convert() {
        let err: SecretaryError = WorkflowError::ModeMismatch {
            label: "DONE".into(),
            expected: WorkflowMode::Simple,
        }
        .into();
        assert!(matches!(err, SecretaryError::Workflow(ref m) if m.contains("DONE")));
    }
}
