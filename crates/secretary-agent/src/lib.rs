// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice note pipeline and reconciliation engine.
//!
//! [`Engine`] owns one pass per inbound voice message: idempotency check,
//! download, transcription, intent validation, confidence gate,
//! reconciliation against the task store, final ledger write and reply.

pub mod action;
pub mod engine;
pub mod reconcile;
pub mod reply;
pub mod telemetry;

pub use action::{Resolution, TaskAction};
pub use engine::{Adapters, Engine, EngineConfig, ProcessOutcome};
pub use reconcile::{Origin, Reconciler};
