// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the event ledger and the task reference cache.
//!
//! WAL-mode SQLite with embedded refinery migrations. All statements for
//! one [`Database`] run on the single background thread owned by
//! `tokio-rusqlite`; cross-process (or cross-connection) safety for the
//! idempotency key comes from the `UNIQUE (chat_id, message_id)` constraint.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteLedger;
pub use database::Database;
