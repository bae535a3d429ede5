// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Secretary integration tests.
//!
//! Recording fakes for every remote collaborator and a [`TestHarness`] that
//! wires them to a real SQLite ledger in a temp directory.

pub mod harness;
pub mod mock_channel;
pub mod mock_oracle;
pub mod mock_task_store;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_channel::MockChannel;
pub use mock_oracle::{MockIntentParser, MockTranscriber};
pub use mock_task_store::MockTaskStore;
