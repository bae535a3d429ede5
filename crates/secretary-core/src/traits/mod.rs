// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for every external collaborator.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` so the engine can hold them as `Arc<dyn ...>`.

pub mod adapter;
pub mod channel;
pub mod intent;
pub mod ledger;
pub mod task_store;
pub mod transcription;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use intent::IntentParserAdapter;
pub use ledger::LedgerAdapter;
pub use task_store::TaskStoreAdapter;
pub use transcription::TranscriptionAdapter;
