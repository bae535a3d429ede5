// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Secretary.
//!
//! Holds the adapter traits every external collaborator implements (chat
//! channel, transcription oracle, intent oracle, task store, event ledger),
//! the shared error type, and the records that flow between them.

pub mod error;
pub mod event;
pub mod task;
pub mod traits;
pub mod types;

pub use error::SecretaryError;
pub use event::{CreateOutcome, Event, EventHandle, EventStatus, EventUpdate, NewEvent};
pub use task::{RemoteTask, TaskDraft, TaskHandle, TaskPatch, TaskReference};
pub use types::{AdapterType, AudioClip, HealthStatus, MessageId, OutboundMessage, VoiceMessage};

pub use traits::{
    ChannelAdapter, IntentParserAdapter, LedgerAdapter, PluginAdapter, TaskStoreAdapter,
    TranscriptionAdapter,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [
            AdapterType::Channel,
            AdapterType::Transcription,
            AdapterType::IntentParser,
            AdapterType::TaskStore,
            AdapterType::Ledger,
        ] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
        fn _assert_transcription_adapter<T: TranscriptionAdapter>() {}
        fn _assert_intent_parser_adapter<T: IntentParserAdapter>() {}
        fn _assert_task_store_adapter<T: TaskStoreAdapter>() {}
        fn _assert_ledger_adapter<T: LedgerAdapter>() {}
    }
}
