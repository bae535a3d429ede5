// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the chat transport.

use async_trait::async_trait;

use crate::error::SecretaryError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AudioClip, MessageId, OutboundMessage};

/// Downloads inbound audio and delivers replies.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Fetches the audio behind a channel file handle.
    async fn download_audio(&self, file_id: &str) -> Result<AudioClip, SecretaryError>;

    /// Sends a text reply.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, SecretaryError>;
}
