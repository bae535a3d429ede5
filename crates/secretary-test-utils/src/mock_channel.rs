// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter: canned audio, captured replies.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use secretary_core::{
    AdapterType, AudioClip, ChannelAdapter, HealthStatus, MessageId, OutboundMessage,
    PluginAdapter, SecretaryError,
};
use tokio::sync::Mutex;

pub struct MockChannel {
    sent: Mutex<Vec<OutboundMessage>>,
    downloads: AtomicUsize,
    fail_downloads: AtomicBool,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            downloads: AtomicUsize::new(0),
            fail_downloads: AtomicBool::new(false),
        }
    }

    /// Make every subsequent download fail.
    pub fn fail_downloads(&self, fail: bool) {
        self.fail_downloads.store(fail, Ordering::SeqCst);
    }

    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Content of the most recent reply.
    pub async fn last_reply(&self) -> Option<String> {
        self.sent.lock().await.last().map(|m| m.content.clone())
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, SecretaryError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn download_audio(&self, file_id: &str) -> Result<AudioClip, SecretaryError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.fail_downloads.load(Ordering::SeqCst) {
            return Err(SecretaryError::channel(format!(
                "failed to download file {file_id}"
            )));
        }
        Ok(AudioClip {
            data: b"OggS\0fake-opus".to_vec(),
            filename: "voice.ogg".into(),
            mime_type: "audio/ogg".into(),
        })
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, SecretaryError> {
        let mut sent = self.sent.lock().await;
        sent.push(msg);
        Ok(MessageId(format!("mock-{}", sent.len())))
    }
}
