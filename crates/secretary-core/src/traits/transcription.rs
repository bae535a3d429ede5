// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech-to-text oracle.

use async_trait::async_trait;

use crate::error::SecretaryError;
use crate::traits::adapter::PluginAdapter;
use crate::types::AudioClip;

#[async_trait]
pub trait TranscriptionAdapter: PluginAdapter {
    /// Transcribes the clip. An empty string means nothing was heard.
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, SecretaryError>;
}
