// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech-to-text over the audio transcription endpoint.

use async_trait::async_trait;
use secretary_config::model::OpenAiConfig;
use secretary_core::{
    AdapterType, AudioClip, HealthStatus, PluginAdapter, SecretaryError, TranscriptionAdapter,
};
use tracing::{debug, info};

use crate::client::OpenAiClient;

pub struct WhisperTranscriber {
    client: OpenAiClient,
    model: String,
    language: String,
}

impl WhisperTranscriber {
    pub fn new(client: OpenAiClient, config: &OpenAiConfig) -> Self {
        info!(model = %config.transcription_model, language = %config.transcription_language, "transcriber initialized");
        Self {
            client,
            model: config.transcription_model.clone(),
            language: config.transcription_language.clone(),
        }
    }
}

#[async_trait]
impl PluginAdapter for WhisperTranscriber {
    fn name(&self) -> &str {
        "openai-whisper"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transcription
    }

    async fn health_check(&self) -> Result<HealthStatus, SecretaryError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl TranscriptionAdapter for WhisperTranscriber {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, SecretaryError> {
        let text = self
            .client
            .transcribe(&self.model, &self.language, clip)
            .await?;
        debug!(chars = text.chars().count(), "transcription complete");
        Ok(text.trim().to_string())
    }
}
