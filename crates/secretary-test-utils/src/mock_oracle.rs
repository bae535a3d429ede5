// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transcription and intent oracles with call counters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secretary_core::{
    AdapterType, AudioClip, HealthStatus, IntentParserAdapter, PluginAdapter, SecretaryError,
    TranscriptionAdapter,
};
use tokio::sync::Mutex;

/// Returns a fixed transcript, or a provider error when none is set.
pub struct MockTranscriber {
    transcript: Mutex<Option<String>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

impl MockTranscriber {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: Mutex::new(Some(transcript.into())),
            delay: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub async fn set_transcript(&self, transcript: Option<&str>) {
        *self.transcript.lock().await = transcript.map(str::to_string);
    }

    /// Sleep this long before answering.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().await = delay;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PluginAdapter for MockTranscriber {
    fn name(&self) -> &str {
        "mock-transcriber"
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
impl TranscriptionAdapter for MockTranscriber {
    async fn transcribe(&self, _clip: &AudioClip) -> Result<String, SecretaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.transcript
            .lock()
            .await
            .clone()
            .ok_or_else(|| SecretaryError::provider("transcription service unavailable"))
    }
}

/// Returns a fixed raw oracle payload and records what it was asked.
pub struct MockIntentParser {
    response: Mutex<String>,
    transcripts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockIntentParser {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Mutex::new(response.into()),
            transcripts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Replies with `value` serialized as JSON.
    pub fn with_json(value: serde_json::Value) -> Self {
        Self::new(value.to_string())
    }

    pub async fn set_response(&self, response: impl Into<String>) {
        *self.response.lock().await = response.into();
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn transcripts(&self) -> Vec<String> {
        self.transcripts.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockIntentParser {
    fn name(&self) -> &str {
        "mock-intent-parser"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::IntentParser
    }

    async fn health_check(&self) -> Result<HealthStatus, SecretaryError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl IntentParserAdapter for MockIntentParser {
    async fn parse_intent(&self, transcript: &str) -> Result<String, SecretaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.transcripts.lock().await.push(transcript.to_string());
        Ok(self.response.lock().await.clone())
    }
}
