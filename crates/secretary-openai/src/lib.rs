// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-backed oracles.
//!
//! [`WhisperTranscriber`] implements [`TranscriptionAdapter`] over the audio
//! transcription endpoint and [`ChatIntentParser`] implements
//! [`IntentParserAdapter`] over chat completions in JSON mode. Both return
//! oracle output untouched; validation happens downstream.
//!
//! [`TranscriptionAdapter`]: secretary_core::TranscriptionAdapter
//! [`IntentParserAdapter`]: secretary_core::IntentParserAdapter

pub mod client;
pub mod intent;
pub mod transcriber;
pub mod types;

pub use client::OpenAiClient;
pub use intent::ChatIntentParser;
pub use transcriber::WhisperTranscriber;

use std::time::Duration;

use secretary_config::model::OpenAiConfig;
use secretary_core::SecretaryError;

/// Build the shared client from configuration.
///
/// API key resolution: `openai.api_key`, then `OPENAI_API_KEY`, else a
/// configuration error.
pub fn client_from_config(config: &OpenAiConfig) -> Result<OpenAiClient, SecretaryError> {
    let api_key = resolve_api_key(config.api_key.as_deref())?;
    OpenAiClient::new(
        &api_key,
        &config.base_url,
        Duration::from_secs(config.timeout_secs),
    )
}

fn resolve_api_key(config_key: Option<&str>) -> Result<String, SecretaryError> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Ok(key.to_string());
    }

    std::env::var("OPENAI_API_KEY").map_err(|_| {
        SecretaryError::Config(
            "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY environment variable.".into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_key_wins() {
        assert_eq!(resolve_api_key(Some("sk-config")).unwrap(), "sk-config");
    }
}
