// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI REST API.
//!
//! One attempt per call. Failures surface as [`SecretaryError::Provider`]
//! and the engine records them; nothing here retries.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use secretary_core::{AudioClip, SecretaryError};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse, TranscriptionResponse};

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, SecretaryError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| SecretaryError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SecretaryError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /audio/transcriptions` as multipart form data.
    pub async fn transcribe(
        &self,
        model: &str,
        language: &str,
        clip: &AudioClip,
    ) -> Result<String, SecretaryError> {
        let file = Part::bytes(clip.data.clone())
            .file_name(clip.filename.clone())
            .mime_str(&clip.mime_type)
            .map_err(|e| SecretaryError::Provider {
                message: format!("invalid audio mime type `{}`: {e}", clip.mime_type),
                source: Some(Box::new(e)),
            })?;
        let form = Form::new()
            .text("model", model.to_string())
            .text("language", language.to_string())
            .text("response_format", "json")
            .part("file", file);

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(request_failed)?;

        let body: TranscriptionResponse = read_json(response).await?;
        Ok(body.text)
    }

    /// `POST /chat/completions`.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, SecretaryError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(request_failed)?;

        read_json(response).await
    }
}

fn request_failed(e: reqwest::Error) -> SecretaryError {
    SecretaryError::Provider {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SecretaryError> {
    let status = response.status();
    debug!(status = %status, url = %response.url(), "openai response received");

    let body = response.text().await.map_err(|e| SecretaryError::Provider {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;

    if !status.is_success() {
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => format!(
                "OpenAI API error ({}): {}",
                api_err.error.type_.as_deref().unwrap_or("unknown"),
                api_err.error.message
            ),
            Err(_) => format!("API returned {status}: {body}"),
        };
        return Err(SecretaryError::provider(message));
    }

    serde_json::from_str(&body).map_err(|e| SecretaryError::Provider {
        message: format!("failed to parse API response: {e}"),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatMessage, ResponseFormat};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(uri: &str) -> OpenAiClient {
        OpenAiClient::new("sk-test", uri, Duration::from_secs(5)).unwrap()
    }

    fn clip() -> AudioClip {
        AudioClip {
            data: vec![0x4f, 0x67, 0x67, 0x53],
            filename: "voice.ogg".into(),
            mime_type: "audio/ogg".into(),
        }
    }

    #[tokio::test]
    async fn transcribe_posts_multipart_with_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "pagar a conta"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server.uri())
            .transcribe("whisper-1", "pt", &clip())
            .await
            .unwrap();
        assert_eq!(text, "pagar a conta");
    }

    #[tokio::test]
    async fn api_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"message": "Invalid file format.", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .transcribe("whisper-1", "pt", &clip())
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("invalid_request_error"), "got: {err}");
        assert!(err.contains("Invalid file format."), "got: {err}");
    }

    #[tokio::test]
    async fn chat_asks_for_json_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "response_format": {"type": "json_object"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "{\"intent\":\"noop\"}"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: 0.1,
            response_format: ResponseFormat::json_object(),
        };
        let response = client(&server.uri()).chat(&request).await.unwrap();
        assert_eq!(response.first_content(), Some("{\"intent\":\"noop\"}"));
    }

    #[tokio::test]
    async fn server_error_without_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .transcribe("whisper-1", "pt", &clip())
            .await
            .unwrap_err();
        assert!(matches!(err, SecretaryError::Provider { .. }));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let c = OpenAiClient::new("k", "https://api.openai.com/v1/", Duration::from_secs(1)).unwrap();
        assert_eq!(c.base_url(), "https://api.openai.com/v1");
    }
}
