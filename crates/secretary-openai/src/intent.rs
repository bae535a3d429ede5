// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent oracle over chat completions in JSON mode.

use async_trait::async_trait;
use secretary_config::model::OpenAiConfig;
use secretary_core::{
    AdapterType, HealthStatus, IntentParserAdapter, PluginAdapter, SecretaryError,
};
use secretary_kanban::WorkflowMode;
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatMessage, ChatRequest, ResponseFormat};

pub struct ChatIntentParser {
    client: OpenAiClient,
    model: String,
    temperature: f32,
    system_prompt: String,
}

impl ChatIntentParser {
    /// The system prompt is fixed for the board chosen at startup.
    pub fn new(client: OpenAiClient, config: &OpenAiConfig, mode: WorkflowMode) -> Self {
        info!(model = %config.intent_model, %mode, "intent parser initialized");
        Self {
            client,
            model: config.intent_model.clone(),
            temperature: config.temperature,
            system_prompt: secretary_intent::system_prompt(mode),
        }
    }

    fn request(&self, transcript: &str, today: chrono::NaiveDate) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(self.system_prompt.clone()),
                ChatMessage::user(format!(
                    "Today is {}.\n\nVoice note:\n{transcript}",
                    today.format("%Y-%m-%d")
                )),
            ],
            temperature: self.temperature,
            response_format: ResponseFormat::json_object(),
        }
    }
}

#[async_trait]
impl PluginAdapter for ChatIntentParser {
    fn name(&self) -> &str {
        "openai-chat"
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
impl IntentParserAdapter for ChatIntentParser {
    /// Returns the first choice's content, or an empty string when the
    /// oracle sent none.
    async fn parse_intent(&self, transcript: &str) -> Result<String, SecretaryError> {
        let request = self.request(transcript, chrono::Local::now().date_naive());
        let response = self.client.chat(&request).await?;
        let content = response.first_content().unwrap_or_default().to_string();
        debug!(chars = content.len(), "intent oracle answered");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn parser(uri: &str, mode: WorkflowMode) -> ChatIntentParser {
        let client = OpenAiClient::new("sk", uri, Duration::from_secs(5)).unwrap();
        ChatIntentParser::new(client, &OpenAiConfig::default(), mode)
    }

    #[test]
    fn request_carries_date_and_prompt() {
        let parser = parser("http://localhost", WorkflowMode::Priority);
        let today = chrono::NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let request = parser.request("pay the bill", today);

        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.messages[0].role, "system");
        assert!(request.messages[0].content.contains("DO (Agora)"));
        assert!(request.messages[1].content.contains("2026-03-14"));
        assert!(request.messages[1].content.ends_with("pay the bill"));
    }

    #[tokio::test]
    async fn returns_raw_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({"model": "gpt-4o-mini"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "not json at all"}}]
            })))
            .mount(&server)
            .await;

        let raw = parser(&server.uri(), WorkflowMode::Simple)
            .parse_intent("hello")
            .await
            .unwrap();
        assert_eq!(raw, "not json at all");
    }

    #[tokio::test]
    async fn missing_choice_is_empty_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let raw = parser(&server.uri(), WorkflowMode::Simple)
            .parse_intent("hello")
            .await
            .unwrap();
        assert!(raw.is_empty());
    }
}
