// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model.
//!
//! Every struct uses `#[serde(deny_unknown_fields)]` so a misspelled key is
//! a startup error instead of a silently ignored setting.

use std::fmt;

use secretary_kanban::WorkflowMode;
use serde::{Deserialize, Serialize};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecretaryConfig {
    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Transcription and intent oracles.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Remote task store.
    #[serde(default)]
    pub notion: NotionConfig,

    /// Event ledger.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Webhook HTTP server.
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Process identity and logging.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "secretary".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot settings.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot API token.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Expected value of the `X-Telegram-Bot-Api-Secret-Token` header.
    /// `None` skips the check.
    #[serde(default)]
    pub webhook_secret: Option<String>,

    /// Numeric user ids or `@usernames`. Empty rejects everyone.
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &redact(&self.bot_token))
            .field("webhook_secret", &redact(&self.webhook_secret))
            .field("allowed_users", &self.allowed_users)
            .finish()
    }
}

/// OpenAI transcription and chat-completion settings.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    /// ISO-639-1 hint passed to the transcription model.
    #[serde(default = "default_transcription_language")]
    pub transcription_language: String,

    #[serde(default = "default_intent_model")]
    pub intent_model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-request HTTP timeout.
    #[serde(default = "default_openai_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            transcription_model: default_transcription_model(),
            transcription_language: default_transcription_language(),
            intent_model: default_intent_model(),
            temperature: default_temperature(),
            timeout_secs: default_openai_timeout_secs(),
        }
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("transcription_model", &self.transcription_model)
            .field("transcription_language", &self.transcription_language)
            .field("intent_model", &self.intent_model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_transcription_language() -> String {
    "pt".to_string()
}

fn default_intent_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_openai_timeout_secs() -> u64 {
    30
}

/// Notion database settings.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotionConfig {
    /// Integration token.
    #[serde(default)]
    pub token: Option<String>,

    /// Database that holds the board.
    #[serde(default)]
    pub database_id: Option<String>,

    /// Value of the `Notion-Version` header.
    #[serde(default = "default_notion_api_version")]
    pub api_version: String,

    #[serde(default = "default_notion_base_url")]
    pub base_url: String,

    #[serde(default = "default_notion_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: None,
            database_id: None,
            api_version: default_notion_api_version(),
            base_url: default_notion_base_url(),
            timeout_secs: default_notion_timeout_secs(),
        }
    }
}

impl fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionConfig")
            .field("token", &redact(&self.token))
            .field("database_id", &self.database_id)
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_notion_api_version() -> String {
    "2022-06-28".to_string()
}

fn default_notion_base_url() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_notion_timeout_secs() -> u64 {
    20
}

/// SQLite ledger settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Write-ahead logging.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("secretary").join("secretary.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("secretary.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Webhook HTTP server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path Telegram posts updates to.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,

    /// Wall-clock budget for processing one delivery.
    #[serde(default = "default_processing_timeout_secs")]
    pub processing_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            webhook_path: default_webhook_path(),
            processing_timeout_secs: default_processing_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_webhook_path() -> String {
    "/api/telegram/webhook".to_string()
}

fn default_processing_timeout_secs() -> u64 {
    60
}

/// Board and engine policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowConfig {
    /// `simple` or `priority`. Chosen once per deployment.
    #[serde(default)]
    pub mode: WorkflowMode,

    /// Intents below this confidence (0-100) never touch the task store.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: u8,

    /// Tasks shown by a list request.
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,

    /// Transcript prefix used as a title when the intent has none.
    #[serde(default = "default_fallback_title_chars")]
    pub fallback_title_chars: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            mode: WorkflowMode::default(),
            confidence_threshold: default_confidence_threshold(),
            list_limit: default_list_limit(),
            fallback_title_chars: default_fallback_title_chars(),
        }
    }
}

fn default_confidence_threshold() -> u8 {
    60
}

fn default_list_limit() -> usize {
    5
}

fn default_fallback_title_chars() -> usize {
    50
}

fn redact(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "[REDACTED]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let mut config = SecretaryConfig::default();
        config.telegram.bot_token = Some("123456:ABCDEF".into());
        config.telegram.webhook_secret = Some("hook-secret".into());
        config.openai.api_key = Some("sk-live-key".into());
        config.notion.token = Some("secret_notion".into());

        let rendered = format!("{config:?}");
        for secret in ["123456:ABCDEF", "hook-secret", "sk-live-key", "secret_notion"] {
            assert!(!rendered.contains(secret), "{secret} leaked");
        }
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn workflow_mode_parses_lowercase() {
        let config: SecretaryConfig = toml::from_str("[workflow]\nmode = \"priority\"\n").unwrap();
        assert_eq!(config.workflow.mode, WorkflowMode::Priority);
        assert!(toml::from_str::<SecretaryConfig>("[workflow]\nmode = \"kanban\"\n").is_err());
    }

    #[test]
    fn sections_deny_unknown_fields() {
        assert!(toml::from_str::<SecretaryConfig>("[notion]\ndatabase = \"x\"\n").is_err());
        assert!(toml::from_str::<SecretaryConfig>("[cost]\ndaily = 1\n").is_err());
    }
}
