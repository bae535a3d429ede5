// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.
//!
//! Both entry points collect every problem instead of stopping at the first.

use crate::diagnostic::ConfigError;
use crate::model::SecretaryConfig;

/// Validate value ranges and shapes.
pub fn validate_config(config: &SecretaryConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("gateway.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::validation(format!(
            "gateway.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if !config.gateway.webhook_path.starts_with('/') {
        errors.push(ConfigError::validation(format!(
            "gateway.webhook_path must start with `/`, got `{}`",
            config.gateway.webhook_path
        )));
    }

    if config.gateway.processing_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "gateway.processing_timeout_secs must be greater than 0",
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation("storage.database_path must not be empty"));
    }

    if config.workflow.confidence_threshold > 100 {
        errors.push(ConfigError::validation(format!(
            "workflow.confidence_threshold must be between 0 and 100, got {}",
            config.workflow.confidence_threshold
        )));
    }

    if config.workflow.list_limit == 0 {
        errors.push(ConfigError::validation("workflow.list_limit must be at least 1"));
    }

    if config.workflow.fallback_title_chars == 0 {
        errors.push(ConfigError::validation(
            "workflow.fallback_title_chars must be at least 1",
        ));
    }

    if !(0.0..=2.0).contains(&config.openai.temperature) {
        errors.push(ConfigError::validation(format!(
            "openai.temperature must be between 0.0 and 2.0, got {}",
            config.openai.temperature
        )));
    }

    for (key, secs) in [
        ("openai.timeout_secs", config.openai.timeout_secs),
        ("notion.timeout_secs", config.notion.timeout_secs),
    ] {
        if secs == 0 {
            errors.push(ConfigError::validation(format!("{key} must be greater than 0")));
        }
    }

    into_result(errors)
}

/// Check that every credential the server needs is present.
///
/// `openai.api_key` is left out: the OpenAI client also falls back to
/// `OPENAI_API_KEY` and reports its own error.
pub fn require_credentials(config: &SecretaryConfig) -> Result<(), Vec<ConfigError>> {
    let required = [
        ("telegram.bot_token", &config.telegram.bot_token),
        ("notion.token", &config.notion.token),
        ("notion.database_id", &config.notion.database_id),
    ];

    let errors = required
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(key, _)| ConfigError::MissingKey {
            key: key.to_string(),
        })
        .collect();

    into_result(errors)
}

fn into_result(errors: Vec<ConfigError>) -> Result<(), Vec<ConfigError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
