// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `secretary check-config` command implementation.

use secretary_config::SecretaryConfig;
use secretary_config::validation::require_credentials;

/// Prints the effective settings and returns the process exit code.
///
/// The configuration already passed validation when it was loaded; this only
/// adds the credential check `serve` would fail on.
pub fn run_check_config(config: &SecretaryConfig) -> i32 {
    println!("{}", summary(config));

    match require_credentials(config) {
        Ok(()) => {
            println!("credentials: ok");
            0
        }
        Err(errors) => {
            secretary_config::render_errors(&errors);
            1
        }
    }
}

fn summary(config: &SecretaryConfig) -> String {
    let workflow = &config.workflow;
    let gateway = &config.gateway;
    [
        format!("board: {}", workflow.mode),
        format!("confidence threshold: {}", workflow.confidence_threshold),
        format!("list limit: {}", workflow.list_limit),
        format!(
            "webhook: http://{}:{}{}",
            gateway.host, gateway.port, gateway.webhook_path
        ),
        format!("processing budget: {}s", gateway.processing_timeout_secs),
        format!("ledger: {}", config.storage.database_path),
        format!(
            "allowed users: {}",
            if config.telegram.allowed_users.is_empty() {
                "none".to_string()
            } else {
                config.telegram.allowed_users.join(", ")
            }
        ),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_defaults() {
        let text = summary(&SecretaryConfig::default());
        assert!(text.contains("board: simple"));
        assert!(text.contains("confidence threshold: 60"));
        assert!(text.contains("/api/telegram/webhook"));
        assert!(text.contains("allowed users: none"));
    }

    #[test]
    fn missing_credentials_fail_the_check() {
        assert_eq!(run_check_config(&SecretaryConfig::default()), 1);

        let mut config = SecretaryConfig::default();
        config.telegram.bot_token = Some("123:abc".into());
        config.notion.token = Some("secret_x".into());
        config.notion.database_id = Some("db".into());
        assert_eq!(run_check_config(&config), 0);
    }
}
