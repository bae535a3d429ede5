// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter.
//!
//! Implements [`ChannelAdapter`] over the Bot API via teloxide. Updates
//! arrive through the webhook (see [`handler::screen_update`]); this adapter
//! only downloads audio and sends replies.

pub mod handler;
pub mod media;

use async_trait::async_trait;
use secretary_config::model::TelegramConfig;
use secretary_core::{
    AdapterType, AudioClip, ChannelAdapter, HealthStatus, MessageId, OutboundMessage,
    PluginAdapter, SecretaryError,
};
use teloxide::prelude::*;
use teloxide::types::{ChatId, ReplyParameters};
use tracing::debug;

pub use handler::{Disposition, IgnoreReason, parse_update, screen_update};

pub struct TelegramChannel {
    bot: Bot,
}

impl TelegramChannel {
    /// Requires `telegram.bot_token`.
    pub fn new(config: &TelegramConfig) -> Result<Self, SecretaryError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            SecretaryError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.trim().is_empty() {
            return Err(SecretaryError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        Ok(Self {
            bot: Bot::new(token.trim()),
        })
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, SecretaryError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn download_audio(&self, file_id: &str) -> Result<AudioClip, SecretaryError> {
        media::download_audio(&self.bot, file_id).await
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, SecretaryError> {
        let mut request = self.bot.send_message(ChatId(msg.chat_id), msg.content);
        if let Some(reply_to) = msg.reply_to {
            let id = i32::try_from(reply_to).map_err(|e| SecretaryError::Channel {
                message: format!("invalid reply_to message id {reply_to}: {e}"),
                source: None,
            })?;
            request = request.reply_parameters(ReplyParameters::new(teloxide::types::MessageId(id)));
        }

        let sent = request.await.map_err(|e| SecretaryError::Channel {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(chat_id = msg.chat_id, message_id = sent.id.0, "reply sent");
        Ok(MessageId(sent.id.0.to_string()))
    }
}
