// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update filtering and voice extraction.
//!
//! Decides whether an inbound webhook update should reach the pipeline and,
//! if so, pulls the audio metadata into a channel-agnostic [`VoiceMessage`].

use secretary_core::{SecretaryError, VoiceMessage};
use teloxide::types::{Message, Update, UpdateKind};

/// Why an update was not forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Edited messages, callbacks, channel posts and the like.
    NotAMessage,
    /// A message without a voice note or audio attachment.
    NoAudio,
    Unauthorized,
}

impl IgnoreReason {
    pub fn as_str(self) -> &'static str {
        match self {
            IgnoreReason::NotAMessage => "not_a_message",
            IgnoreReason::NoAudio => "no_audio",
            IgnoreReason::Unauthorized => "unauthorized",
        }
    }
}

/// Outcome of screening one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Voice(VoiceMessage),
    Ignored(IgnoreReason),
}

/// Decodes a webhook body into an update.
pub fn parse_update(body: &[u8]) -> Result<Update, SecretaryError> {
    serde_json::from_slice(body).map_err(|e| SecretaryError::Channel {
        message: format!("malformed update: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Screens an update: message, then audio, then sender authorization.
pub fn screen_update(update: &Update, allowed_users: &[String]) -> Disposition {
    let UpdateKind::Message(msg) = &update.kind else {
        return Disposition::Ignored(IgnoreReason::NotAMessage);
    };
    let Some(voice) = voice_message(msg) else {
        return Disposition::Ignored(IgnoreReason::NoAudio);
    };
    if !is_authorized(msg, allowed_users) {
        return Disposition::Ignored(IgnoreReason::Unauthorized);
    }
    Disposition::Voice(voice)
}

/// Checks whether the message sender is authorized.
///
/// Passes if the sender's numeric id or username (with or without `@`,
/// case-insensitive) is listed. An empty list rejects everyone, as do
/// messages without a sender.
pub fn is_authorized(msg: &Message, allowed_users: &[String]) -> bool {
    if allowed_users.is_empty() {
        return false;
    }

    let Some(user) = msg.from.as_ref() else {
        return false;
    };
    let user_id = user.id.0.to_string();

    allowed_users.iter().any(|allowed| {
        let allowed = allowed.trim();
        if allowed == user_id {
            return true;
        }
        let allowed_name = allowed.strip_prefix('@').unwrap_or(allowed);
        user.username
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(allowed_name))
    })
}

/// Extracts a voice note, falling back to an audio attachment.
pub fn voice_message(msg: &Message) -> Option<VoiceMessage> {
    let (file_id, duration, mime_type) = if let Some(voice) = msg.voice() {
        (
            voice.file.id.to_string(),
            voice.duration.seconds(),
            voice.mime_type.as_ref().map(|m| m.to_string()),
        )
    } else if let Some(audio) = msg.audio() {
        (
            audio.file.id.to_string(),
            audio.duration.seconds(),
            audio.mime_type.as_ref().map(|m| m.to_string()),
        )
    } else {
        return None;
    };

    let from = msg.from.as_ref();
    Some(VoiceMessage {
        chat_id: msg.chat.id.0,
        message_id: i64::from(msg.id.0),
        from_user_id: from.and_then(|u| i64::try_from(u.id.0).ok()),
        from_username: from.and_then(|u| u.username.clone()),
        file_id,
        duration_secs: Some(duration),
        mime_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn sender(user_id: u64, username: Option<&str>) -> Value {
        let mut from = json!({"id": user_id, "is_bot": false, "first_name": "Test"});
        if let Some(name) = username {
            from["username"] = json!(name);
        }
        from
    }

    fn message_json(user_id: u64, username: Option<&str>) -> Value {
        json!({
            "message_id": 7,
            "date": 1700000000i64,
            "chat": {"id": 42i64, "type": "private", "first_name": "Test"},
            "from": sender(user_id, username),
        })
    }

    fn voice_json(user_id: u64, username: Option<&str>) -> Value {
        let mut msg = message_json(user_id, username);
        msg["voice"] = json!({
            "file_id": "voice-file-1",
            "file_unique_id": "u1",
            "duration": 4,
            "mime_type": "audio/ogg",
            "file_size": 2048
        });
        msg
    }

    fn message(json: Value) -> Message {
        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn update(message: Value) -> Update {
        serde_json::from_str(&json!({"update_id": 1000, "message": message}).to_string())
            .expect("failed to deserialize mock update")
    }

    #[test]
    fn extracts_voice_note() {
        let voice = voice_message(&message(voice_json(99, Some("ana")))).unwrap();
        assert_eq!(voice.chat_id, 42);
        assert_eq!(voice.message_id, 7);
        assert_eq!(voice.from_user_id, Some(99));
        assert_eq!(voice.from_username.as_deref(), Some("ana"));
        assert_eq!(voice.file_id, "voice-file-1");
        assert_eq!(voice.duration_secs, Some(4));
        assert_eq!(voice.mime_type.as_deref(), Some("audio/ogg"));
    }

    #[test]
    fn falls_back_to_audio_attachment() {
        let mut msg = message_json(99, None);
        msg["audio"] = json!({
            "file_id": "audio-file-1",
            "file_unique_id": "u2",
            "duration": 30,
            "mime_type": "audio/mpeg"
        });
        let voice = voice_message(&message(msg)).unwrap();
        assert_eq!(voice.file_id, "audio-file-1");
        assert_eq!(voice.duration_secs, Some(30));
    }

    #[test]
    fn text_message_has_no_voice() {
        let mut msg = message_json(99, None);
        msg["text"] = json!("hello");
        assert!(voice_message(&message(msg)).is_none());
    }

    #[test]
    fn authorized_by_id_or_username() {
        let msg = message(voice_json(99, Some("Ana")));
        assert!(is_authorized(&msg, &["99".into()]));
        assert!(is_authorized(&msg, &["@ana".into()]));
        assert!(is_authorized(&msg, &["ANA".into()]));
        assert!(!is_authorized(&msg, &["100".into(), "@bob".into()]));
    }

    #[test]
    fn empty_allow_list_rejects_everyone() {
        let msg = message(voice_json(99, Some("ana")));
        assert!(!is_authorized(&msg, &[]));
    }

    #[test]
    fn message_without_sender_is_rejected() {
        let mut msg = voice_json(99, None);
        msg.as_object_mut().unwrap().remove("from");
        assert!(!is_authorized(&message(msg), &["99".into()]));
    }

    #[test]
    fn screen_forwards_authorized_voice() {
        let disposition = screen_update(&update(voice_json(99, None)), &["99".into()]);
        assert!(matches!(disposition, Disposition::Voice(ref v) if v.message_id == 7));
    }

    #[test]
    fn screen_checks_audio_before_sender() {
        let mut msg = message_json(5, None);
        msg["text"] = json!("hi");
        assert_eq!(
            screen_update(&update(msg), &["99".into()]),
            Disposition::Ignored(IgnoreReason::NoAudio)
        );
        assert_eq!(
            screen_update(&update(voice_json(5, None)), &["99".into()]),
            Disposition::Ignored(IgnoreReason::Unauthorized)
        );
    }

    #[test]
    fn parse_update_rejects_garbage() {
        assert!(parse_update(b"not json").is_err());
        let body = json!({"update_id": 1, "message": voice_json(99, None)}).to_string();
        assert!(parse_update(body.as_bytes()).is_ok());
    }

    #[test]
    fn screen_ignores_edited_messages() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 1001,
            "edited_message": {
                "message_id": 7,
                "date": 1700000000i64,
                "edit_date": 1700000100i64,
                "chat": {"id": 42i64, "type": "private", "first_name": "Test"},
                "from": sender(99, None),
                "text": "edited"
            }
        }))
        .unwrap();
        assert_eq!(
            screen_update(&update, &["99".into()]),
            Disposition::Ignored(IgnoreReason::NotAMessage)
        );
    }
}
