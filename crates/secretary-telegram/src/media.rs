// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audio download from Telegram file storage.

use secretary_core::{AudioClip, SecretaryError};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tracing::debug;

/// Resolves the file path with `getFile`, then downloads the bytes.
pub async fn download_audio(bot: &Bot, file_id: &str) -> Result<AudioClip, SecretaryError> {
    let file = bot
        .get_file(FileId(file_id.to_owned()))
        .await
        .map_err(|e| SecretaryError::Channel {
            message: format!("failed to get file info: {e}"),
            source: Some(Box::new(e)),
        })?;

    let mut data = Vec::new();
    bot.download_file(&file.path, &mut data)
        .await
        .map_err(|e| SecretaryError::Channel {
            message: format!("failed to download file: {e}"),
            source: Some(Box::new(e)),
        })?;

    if data.is_empty() {
        return Err(SecretaryError::channel("downloaded audio is empty"));
    }

    let (filename, mime_type) = clip_metadata(&file.path);
    debug!(file_id, size = data.len(), filename = %filename, "downloaded audio from Telegram");
    Ok(AudioClip {
        data,
        filename,
        mime_type: mime_type.to_string(),
    })
}

/// Filename and MIME type for a Telegram file path such as `voice/file_3.oga`.
///
/// Voice notes are Opus in an Ogg container; unknown extensions are sent
/// as `voice.ogg` so the transcription endpoint accepts them.
pub fn clip_metadata(file_path: &str) -> (String, &'static str) {
    let name = file_path.rsplit('/').next().unwrap_or_default();
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let mime = match extension.as_str() {
        "oga" | "ogg" | "opus" => "audio/ogg",
        "mp3" | "mpga" | "mpeg" => "audio/mpeg",
        "m4a" | "mp4" => "audio/mp4",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "flac" => "audio/flac",
        _ => return ("voice.ogg".to_string(), "audio/ogg"),
    };
    (name.to_string(), mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_path_keeps_name() {
        assert_eq!(
            clip_metadata("voice/file_3.oga"),
            ("file_3.oga".to_string(), "audio/ogg")
        );
    }

    #[test]
    fn music_extensions_map_to_mime() {
        assert_eq!(clip_metadata("music/song.MP3").1, "audio/mpeg");
        assert_eq!(clip_metadata("music/memo.m4a").1, "audio/mp4");
    }

    #[test]
    fn unknown_extension_falls_back_to_ogg() {
        assert_eq!(
            clip_metadata("documents/file_9"),
            ("voice.ogg".to_string(), "audio/ogg")
        );
        assert_eq!(clip_metadata("").0, "voice.ogg");
    }
}
