//! Extraction of media requests from incoming messages.

use teloxide::types::Message;

use crate::request::{MediaKind, MediaRequest};

/// Builds a request from the first media attachment of `message`.
///
/// Videos win over documents, documents over audio. Returns `None` when the
/// message carries none of them.
pub fn media_request(message: &Message) -> Option<MediaRequest> {
    let chat_id = message.chat.id.0;

    if let Some(video) = message.video() {
        return Some(MediaRequest::new(
            chat_id,
            video.file.id.0.clone(),
            video.file_name.clone(),
            u64::from(video.file.size),
            MediaKind::Video,
        ));
    }
    if let Some(document) = message.document() {
        return Some(MediaRequest::new(
            chat_id,
            document.file.id.0.clone(),
            document.file_name.clone(),
            u64::from(document.file.size),
            MediaKind::Document,
        ));
    }
    message.audio().map(|audio| {
        MediaRequest::new(
            chat_id,
            audio.file.id.0.clone(),
            audio.file_name.clone(),
            u64::from(audio.file.size),
            MediaKind::Audio,
        )
    })
}

/// Names the media a message carries when the pipeline cannot take it.
///
/// Returns `None` for messages without media and for messages
/// [`media_request`] accepts.
pub fn unsupported_kind(message: &Message) -> Option<&'static str> {
    if message.photo().is_some() {
        Some("photo")
    } else if message.voice().is_some() {
        Some("voice message")
    } else if message.video_note().is_some() {
        Some("video note")
    } else if message.sticker().is_some() {
        Some("sticker")
    } else if message.animation().is_some() {
        Some("animation")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(media: serde_json::Value) -> Message {
        let mut value = json!({
            "message_id": 7,
            "date": 1700000000,
            "chat": {"id": 42, "type": "private", "first_name": "Sender"},
            "from": {"id": 42, "is_bot": false, "first_name": "Sender"}
        });
        if let (Some(object), Some(extra)) = (value.as_object_mut(), media.as_object()) {
            object.extend(extra.clone());
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_video_becomes_request() {
        let msg = message(json!({
            "video": {
                "file_id": "vid",
                "file_unique_id": "u-vid",
                "width": 640,
                "height": 360,
                "duration": 12,
                "file_name": "clip.mp4",
                "file_size": 2048
            }
        }));

        let request = media_request(&msg).unwrap();
        assert_eq!(request.chat_id, 42);
        assert_eq!(request.file_id, "vid");
        assert_eq!(request.file_name, "clip.mp4");
        assert_eq!(request.size_bytes, 2048);
        assert_eq!(request.kind, MediaKind::Video);
        assert_eq!(unsupported_kind(&msg), None);
    }

    #[test]
    fn test_photo_is_unsupported() {
        let msg = message(json!({
            "photo": [
                {"file_id": "p", "file_unique_id": "u-p", "width": 90, "height": 90, "file_size": 100}
            ]
        }));

        assert!(media_request(&msg).is_none());
        assert_eq!(unsupported_kind(&msg), Some("photo"));
    }

    #[test]
    fn test_voice_is_unsupported() {
        let msg = message(json!({
            "voice": {"file_id": "v", "file_unique_id": "u-v", "duration": 3, "file_size": 100}
        }));

        assert!(media_request(&msg).is_none());
        assert_eq!(unsupported_kind(&msg), Some("voice message"));
    }

    #[test]
    fn test_plain_text_is_neither() {
        let msg = message(json!({"text": "hello"}));
        assert!(media_request(&msg).is_none());
        assert_eq!(unsupported_kind(&msg), None);
    }
}
