//! Bot API error classification.

use std::path::Path;
use teloxide::{ApiError, RequestError};

use crate::storage::StorageError;

/// Maps a Bot API error description onto a storage error.
///
/// Telegram reports permission problems with a handful of free-form
/// descriptions, so matching is done on the lowercased text.
pub fn classify_api_text(destination: &str, text: &str) -> StorageError {
    let lower = text.to_lowercase();
    let reason = text.to_string();
    if lower.contains("not enough rights")
        || lower.contains("administrator")
        || lower.contains("forbidden")
        || lower.contains("kicked")
    {
        StorageError::PermissionDenied {
            destination: destination.to_string(),
            reason,
        }
    } else if lower.contains("chat not found") || lower.contains("channel_invalid") {
        StorageError::DestinationUnreachable {
            destination: destination.to_string(),
            reason,
        }
    } else {
        StorageError::transient(reason)
    }
}

/// Maps any teloxide request error onto a storage error.
pub fn classify_request_error(destination: &str, error: &RequestError) -> StorageError {
    match error {
        RequestError::Api(api) => classify_api_text(destination, &api.to_string()),
        other => StorageError::transient(other.to_string()),
    }
}

/// Maps a failed upload of `path` onto a storage error.
///
/// Size refusals are final for that file, so they become `Rejected`
/// rather than transient.
pub fn classify_upload_error(destination: &str, path: &Path, error: &RequestError) -> StorageError {
    if is_file_too_big(error) {
        StorageError::Rejected {
            path: path.to_path_buf(),
            reason: error.to_string(),
        }
    } else {
        classify_request_error(destination, error)
    }
}

/// Whether the Bot API refused a file because of its size.
pub(crate) fn is_file_too_big(error: &RequestError) -> bool {
    if matches!(error, RequestError::Api(ApiError::RequestEntityTooLarge)) {
        return true;
    }
    let lower = error.to_string().to_lowercase();
    lower.contains("file is too big") || lower.contains("request entity too large")
}

/// Edits that would leave the text unchanged are not failures.
pub(crate) fn is_message_not_modified(error: &RequestError) -> bool {
    error
        .to_string()
        .to_lowercase()
        .contains("message is not modified")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_texts() {
        for text in [
            "Bad Request: not enough rights to send documents to the chat",
            "Forbidden: bot is not a member of the channel chat",
            "Forbidden: bot was kicked from the channel chat",
            "Bad Request: need administrator rights in the channel chat",
        ] {
            let err = classify_api_text("-1001", text);
            assert!(
                matches!(err, StorageError::PermissionDenied { .. }),
                "{} -> {:?}",
                text,
                err
            );
        }
    }

    #[test]
    fn test_chat_not_found_is_unreachable() {
        let err = classify_request_error("-1001", &RequestError::Api(ApiError::ChatNotFound));
        assert!(matches!(err, StorageError::DestinationUnreachable { .. }));
        assert!(err.requires_out_of_band_fix());
    }

    #[test]
    fn test_unknown_api_error_is_transient() {
        let err = classify_request_error(
            "-1001",
            &RequestError::Api(ApiError::Unknown("Internal Server Error".to_string())),
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn test_file_too_big_detection() {
        let err = RequestError::Api(ApiError::Unknown("Bad Request: file is too big".to_string()));
        assert!(is_file_too_big(&err));
        assert!(!is_message_not_modified(&err));
    }

    #[test]
    fn test_oversized_upload_is_rejected() {
        let path = Path::new("/work/hls/segment000.ts");
        for err in [
            RequestError::Api(ApiError::RequestEntityTooLarge),
            RequestError::Api(ApiError::Unknown("Bad Request: file is too big".to_string())),
        ] {
            let classified = classify_upload_error("-1001", path, &err);
            match classified {
                StorageError::Rejected { path: rejected, .. } => assert_eq!(rejected, path),
                other => panic!("expected Rejected, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_upload_permission_error_keeps_class() {
        let err = classify_upload_error(
            "-1001",
            Path::new("/work/index.m3u8"),
            &RequestError::Api(ApiError::Unknown(
                "Bad Request: not enough rights to send documents to the chat".to_string(),
            )),
        );
        assert!(matches!(err, StorageError::PermissionDenied { .. }));
    }
}
