//! Types for the progress module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the single status message of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusHandle {
    pub chat_id: i64,
    pub message_id: i32,
}

/// Pipeline stage of a request.
///
/// Stages only move forward. `Done` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Received,
    Validating,
    Downloading,
    Converting,
    /// Second conversion attempt with re-encoding.
    ConvertingFallback,
    UploadingPlaylist,
    UploadingSegments,
    ResolvingLink,
    Done,
    Error,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validating => "validating",
            Self::Downloading => "downloading",
            Self::Converting => "converting",
            Self::ConvertingFallback => "converting_fallback",
            Self::UploadingPlaylist => "uploading_playlist",
            Self::UploadingSegments => "uploading_segments",
            Self::ResolvingLink => "resolving_link",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    /// Status text shown while the request sits in this stage.
    ///
    /// Terminal stages carry request-specific text instead.
    pub fn status_text(&self) -> Option<&'static str> {
        match self {
            Self::Received => Some("Processing… 🔄"),
            Self::Validating => Some("Checking storage channel… 🔎"),
            Self::Downloading => Some("Downloading… ⬇️"),
            Self::Converting => Some("Converting to HLS… 🎞️"),
            Self::ConvertingFallback => Some(
                "Conversion with codec copy failed, trying a re-encode fallback (slower)… 🔁",
            ),
            Self::UploadingPlaylist => Some("Uploading HLS playlist… ☁️"),
            Self::UploadingSegments => Some(
                "Uploading segments (.ts)… This may take a moment depending on number of chunks.",
            ),
            Self::ResolvingLink => Some("Generating link… 🔗"),
            Self::Done | Self::Error => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_stages_have_no_fixed_text() {
        assert!(Stage::Done.is_terminal());
        assert!(Stage::Error.is_terminal());
        assert!(Stage::Done.status_text().is_none());
        assert!(!Stage::Converting.is_terminal());
        assert_eq!(Stage::Downloading.status_text(), Some("Downloading… ⬇️"));
    }

    #[test]
    fn test_stage_serialization() {
        assert_eq!(
            serde_json::to_string(&Stage::UploadingPlaylist).unwrap(),
            "\"uploading_playlist\""
        );
        assert_eq!(Stage::ResolvingLink.to_string(), "resolving_link");
    }
}
