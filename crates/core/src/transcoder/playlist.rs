//! Playlist inspection and segment enumeration.

use m3u8_rs::Playlist;
use std::path::{Path, PathBuf};

use super::error::TranscoderError;

/// Extension of MPEG-TS segment files.
const SEGMENT_EXTENSION: &str = "ts";

/// Lists segment files in `dir`, sorted by file name.
///
/// Segment names carry a fixed-width counter, so lexicographic order is
/// playback order.
pub async fn collect_segments(dir: &Path) -> Result<Vec<PathBuf>, TranscoderError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut segments = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_segment = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(SEGMENT_EXTENSION))
            .unwrap_or(false);
        if is_segment && entry.file_type().await?.is_file() {
            segments.push(path);
        }
    }

    segments.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(segments)
}

/// Returns the file names of the segments a media playlist references, in order.
pub fn playlist_segment_names(content: &[u8]) -> Result<Vec<String>, TranscoderError> {
    match m3u8_rs::parse_playlist_res(content) {
        Ok(Playlist::MediaPlaylist(playlist)) => Ok(playlist
            .segments
            .iter()
            .map(|segment| {
                Path::new(&segment.uri)
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| segment.uri.clone())
            })
            .collect()),
        Ok(Playlist::MasterPlaylist(_)) => Err(TranscoderError::PlaylistInvalid {
            reason: "expected a media playlist, found a master playlist".to_string(),
        }),
        Err(e) => Err(TranscoderError::PlaylistInvalid {
            reason: format!("{:?}", e),
        }),
    }
}

/// Checks that `playlist` references exactly `segments`, in the same order.
pub async fn verify_playlist(playlist: &Path, segments: &[PathBuf]) -> Result<(), TranscoderError> {
    let content = match tokio::fs::read(playlist).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TranscoderError::PlaylistMissing {
                path: playlist.to_path_buf(),
            })
        }
        Err(e) => return Err(TranscoderError::Io(e)),
    };

    let listed = playlist_segment_names(&content)?;
    let on_disk: Vec<String> = segments
        .iter()
        .filter_map(|p| p.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .collect();

    if listed != on_disk {
        return Err(TranscoderError::PlaylistMismatch {
            listed: listed.len(),
            on_disk: on_disk.len(),
        });
    }

    Ok(())
}
