//! Per-request scratch directories.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DOWNLOAD_DIR: &str = "download";
const HLS_DIR: &str = "hls";

/// `<temp root>/<request id>/` with `download/` and `hls/` inside.
///
/// Owned by exactly one request. Removed by [`Workspace::cleanup`]; if a
/// workspace is dropped without cleanup (e.g. on panic) it is removed
/// synchronously on drop.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    removed: bool,
}

impl Workspace {
    /// Creates the directory pair for `request_id`.
    pub async fn create(temp_root: &Path, request_id: &str) -> io::Result<Self> {
        let root = temp_root.join(request_id);
        tokio::fs::create_dir_all(root.join(DOWNLOAD_DIR)).await?;
        if let Err(e) = tokio::fs::create_dir_all(root.join(HLS_DIR)).await {
            // No Workspace exists yet, so Drop will not clean up after us.
            let _ = tokio::fs::remove_dir_all(&root).await;
            return Err(e);
        }
        debug!(path = %root.display(), "Workspace created");
        Ok(Self {
            root,
            removed: false,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn download_dir(&self) -> PathBuf {
        self.root.join(DOWNLOAD_DIR)
    }

    pub fn hls_dir(&self) -> PathBuf {
        self.root.join(HLS_DIR)
    }

    /// Local path for the downloaded original.
    pub fn download_path(&self, file_name: &str) -> PathBuf {
        self.download_dir().join(sanitize_file_name(file_name))
    }

    /// Removes the workspace. Never fails; problems are logged.
    pub async fn cleanup(mut self) {
        self.removed = true;
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => debug!(path = %self.root.display(), "Workspace removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.root.display(), error = %e, "Workspace cleanup failed"),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }
}

/// Reduces a sender-supplied name to a single safe path component.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}
