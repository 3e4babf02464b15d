//! Attachment downloads through the Bot API.

use async_trait::async_trait;
use std::path::Path;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::errors::is_file_too_big;
use crate::request::{DownloadError, MediaRequest, MediaSource};

/// Downloads attachments sent to the bot.
///
/// The public Bot API only serves files up to 20 MB; larger attachments are
/// refused with "file is too big", which surfaces as a rejected download.
#[derive(Clone)]
pub struct TelegramSource {
    bot: Bot,
}

impl TelegramSource {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MediaSource for TelegramSource {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn download(
        &self,
        request: &MediaRequest,
        destination: &Path,
    ) -> Result<u64, DownloadError> {
        let file = self
            .bot
            .get_file(FileId(request.file_id.clone()))
            .await
            .map_err(|e| {
                if is_file_too_big(&e) {
                    DownloadError::Rejected {
                        reason: e.to_string(),
                    }
                } else {
                    DownloadError::Transient {
                        reason: e.to_string(),
                    }
                }
            })?;
        debug!(request_id = %request.id, path = %file.path, "Resolved attachment");

        let mut dst = tokio::fs::File::create(destination).await?;
        self.bot
            .download_file(&file.path, &mut dst)
            .await
            .map_err(|e| DownloadError::Transient {
                reason: e.to_string(),
            })?;
        dst.flush().await?;

        let written = tokio::fs::metadata(destination).await?.len();
        Ok(written)
    }
}
