//! Private channel storage.

use async_trait::async_trait;
use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberKind, FileId, InputFile};
use tracing::{debug, warn};

use super::errors::{classify_request_error, classify_upload_error};
use crate::storage::{Storage, StorageError, UploadOptions, UploadedReference};

/// Posts files as documents to a channel the bot administers.
///
/// The locator of an upload is its message id in the channel; the Bot API
/// file id is kept so the file's download path can be resolved later.
#[derive(Clone)]
pub struct ChannelStorage {
    bot: Bot,
    channel_id: i64,
}

impl ChannelStorage {
    pub fn new(bot: Bot, channel_id: i64) -> Self {
        Self { bot, channel_id }
    }

    fn destination(&self) -> String {
        self.channel_id.to_string()
    }
}

#[async_trait]
impl Storage for ChannelStorage {
    fn name(&self) -> &str {
        "telegram_channel"
    }

    async fn check_access(&self) -> Result<(), StorageError> {
        let chat = ChatId(self.channel_id);
        let destination = self.destination();

        self.bot
            .get_chat(chat)
            .await
            .map_err(|e| classify_request_error(&destination, &e))?;

        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| StorageError::transient(e.to_string()))?;

        // Membership lookups are not allowed in every channel type; only a
        // definite non-admin answer fails the check.
        match self.bot.get_chat_member(chat, me.id).await {
            Ok(member) => {
                if !matches!(
                    member.kind,
                    ChatMemberKind::Owner(_) | ChatMemberKind::Administrator(_)
                ) {
                    return Err(StorageError::PermissionDenied {
                        destination,
                        reason: "bot is not an administrator of the channel".to_string(),
                    });
                }
            }
            Err(e) => {
                warn!(channel_id = self.channel_id, error = %e, "Could not read bot membership")
            }
        }

        debug!(channel_id = self.channel_id, "Channel access confirmed");
        Ok(())
    }

    async fn upload(
        &self,
        path: &Path,
        options: &UploadOptions,
    ) -> Result<UploadedReference, StorageError> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(StorageError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let destination = self.destination();
        let mut request = self
            .bot
            .send_document(ChatId(self.channel_id), InputFile::file(path.to_path_buf()))
            .disable_content_type_detection(true);
        if let Some(caption) = &options.caption {
            request = request.caption(caption.clone());
        }

        let message = request
            .await
            .map_err(|e| classify_upload_error(&destination, path, &e))?;

        Ok(UploadedReference {
            destination,
            locator: message.id.0.to_string(),
            file_id: uploaded_file_id(&message),
        })
    }

    async fn resolve_path(&self, reference: &UploadedReference) -> Result<String, StorageError> {
        let file_id = reference
            .file_id
            .clone()
            .ok_or_else(|| StorageError::ResolveFailed {
                reason: format!("message {} carries no file", reference.locator),
            })?;

        let file = self
            .bot
            .get_file(FileId(file_id))
            .await
            .map_err(|e| StorageError::ResolveFailed {
                reason: e.to_string(),
            })?;
        Ok(file.path)
    }
}

/// File id of whatever media the channel post ended up carrying.
///
/// Content type detection is disabled on upload, but Telegram may still
/// store a file as video, audio or animation.
fn uploaded_file_id(message: &Message) -> Option<String> {
    first_file_id([
        message.document().map(|d| &d.file.id),
        message.video().map(|v| &v.file.id),
        message.audio().map(|a| &a.file.id),
        message.animation().map(|a| &a.file.id),
    ])
}

fn first_file_id<'a>(candidates: impl IntoIterator<Item = Option<&'a FileId>>) -> Option<String> {
    candidates.into_iter().flatten().next().map(|id| id.0.clone())
}
