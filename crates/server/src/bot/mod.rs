//! Telegram update handling.
//!
//! Only private chats are served. Commands are answered inline; media
//! messages are turned into pipeline requests that run in their own task,
//! so a long conversion never blocks other senders. Media the pipeline
//! cannot take gets an immediate reply and is never downloaded.

mod commands;
mod media;

use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use hls_relay_core::Pipeline;

use commands::Command;

/// Runs the dispatcher until Ctrl+C.
pub async fn run(bot: Bot, pipeline: Arc<Pipeline>) {
    let handler = Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private())
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(commands::answer),
        )
        .branch(dptree::filter_map(|msg: Message| {
            hls_relay_core::telegram::media_request(&msg)
        })
        .endpoint(media::handle_media))
        .branch(dptree::filter_map(|msg: Message| {
            hls_relay_core::telegram::unsupported_kind(&msg)
        })
        .endpoint(media::reject_unsupported));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![pipeline])
        .default_handler(|update| async move {
            debug!(update_id = ?update.id, "Ignoring update");
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
