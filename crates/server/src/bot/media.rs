use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, info, Instrument};

use hls_relay_core::{MediaRequest, Pipeline, PipelineError};

use crate::metrics::BOT_UPDATES_TOTAL;

/// Hands a media message to the pipeline in a background task.
pub async fn handle_media(pipeline: Arc<Pipeline>, request: MediaRequest) -> ResponseResult<()> {
    BOT_UPDATES_TOTAL.with_label_values(&["media"]).inc();

    let span = tracing::info_span!("request", id = %request.id, chat_id = request.chat_id);
    tokio::spawn(
        async move {
            let outcome = pipeline.handle(request).await;
            info!(
                result = outcome.result.label(),
                duration_ms = outcome.duration_ms,
                "Request finished"
            );
        }
        .instrument(span),
    );
    Ok(())
}

/// Tells the sender that this kind of media is not handled.
pub async fn reject_unsupported(bot: Bot, msg: Message, kind: &'static str) -> ResponseResult<()> {
    BOT_UPDATES_TOTAL.with_label_values(&["unsupported"]).inc();
    debug!(chat_id = msg.chat.id.0, kind, "Unsupported media");
    bot.send_message(msg.chat.id, unsupported_reply(kind)).await?;
    Ok(())
}

fn unsupported_reply(kind: &str) -> String {
    PipelineError::UnsupportedMedia {
        reason: format!("{}s cannot be converted", kind),
    }
    .user_message()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_reply_names_the_kind() {
        let reply = unsupported_reply("photo");
        assert!(reply.contains("Unsupported media: photos cannot be converted"));
        assert!(reply.contains("Send a video"));
    }
}
