use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::metrics::BOT_UPDATES_TOTAL;

pub const START_TEXT: &str = "Send any VIDEO (or file). I'll convert it to HLS (.m3u8) and upload it to your private storage channel.\n\n\
Make sure the bot is added to the channel and granted admin rights (Post messages + add media).";

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "show what this bot does")]
    Start,
    #[command(description = "list commands")]
    Help,
}

pub async fn answer(bot: Bot, msg: Message, cmd: Command) -> ResponseResult<()> {
    BOT_UPDATES_TOTAL.with_label_values(&["command"]).inc();
    let text = match cmd {
        Command::Start => START_TEXT.to_string(),
        Command::Help => format!("{}\n\n{}", START_TEXT, Command::descriptions()),
    };
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start", "hls_bot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/help", "hls_bot").unwrap(), Command::Help);
        assert!(Command::parse("/convert", "hls_bot").is_err());
    }

    #[test]
    fn test_start_text_mentions_admin_rights() {
        assert!(START_TEXT.contains("admin rights"));
    }
}
