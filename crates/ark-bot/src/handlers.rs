//! Telegram handlers: turn updates into calls on [`ArkState`] and send the
//! resulting [`Reply`].

use std::sync::Arc;

use ark_web::pages::html_escape;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ParseMode, UserId};
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use crate::dispatch::Reply;
use crate::state::ArkState;

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Register and show the main menu")]
    Start,

    #[command(description = "Show this help message")]
    Help,

    #[command(description = "Add a link to the library (title, then URL)")]
    AddLink,

    #[command(description = "Cancel the current dialogue")]
    Cancel,

    #[command(description = "Show the most recent library links")]
    Links,
}

/// Sends a reply as HTML, attaching its keyboard if any.
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> ResponseResult<()> {
    let mut request = bot
        .send_message(chat_id, reply.text)
        .parse_mode(ParseMode::Html);
    if let Some(keyboard) = reply.keyboard {
        request = request.reply_markup(keyboard);
    }
    request.await?;
    Ok(())
}

/// Dispatch commands to the matching state operation.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<ArkState>,
) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        debug!(chat_id = %msg.chat.id, "Command without sender ignored");
        return Ok(());
    };
    let user_id = user.id.0;

    let reply = match cmd {
        Command::Start => state.start(user_id, &user.full_name()).await,
        Command::Help => Reply::text(html_escape(&Command::descriptions().to_string())),
        Command::AddLink => state.begin_add_link(user_id).await,
        Command::Cancel => state.cancel(user_id).await,
        Command::Links => state.recent_links().await,
    };

    send_reply(&bot, msg.chat.id, reply).await
}

/// Handle inline keyboard presses.
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<ArkState>,
) -> ResponseResult<()> {
    // Stops the client-side spinner whether or not the data is understood.
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let user_id = q.from.id.0;
    info!(user_id = user_id, data = %data, "Callback received");

    if let Some(reply) = state.callback(user_id, data).await {
        send_reply(&bot, callback_chat_id(&q), reply).await?;
    }
    Ok(())
}

/// Chat a button press is answered in: the chat holding the menu, or the
/// presser's private chat when Telegram did not include the message.
pub fn callback_chat_id(q: &CallbackQuery) -> ChatId {
    reply_chat(q.message.as_ref().map(|m| m.chat().id), q.from.id)
}

fn reply_chat(message_chat: Option<ChatId>, presser: UserId) -> ChatId {
    message_chat.unwrap_or_else(|| ChatId::from(presser))
}

/// Handle non-command text: dialogue step inputs.
pub async fn handle_message(bot: Bot, msg: Message, state: Arc<ArkState>) -> ResponseResult<()> {
    let (Some(user), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        return Ok(());
    };

    match state.text(user.id.0, text).await {
        Some(reply) => send_reply(&bot, msg.chat.id, reply).await,
        None => {
            debug!(user_id = user.id.0, "Text outside a dialogue ignored");
            Ok(())
        }
    }
}

/// Handle slash messages that did not parse as a [`Command`].
pub async fn handle_unknown_command(bot: Bot, msg: Message) -> ResponseResult<()> {
    if let Some(text) = msg.text() {
        let name = text.split_whitespace().next().unwrap_or(text);
        warn!(chat_id = %msg.chat.id, command = %name, "Unrecognized command");
        let reply = Reply::text(format!(
            "Unknown command: {}\n\nUse /help to see available commands.",
            html_escape(name)
        ));
        send_reply(&bot, msg.chat.id, reply).await?;
    }
    Ok(())
}

/// Whether a message should go to [`handle_unknown_command`].
pub fn is_slash_text(msg: &Message) -> bool {
    msg.text().is_some_and(is_command_like)
}

/// Whether a message is free text for [`handle_message`].
pub fn is_plain_text(msg: &Message) -> bool {
    msg.text().is_some_and(|t| !is_command_like(t))
}

fn is_command_like(text: &str) -> bool {
    text.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("/start", "ark_bot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/addlink", "ark_bot").unwrap(), Command::AddLink);
        assert_eq!(Command::parse("/cancel", "ark_bot").unwrap(), Command::Cancel);
        assert_eq!(Command::parse("/links", "ark_bot").unwrap(), Command::Links);
        assert!(Command::parse("/unknown", "ark_bot").is_err());
    }

    #[test]
    fn test_callback_reply_goes_to_menu_chat() {
        let group = ChatId(-1001234567890);
        assert_eq!(reply_chat(Some(group), UserId(42)), group);
    }

    #[test]
    fn test_callback_without_message_goes_to_presser() {
        assert_eq!(reply_chat(None, UserId(42)), ChatId(42));
    }

    #[test]
    fn test_slash_and_plain_text_are_disjoint() {
        for text in ["/start", "/unknown arg", "/", "/addlink@ark_bot"] {
            assert!(is_command_like(text), "{text} should route as a command");
        }
        for text in ["Article 1", "http://x", " /start", "", "a/b"] {
            assert!(!is_command_like(text), "{text:?} should route as dialogue input");
        }
    }

    #[tokio::test]
    async fn test_slash_text_never_advances_dialogue() {
        use ark_persistence::MemoryStore;

        use crate::dialogue::{DialogueState, DialogueTracker, LinkStep};

        let store = Arc::new(MemoryStore::new());
        let state = ArkState::new(DialogueTracker::default(), store.clone(), store, None);
        state.begin_add_link(1).await;

        for text in ["/unknown", "Article 1"] {
            if !is_command_like(text) {
                state.text(1, text).await;
            }
        }

        assert_eq!(
            state.tracker().state(1).await,
            DialogueState::AwaitingLibraryLink {
                step: LinkStep::Url,
                title: Some("Article 1".to_string()),
            }
        );
    }

    #[test]
    fn test_descriptions_list_every_command() {
        let help = Command::descriptions().to_string();
        for cmd in ["/start", "/help", "/addlink", "/cancel", "/links"] {
            assert!(help.contains(cmd), "missing {cmd}");
        }
    }
}
