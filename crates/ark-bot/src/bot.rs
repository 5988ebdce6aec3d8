//! Main Telegram bot implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use ark_web::WebState;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use teloxide::update_listeners::webhooks;
use tokio::time::interval;
use tracing::{debug, error, info};
use url::Url;

use crate::config::{redact_token, BotConfig};
use crate::error::{BotError, Result};
use crate::handlers::{
    handle_callback, handle_command, handle_message, handle_unknown_command, is_plain_text,
    is_slash_text, Command,
};
use crate::state::{create_shared_state, ArkState};

/// How often expired dialogues are dropped.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// The Ark Telegram bot plus its HTTP pages.
pub struct ArkBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Shared state across handlers.
    state: Arc<ArkState>,
    config: BotConfig,
}

impl ArkBot {
    /// Creates the bot and opens the store named by `config`.
    pub fn new(config: BotConfig) -> Self {
        let state = create_shared_state(&config);
        Self::with_state(config, state)
    }

    /// Create an ArkBot with custom state (for testing).
    pub fn with_state(config: BotConfig, state: Arc<ArkState>) -> Self {
        Self {
            bot: Bot::new(config.token.clone()),
            state,
            config,
        }
    }

    pub fn state(&self) -> &Arc<ArkState> {
        &self.state
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| BotError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Runs until Ctrl+C: webhook mode when a public URL is configured,
    /// polling otherwise.
    pub async fn start(&self) -> Result<()> {
        match self.config.webhook_url()? {
            Some(url) => self.start_webhook(url).await,
            None => self.start_polling().await,
        }
    }

    /// Long polling, with the web pages served alongside.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting Telegram bot in polling mode...");

        let addr = self.config.bind_address();
        let router = ark_web::create_router(self.web_state());
        tokio::spawn(async move {
            if let Err(e) = ark_web::serve(&addr, router).await {
                error!(addr = %addr, error = %e, "HTTP server failed");
            }
        });

        spawn_dialogue_sweeper(Arc::clone(&self.state));

        info!("Bot is running! Send /start to begin.");

        Dispatcher::builder(self.bot.clone(), build_handler(Arc::clone(&self.state)))
            .default_handler(|upd| async move {
                debug!("Unhandled update: {:?}", upd);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }

    /// Webhook mode: registers `url` with Telegram and serves updates and
    /// pages from one HTTP server.
    pub async fn start_webhook(&self, url: Url) -> Result<()> {
        let redacted = redact_token(&url, &self.config.token);
        info!(url = %redacted, "Starting Telegram bot in webhook mode...");

        let addr: SocketAddr = self.config.bind_address().parse().map_err(|e| {
            BotError::InvalidConfig(format!("{}: {e}", self.config.bind_address()))
        })?;

        let (listener, stop_flag, webhook_router) =
            webhooks::axum_to_router(self.bot.clone(), webhooks::Options::new(addr, url))
                .await
                .map_err(|e| BotError::WebhookFailed(e.to_string()))?;
        info!(url = %redacted, "Webhook registered");

        let app = webhook_router.merge(ark_web::create_router(self.web_state()));
        let tcp = tokio::net::TcpListener::bind(addr).await?;
        info!(addr = %addr, "HTTP server listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(tcp, app).with_graceful_shutdown(stop_flag).await {
                error!(error = %e, "HTTP server failed");
            }
        });

        spawn_dialogue_sweeper(Arc::clone(&self.state));

        info!("Bot is running! Send /start to begin.");

        Dispatcher::builder(self.bot.clone(), build_handler(Arc::clone(&self.state)))
            .default_handler(|upd| async move {
                debug!("Unhandled update: {:?}", upd);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
            )
            .await;

        Ok(())
    }

    fn web_state(&self) -> WebState {
        WebState::new(self.config.web_config(), self.state.library())
    }
}

/// Routes updates: button presses, parsed commands, unknown slash
/// commands, then free text.
fn build_handler(state: Arc<ArkState>) -> UpdateHandler<teloxide::RequestError> {
    let state_for_commands = Arc::clone(&state);
    let state_for_messages = Arc::clone(&state);
    let state_for_callbacks = state;

    dptree::entry()
        .branch(
            Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let state = Arc::clone(&state_for_callbacks);
                async move { handle_callback(bot, q, state).await }
            }),
        )
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                    let state = Arc::clone(&state_for_commands);
                    info!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);
                    async move { handle_command(bot, msg, cmd, state).await }
                }),
        )
        .branch(
            Update::filter_message()
                .filter(|msg: Message| is_slash_text(&msg))
                .endpoint(|bot: Bot, msg: Message| async move {
                    handle_unknown_command(bot, msg).await
                }),
        )
        .branch(
            Update::filter_message()
                .filter(|msg: Message| is_plain_text(&msg))
                .endpoint(move |bot: Bot, msg: Message| {
                    let state = Arc::clone(&state_for_messages);
                    async move { handle_message(bot, msg, state).await }
                }),
        )
}

/// Background task that drops dialogues past their idle timeout.
fn spawn_dialogue_sweeper(state: Arc<ArkState>) {
    tokio::spawn(async move {
        let mut ticker = interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let dropped = state.tracker().sweep_expired().await;
            if dropped > 0 {
                info!(dropped, "Expired dialogues dropped");
            }
        }
    });
}
