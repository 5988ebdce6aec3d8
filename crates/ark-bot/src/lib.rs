//! Telegram bot for The Ark.
//!
//! Users register with `/start`, read their profile, rename themselves, and
//! add links to a shared library through short multi-step dialogues. The
//! same process serves the mini app pages from [`ark_web`].
//!
//! # Environment Variables
//!
//! Required:
//! - `BOT_TOKEN`: Bot token from @BotFather
//!
//! Optional:
//! - `WEBAPP_URL`: URL opened by the "Open App" menu button
//! - `PUBLIC_URL`: Enables webhook mode (default: polling)
//! - `HOST`, `PORT`: HTTP listen address (default: 0.0.0.0:3000)
//! - `ARK_STATE_DIR`, `ARK_DATA_FILE`: Where the JSON store lives
//! - `DIALOGUE_TIMEOUT_MINS`: Idle dialogue expiry (default: 30)
//!
//! # Example
//!
//! ```no_run
//! use ark_bot::{ArkBot, BotConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BotConfig::from_env()?;
//!     let bot = ArkBot::new(config);
//!     bot.start().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Commands
//!
//! - `/start` - Register and show the main menu
//! - `/help` - Show available commands
//! - `/addlink` - Add a library link (title, then URL)
//! - `/cancel` - Abandon the current dialogue
//! - `/links` - Show the most recent library links

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod menu;
pub mod state;

pub use bot::ArkBot;
pub use config::BotConfig;
pub use dialogue::{DialogueKind, DialogueState, DialogueTracker, LinkStep, Outcome};
pub use dispatch::Reply;
pub use error::{BotError, Result};
pub use menu::{main_menu, MenuAction};
pub use state::{create_shared_state, ArkState};
