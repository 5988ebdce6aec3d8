//! HTTP surface for The Ark.
//!
//! Serves the mini app landing page, the informational pages, the floating
//! message used by the page widget, and a small JSON API over the library:
//!
//! - `GET /`, `/library`, `/word`, `/knee`, `/heart`, `/contact`
//! - `GET /message.json`
//! - `GET /api/health`, `GET /api/library`
//!
//! The Telegram webhook route is not defined here; the bot crate merges
//! teloxide's webhook router into [`create_router`]'s output.

pub mod config;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod router;
pub mod state;
pub mod types;

pub use config::WebConfig;
pub use error::{Result, WebError};
pub use router::{create_router, serve};
pub use state::WebState;
