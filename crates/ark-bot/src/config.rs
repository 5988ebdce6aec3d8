//! Environment configuration.
//!
//! # Environment Variables
//!
//! Required:
//! - `BOT_TOKEN`: Bot token from @BotFather
//!
//! Optional:
//! - `WEBAPP_URL`: URL opened by the "Open App" button
//! - `PUBLIC_URL`: Public base URL; enables webhook mode at `<PUBLIC_URL>/bot<token>`
//! - `HOST`: Listen host (default: 0.0.0.0)
//! - `PORT`: Listen port (default: 3000)
//! - `ARK_STATE_DIR`: State directory (default: ~/.ark)
//! - `ARK_DATA_FILE`: Store file (default: `<state dir>/db.json`)
//! - `DIALOGUE_TIMEOUT_MINS`: Idle minutes before a dialogue expires (default: 30, 0 = never)
//! - `ARK_MESSAGE`: Text for the landing page floating message

use std::path::PathBuf;
use std::time::Duration;

use ark_web::WebConfig;
use url::Url;

use crate::error::{BotError, Result};

pub const BOT_TOKEN_ENV: &str = "BOT_TOKEN";
pub const WEBAPP_URL_ENV: &str = "WEBAPP_URL";
pub const PUBLIC_URL_ENV: &str = "PUBLIC_URL";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const STATE_DIR_ENV: &str = "ARK_STATE_DIR";
pub const DATA_FILE_ENV: &str = "ARK_DATA_FILE";
pub const DIALOGUE_TIMEOUT_ENV: &str = "DIALOGUE_TIMEOUT_MINS";
pub const MESSAGE_ENV: &str = "ARK_MESSAGE";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATE_DIR: &str = ".ark";
const DATA_FILE_NAME: &str = "db.json";
const DEFAULT_DIALOGUE_TIMEOUT_MINS: u64 = 30;

/// Runtime configuration for the bot and its HTTP server.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub webapp_url: Option<Url>,
    pub public_url: Option<Url>,
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    /// `None` disables dialogue expiry.
    pub dialogue_timeout: Option<Duration>,
    pub message: String,
}

impl BotConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = var(BOT_TOKEN_ENV).ok_or(BotError::NoToken)?;

        let port = match var(PORT_ENV) {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|_| BotError::InvalidConfig(format!("{PORT_ENV}={p} is not a port")))?,
            None => DEFAULT_PORT,
        };

        let dialogue_timeout = match var(DIALOGUE_TIMEOUT_ENV) {
            Some(m) => {
                let mins: u64 = m.trim().parse().map_err(|_| {
                    BotError::InvalidConfig(format!("{DIALOGUE_TIMEOUT_ENV}={m} is not a number"))
                })?;
                (mins > 0).then(|| Duration::from_secs(mins * 60))
            }
            None => Some(Duration::from_secs(DEFAULT_DIALOGUE_TIMEOUT_MINS * 60)),
        };

        let data_file = var(DATA_FILE_ENV).map(PathBuf::from).unwrap_or_else(|| {
            let state_dir = var(STATE_DIR_ENV).map(PathBuf::from).unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(DEFAULT_STATE_DIR))
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
            });
            state_dir.join(DATA_FILE_NAME)
        });

        Ok(Self {
            token,
            webapp_url: parse_url(WEBAPP_URL_ENV, var(WEBAPP_URL_ENV))?,
            public_url: parse_url(PUBLIC_URL_ENV, var(PUBLIC_URL_ENV))?,
            host: var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_file,
            dialogue_timeout,
            message: var(MESSAGE_ENV).unwrap_or_else(|| ark_web::config::DEFAULT_MESSAGE.to_string()),
        })
    }

    /// Path Telegram posts updates to: `/bot<token>` with the token's ':'
    /// percent-encoded, so the router sees a literal segment instead of a
    /// path parameter.
    pub fn webhook_path(&self) -> String {
        format!("/bot{}", encode_token(&self.token))
    }

    /// Webhook URL registered with Telegram, `<PUBLIC_URL>/bot<token>`.
    /// `None` means the bot runs in polling mode.
    pub fn webhook_url(&self) -> Result<Option<Url>> {
        let Some(base) = &self.public_url else {
            return Ok(None);
        };
        let raw = format!(
            "{}{}",
            base.as_str().trim_end_matches('/'),
            self.webhook_path()
        );
        Url::parse(&raw)
            .map(Some)
            .map_err(|e| BotError::InvalidConfig(format!("webhook URL: {e}")))
    }

    /// Returns the bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configuration for the HTTP pages.
    pub fn web_config(&self) -> WebConfig {
        WebConfig::new(self.host.clone(), self.port).with_message(self.message.clone())
    }
}

fn parse_url(key: &str, value: Option<String>) -> Result<Option<Url>> {
    value
        .map(|v| {
            Url::parse(v.trim())
                .map_err(|e| BotError::InvalidConfig(format!("{key}={v}: {e}")))
        })
        .transpose()
}

fn encode_token(token: &str) -> String {
    token.replace(':', "%3A")
}

/// Replaces the token inside a webhook URL for logging.
pub fn redact_token(url: &Url, token: &str) -> String {
    url.as_str().replace(&encode_token(token), "<token>")
}
