//! Web server configuration.

use std::time::Instant;

/// Default floating message shown by the landing page widget.
pub const DEFAULT_MESSAGE: &str = "Welcome aboard The Ark!";

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Text served by `/message.json`.
    pub message: String,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl WebConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Sets the floating message text.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns the bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            message: DEFAULT_MESSAGE.to_string(),
            start_time: Instant::now(),
        }
    }
}
