use serde::{Deserialize, Serialize};
use std::env;

/// Process-wide configuration, read once at startup and passed explicitly
/// into the supervisor and the status server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    /// Upstream PubSub WebSocket URL. The relay stays idle without it.
    pub pubsub_url: Option<String>,
    /// Downstream webhook sink URL. The relay stays idle without it.
    pub webhook_url: Option<String>,
    /// Seconds to wait between the end of one session and the next attempt.
    pub reconnect_delay_secs: u64,
    /// Per-request timeout for webhook deliveries, in seconds.
    pub request_timeout: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .unwrap_or(10000),
            pubsub_url: env::var("PUBSUB_URL").ok(),
            webhook_url: env::var("WEBHOOK_URL").ok(),
            reconnect_delay_secs: env::var("RECONNECT_DELAY_SECS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap_or(2),
            request_timeout: env::var("REQUEST_TIMEOUT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        }
    }

}
