//! Session supervision.
//!
//! Keeps the relay within a bounded delay of having an active upstream
//! session for the lifetime of the process. Every session end schedules a
//! fresh attempt after a fixed interval, with no retry cap and no backoff.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::services::forwarder::EventForwarder;
use crate::services::stream::{SessionEnd, SessionSource, StreamConnection};

/// Fixed delay between the end of one session and the next attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Restarts upstream sessions forever.
pub struct Supervisor {
    source: Arc<dyn SessionSource>,
    restart_delay: Duration,
}

impl Supervisor {
    pub fn new(source: Arc<dyn SessionSource>) -> Self {
        Self {
            source,
            restart_delay: RECONNECT_DELAY,
        }
    }

    /// Build a supervisor from configuration.
    ///
    /// Returns `None` when either relay endpoint is missing: the missing
    /// variables are logged once and the process stays up to serve health
    /// checks, performing no relay work.
    pub fn from_config(config: &Config) -> Option<Self> {
        if config.pubsub_url.is_none() {
            error!("Missing env PUBSUB_URL");
        }
        if config.webhook_url.is_none() {
            error!("Missing env WEBHOOK_URL");
        }

        let (Some(pubsub_url), Some(webhook_url)) =
            (config.pubsub_url.clone(), config.webhook_url.clone())
        else {
            warn!("⚠️ Relay endpoints not configured, staying idle");
            return None;
        };

        let forwarder = EventForwarder::new(
            webhook_url,
            Duration::from_secs(config.request_timeout),
        );
        let connection = StreamConnection::new(pubsub_url, forwarder);

        Some(
            Self::new(Arc::new(connection))
                .with_restart_delay(Duration::from_secs(config.reconnect_delay_secs)),
        )
    }

    /// Override the fixed restart delay.
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    /// Run sessions until the process terminates. Never returns.
    pub async fn run(self) {
        info!("🚀 Relay supervisor started");

        loop {
            match self.source.run_session().await {
                SessionEnd::Closed => {
                    warn!(
                        "⚠️ PubSub disconnected. Reconnecting in {:?}...",
                        self.restart_delay
                    );
                }
                SessionEnd::Failed => {
                    warn!(
                        "⚠️ PubSub session failed. Reconnecting in {:?}...",
                        self.restart_delay
                    );
                }
            }

            metrics::counter!("pubsub_reconnects").increment(1);
            sleep(self.restart_delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(pubsub: Option<&str>, webhook: Option<&str>) -> Config {
        Config {
            environment: "test".to_string(),
            port: 10000,
            pubsub_url: pubsub.map(String::from),
            webhook_url: webhook.map(String::from),
            reconnect_delay_secs: 2,
            request_timeout: 10,
        }
    }

    #[test]
    fn from_config_requires_both_endpoints() {
        assert!(Supervisor::from_config(&config_with(None, None)).is_none());
        assert!(
            Supervisor::from_config(&config_with(Some("wss://feed.example.com"), None)).is_none()
        );
        assert!(
            Supervisor::from_config(&config_with(None, Some("https://hooks.example.com/x")))
                .is_none()
        );

        let supervisor = Supervisor::from_config(&config_with(
            Some("wss://feed.example.com"),
            Some("https://hooks.example.com/x"),
        ))
        .unwrap();
        assert_eq!(supervisor.restart_delay, Duration::from_secs(2));
    }
}
