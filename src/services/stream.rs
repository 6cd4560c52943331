//! Upstream PubSub session handling.
//!
//! One `StreamConnection` owns one subscription session from connect to
//! termination, handing each frame to the forwarder in arrival order.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{error, info, warn};

use crate::error::RelayError;
use crate::services::forwarder::{EventForwarder, ForwardOutcome};

/// How a session came to an end.
///
/// Clean closes and failures feed the same restart policy; the distinction
/// exists only for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Upstream sent a close frame or the stream drained.
    Closed,
    /// Connect or transport error.
    Failed,
}

/// Seam between the supervisor and the concrete upstream connection.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Run one full session to termination.
    async fn run_session(&self) -> SessionEnd;
}

/// One subscription session against the upstream feed.
pub struct StreamConnection {
    endpoint: String,
    forwarder: EventForwarder,
}

impl StreamConnection {
    pub fn new(endpoint: String, forwarder: EventForwarder) -> Self {
        Self {
            endpoint,
            forwarder,
        }
    }

    /// Connect and pump frames until the session terminates.
    pub async fn run(&self) -> SessionEnd {
        let ws_stream = match self.connect().await {
            Ok(stream) => stream,
            Err(e) => {
                error!("❌ {}", e);
                return SessionEnd::Failed;
            }
        };

        info!("✅ Connected to PubSub feed");
        metrics::counter!("pubsub_sessions_opened").increment(1);

        let (mut write, mut read) = ws_stream.split();

        // Per-session statistics
        let mut frames_received: u64 = 0;
        let mut frames_forwarded: u64 = 0;
        let mut frames_dropped: u64 = 0;
        let mut deliveries_failed: u64 = 0;

        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    frames_received += 1;
                    match self.forwarder.handle_frame(text.as_str()).await {
                        ForwardOutcome::Delivered => frames_forwarded += 1,
                        ForwardOutcome::Dropped => frames_dropped += 1,
                        ForwardOutcome::Failed => deliveries_failed += 1,
                    }

                    if frames_received % 100 == 0 {
                        info!(
                            "📊 Relay stats: received={}, forwarded={}, dropped={}, failed={}",
                            frames_received, frames_forwarded, frames_dropped, deliveries_failed
                        );
                    }
                }
                Ok(Message::Binary(data)) => {
                    // Some feeds deliver JSON as binary frames; anything
                    // that is not UTF-8 is transport noise.
                    if let Ok(text) = std::str::from_utf8(&data) {
                        frames_received += 1;
                        match self.forwarder.handle_frame(text).await {
                            ForwardOutcome::Delivered => frames_forwarded += 1,
                            ForwardOutcome::Dropped => frames_dropped += 1,
                            ForwardOutcome::Failed => deliveries_failed += 1,
                        }
                    }
                }
                Ok(Message::Ping(data)) => {
                    if let Err(e) = write.send(Message::Pong(data)).await {
                        warn!("Failed to send pong: {}", e);
                    }
                }
                Ok(Message::Close(_)) => {
                    info!("PubSub session closed by upstream");
                    return SessionEnd::Closed;
                }
                Ok(_) => {} // Pong/raw frames
                Err(e) => {
                    error!("❌ PubSub stream error: {}", e);
                    return SessionEnd::Failed;
                }
            }
        }

        info!("PubSub stream ended");
        SessionEnd::Closed
    }

    async fn connect(
        &self,
    ) -> Result<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
        RelayError,
    > {
        let (ws_stream, _) = connect_async(self.endpoint.as_str()).await?;
        Ok(ws_stream)
    }
}

#[async_trait]
impl SessionSource for StreamConnection {
    async fn run_session(&self) -> SessionEnd {
        self.run().await
    }
}
