use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the relay path.
///
/// None of these are fatal: connect errors feed the supervisor's restart
/// policy and delivery errors are terminal only for the frame at hand.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("pubsub connect failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("webhook rejected delivery with status {status}: {body}")]
    SinkRejected { status: StatusCode, body: String },

    #[error("webhook request failed: {0}")]
    SinkTransport(#[from] reqwest::Error),
}
