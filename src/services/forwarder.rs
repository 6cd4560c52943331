//! Event forwarding pipeline.
//!
//! Turns one raw inbound frame into zero or one webhook delivery. Frames
//! are parsed and filtered against the allow-list, then the normalized
//! payload is POSTed to the sink.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, info};

use crate::error::RelayError;
use crate::models::{ForwardableEvent, InboundEvent, OutboundPayload};

/// Outcome of processing a single inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Payload accepted by the sink.
    Delivered,
    /// Frame did not qualify for forwarding; nothing was sent.
    Dropped,
    /// Delivery was attempted and failed; the frame is abandoned.
    Failed,
}

/// Forwards qualifying events to the webhook sink.
#[derive(Clone)]
pub struct EventForwarder {
    client: Client,
    webhook_url: String,
}

impl EventForwarder {
    pub fn new(webhook_url: String, request_timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            webhook_url,
        }
    }

    /// Filter and normalize one raw frame.
    ///
    /// Returns `None` when the frame is non-JSON, lacks a non-null `event`
    /// or `booking_id`, or names an event outside the allow-list. Pure up
    /// to the `received_at` stamp.
    pub fn normalize(frame: &str) -> Option<OutboundPayload> {
        let msg: InboundEvent = serde_json::from_str(frame).ok()?;

        let name = msg.event.as_deref()?;
        if msg.booking_id.is_null() {
            return None;
        }
        let event = ForwardableEvent::from_name(name)?;

        Some(OutboundPayload {
            event,
            booking_id: msg.booking_id,
            customer_id: msg.customer_id,
            subdomain: msg.subdomain,
            team_ids: msg.team_ids,
            next_recurring: msg.next_recurring,
            originator_id: msg.originator_id,
            received_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Process one raw frame end to end.
    ///
    /// Each qualifying frame gets exactly one delivery attempt; failures
    /// are logged and abandoned, never retried or queued.
    pub async fn handle_frame(&self, frame: &str) -> ForwardOutcome {
        let Some(payload) = Self::normalize(frame) else {
            debug!("Ignoring non-forwardable frame");
            return ForwardOutcome::Dropped;
        };

        match self.deliver(&payload).await {
            Ok(()) => {
                info!(
                    "➡️ Forwarded {}: booking {}",
                    payload.event.as_str(),
                    payload.booking_id
                );
                metrics::counter!("frames_forwarded").increment(1);
                ForwardOutcome::Delivered
            }
            Err(e) => {
                error!("❌ {}", e);
                metrics::counter!("delivery_failures").increment(1);
                ForwardOutcome::Failed
            }
        }
    }

    /// POST the JSON-encoded payload to the sink.
    async fn deliver(&self, payload: &OutboundPayload) -> Result<(), RelayError> {
        let res = self
            .client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(());
        }

        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        Err(RelayError::SinkRejected { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_drops_non_json_frames() {
        assert!(EventForwarder::normalize("ping").is_none());
        assert!(EventForwarder::normalize("").is_none());
        assert!(EventForwarder::normalize("[1,2,3]").is_none());
    }

    #[test]
    fn normalize_requires_event_and_booking_id() {
        assert!(EventForwarder::normalize(r#"{"booking_id":1}"#).is_none());
        assert!(EventForwarder::normalize(r#"{"event":"booking_created"}"#).is_none());
        assert!(
            EventForwarder::normalize(r#"{"event":null,"booking_id":1}"#).is_none()
        );
        assert!(
            EventForwarder::normalize(r#"{"event":"booking_created","booking_id":null}"#)
                .is_none()
        );
    }

    #[test]
    fn normalize_rejects_events_outside_allow_list() {
        assert!(
            EventForwarder::normalize(r#"{"event":"booking_deleted","booking_id":64855}"#)
                .is_none()
        );
    }

    #[test]
    fn normalize_builds_payload_with_null_defaults() {
        let payload = EventForwarder::normalize(
            r#"{"event":"booking_created","booking_id":64855,"customer_id":7}"#,
        )
        .unwrap();

        assert_eq!(payload.event, ForwardableEvent::BookingCreated);
        assert_eq!(payload.booking_id, json!(64855));
        assert_eq!(payload.customer_id, json!(7));
        assert!(payload.subdomain.is_null());
        assert!(payload.team_ids.is_null());
        assert!(payload.next_recurring.is_null());
        assert!(payload.originator_id.is_null());
        assert!(!payload.received_at.is_empty());
    }

    #[test]
    fn normalize_stamps_received_at_fresh() {
        // An upstream received_at is never copied into the payload.
        let payload = EventForwarder::normalize(
            r#"{"event":"booking_updated","booking_id":"B-1","received_at":"1970-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_ne!(payload.received_at, "1970-01-01T00:00:00Z");
    }

    #[test]
    fn normalize_accepts_string_booking_ids() {
        let payload = EventForwarder::normalize(
            r#"{"event":"booking_updated","booking_id":"B-77","team_ids":[3,4]}"#,
        )
        .unwrap();
        assert_eq!(payload.booking_id, json!("B-77"));
        assert_eq!(payload.team_ids, json!([3, 4]));
    }

    #[test]
    fn payload_serializes_with_explicit_nulls() {
        let payload = EventForwarder::normalize(
            r#"{"event":"booking_created","booking_id":64855,"customer_id":7}"#,
        )
        .unwrap();

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["event"], json!("booking_created"));
        assert_eq!(value["booking_id"], json!(64855));
        assert_eq!(value["customer_id"], json!(7));
        assert_eq!(value["subdomain"], serde_json::Value::Null);
        assert_eq!(value["team_ids"], serde_json::Value::Null);
        assert_eq!(value["next_recurring"], serde_json::Value::Null);
        assert_eq!(value["originator_id"], serde_json::Value::Null);
        assert!(value["received_at"].is_string());
    }
}
