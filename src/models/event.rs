//! Inbound and outbound event shapes for the relay pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event kinds eligible for forwarding downstream.
///
/// The allow-list is closed and static; anything else coming off the feed
/// is dropped during classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardableEvent {
    BookingCreated,
    BookingUpdated,
}

impl ForwardableEvent {
    /// Classify an event name against the allow-list.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "booking_created" => Some(Self::BookingCreated),
            "booking_updated" => Some(Self::BookingUpdated),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BookingCreated => "booking_created",
            Self::BookingUpdated => "booking_updated",
        }
    }
}

/// One frame as decoded from the upstream feed.
///
/// Optional fields default to `Null` when absent so the payload builder can
/// pass them through without special-casing. Frames that do not parse into
/// this shape at all (keepalives, noise) never become an `InboundEvent`.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEvent {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub booking_id: Value,
    #[serde(default)]
    pub customer_id: Value,
    #[serde(default)]
    pub subdomain: Value,
    #[serde(default)]
    pub team_ids: Value,
    #[serde(default)]
    pub next_recurring: Value,
    #[serde(default)]
    pub originator_id: Value,
}

/// The normalized record posted to the webhook sink.
///
/// `received_at` is stamped when the payload is built, never copied from
/// upstream. Absent optionals serialize as explicit `null`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundPayload {
    pub event: ForwardableEvent,
    pub booking_id: Value,
    pub customer_id: Value,
    pub subdomain: Value,
    pub team_ids: Value,
    pub next_recurring: Value,
    pub originator_id: Value,
    pub received_at: String,
}
