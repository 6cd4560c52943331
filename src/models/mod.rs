// Data models for the relay pipeline.

pub mod event;

pub use event::{ForwardableEvent, InboundEvent, OutboundPayload};
