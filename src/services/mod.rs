// Relay services: forwarding pipeline, upstream session, supervision.

pub mod forwarder;
pub mod stream;
pub mod supervisor;

pub use forwarder::{EventForwarder, ForwardOutcome};
pub use stream::{SessionEnd, SessionSource, StreamConnection};
pub use supervisor::{Supervisor, RECONNECT_DELAY};
