//! # hookrelay-protocol
//!
//! Message protocol between a test-runner process and a browser-hosted
//! test environment. Provides:
//!
//! - The closed set of wire messages (console events, command
//!   request/response, hook trigger/result)
//! - Structured error serialization that keeps the severity tag
//! - JSON codec with frame and message validation
//! - A correlation registry pairing every request id with exactly one response
//! - Relay metrics counters

pub mod correlation;
pub mod message;
pub mod metrics;

pub use correlation::id::RequestIdGenerator;
pub use correlation::registry::{CorrelationRegistry, PendingResponse};
pub use message::error::SerializedError;
pub use message::types::{
    CommandRequest, CommandResponse, ConsoleEvent, ConsoleLevel, Direction, HookResultEvent,
    HookTrigger, SocketMessage,
};
pub use metrics::{MetricsSnapshot, RelayMetrics};
