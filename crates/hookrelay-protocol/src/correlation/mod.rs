//! Request/response correlation.

pub mod id;
pub mod registry;

pub use id::RequestIdGenerator;
pub use registry::{CorrelationRegistry, PendingResponse};
