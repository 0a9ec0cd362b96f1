//! Hook system: handles, outcomes, and the orchestration modes.

pub mod definitions;
pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod service;

pub use definitions::{Hook, Hooks, OnCompleteResult};
pub use error::{HookFailure, ServiceError};
pub use outcome::{HookOutcome, ServiceHookReport, Verdict};
pub use service::{HookService, LocalService, ServiceBuilder};
