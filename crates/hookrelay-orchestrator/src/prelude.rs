//! Prelude for service authors.

pub use hookrelay_core::Severity;

pub use crate::hooks::definitions::{Hook, Hooks, OnCompleteResult};
pub use crate::hooks::error::{HookFailure, ServiceError};
pub use crate::hooks::service::{HookService, LocalService};
pub use crate::remote::service::RemoteService;
