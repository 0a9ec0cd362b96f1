//! # hookrelay-orchestrator
//!
//! Runs lifecycle hooks across pluggable services. Provides:
//!
//! - Service handles exposing optional, name-addressed hooks
//! - Gather-all fan-out with fatal/recoverable failure classification
//! - Service, launcher and on-complete invocation modes
//! - A remote channel that turns hook and command invocations into
//!   correlated wire messages for a browser-hosted participant
//! - Browser console relay

pub mod hooks;
pub mod prelude;
pub mod remote;

pub use hooks::definitions::{Hook, Hooks, OnCompleteResult};
pub use hooks::error::{HookFailure, ServiceError};
pub use hooks::orchestrator::{
    run_launcher_hook, run_on_complete_hook, run_service_hook, run_service_hook_report,
};
pub use hooks::outcome::{HookOutcome, ServiceHookReport, Verdict};
pub use hooks::service::{HookService, LocalService, ServiceBuilder};
pub use remote::channel::RemoteChannel;
pub use remote::console::ConsoleRelay;
pub use remote::service::RemoteService;
pub use remote::transport::MessageSink;
