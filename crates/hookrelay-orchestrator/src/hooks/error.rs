//! Errors raised by services and by aggregated hook runs.

use thiserror::Error;

use hookrelay_core::error::{AppError, ErrorKind};
use hookrelay_core::Severity;
use hookrelay_protocol::message::error::{SerializedError, SEVERE_ERROR_NAME};

/// Name given to aggregated hook failures when they cross the wire.
pub const HOOK_ERROR_NAME: &str = "HookError";

/// An error raised by a hook or command implementation.
///
/// The `severity` field is the only thing the orchestrator inspects to
/// decide whether the run must stop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {message}")]
pub struct ServiceError {
    /// Error kind or class name.
    pub name: String,
    /// Human-readable message.
    pub message: String,
    /// Stack trace or equivalent context.
    pub stack: Option<String>,
    /// Whether the error stops the run.
    pub severity: Severity,
}

impl ServiceError {
    /// Creates a recoverable error.
    pub fn new(message: impl Into<String>) -> Self {
        Self::named("Error", message, Severity::Recoverable)
    }

    /// Creates a severe error that stops the run.
    pub fn severe(message: impl Into<String>) -> Self {
        Self::named(SEVERE_ERROR_NAME, message, Severity::Fatal)
    }

    /// Creates an error with an explicit name and severity.
    pub fn named(name: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
            severity,
        }
    }

    /// Attaches a stack trace.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Returns whether this error stops the run.
    pub fn is_severe(&self) -> bool {
        self.severity.is_fatal()
    }

    /// Returns the stack when present, otherwise `name: message`.
    pub fn detail(&self) -> String {
        match &self.stack {
            Some(stack) => stack.clone(),
            None => self.to_string(),
        }
    }

    /// Converts a transport-level failure (channel closed, timeout, bad
    /// response) into a recoverable service error.
    pub fn from_transport(err: AppError) -> Self {
        let name = match err.kind {
            ErrorKind::ChannelClosed => "ChannelClosedError",
            ErrorKind::Timeout => "TimeoutError",
            _ => "ProtocolError",
        };
        Self::named(name, err.message, Severity::Recoverable)
    }

    /// Serializes this error for the wire.
    pub fn to_serialized(&self) -> SerializedError {
        SerializedError {
            name: self.name.clone(),
            message: self.message.clone(),
            stack: self.stack.clone(),
            severity: Some(self.severity),
        }
    }
}

impl From<SerializedError> for ServiceError {
    fn from(err: SerializedError) -> Self {
        let severity = err.severity();
        Self {
            name: err.name,
            message: err.message,
            stack: err.stack,
            severity,
        }
    }
}

/// A hook run stopped by one or more severe errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookFailure {
    /// Aggregated message of every contributing severe error.
    pub message: String,
    /// Hook name or label the failure is attributed to.
    pub origin: String,
}

impl HookFailure {
    /// Creates a hook failure.
    pub fn new(message: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            origin: origin.into(),
        }
    }
}

impl From<HookFailure> for AppError {
    fn from(failure: HookFailure) -> Self {
        AppError::hook(format!("[{}] {}", failure.origin, failure.message))
    }
}

impl From<HookFailure> for ServiceError {
    fn from(failure: HookFailure) -> Self {
        Self::named(HOOK_ERROR_NAME, failure.message, Severity::Fatal)
    }
}
