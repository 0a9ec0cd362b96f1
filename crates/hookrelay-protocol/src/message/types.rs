//! Wire message type definitions.
//!
//! Every frame is an adjacently tagged object:
//! `{"type": "hookTriggerMessage", "value": {...}}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::SerializedError;

/// Event name the browser attaches to every console payload.
pub const CONSOLE_EVENT_NAME: &str = "consoleEvent";

/// Which way a message travels relative to the runner process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Sent by the remote participant to the runner.
    Inbound,
    /// Sent by the runner to the remote participant.
    Outbound,
}

/// The closed set of messages exchanged over a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum SocketMessage {
    /// Browser console output, fire-and-forget.
    ConsoleMessage(ConsoleEvent),
    /// Ask the remote side to run a command.
    CommandRequestMessage(CommandRequest),
    /// Answer to a command request.
    CommandResponseMessage(CommandResponse),
    /// Ask the remote side to run a hook.
    HookTriggerMessage(HookTrigger),
    /// Answer to a hook trigger.
    HookResultMessage(HookResultEvent),
}

impl SocketMessage {
    /// Returns the wire discriminant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConsoleMessage(_) => "consoleMessage",
            Self::CommandRequestMessage(_) => "commandRequestMessage",
            Self::CommandResponseMessage(_) => "commandResponseMessage",
            Self::HookTriggerMessage(_) => "hookTriggerMessage",
            Self::HookResultMessage(_) => "hookResultMessage",
        }
    }

    /// Returns which way this message travels.
    pub fn direction(&self) -> Direction {
        match self {
            Self::CommandRequestMessage(_) | Self::HookTriggerMessage(_) => Direction::Outbound,
            Self::ConsoleMessage(_)
            | Self::CommandResponseMessage(_)
            | Self::HookResultMessage(_) => Direction::Inbound,
        }
    }

    /// Returns the correlation id, if this message carries one.
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Self::ConsoleMessage(_) => None,
            Self::CommandRequestMessage(m) => Some(&m.id),
            Self::CommandResponseMessage(m) => Some(&m.id),
            Self::HookTriggerMessage(m) => Some(&m.id),
            Self::HookResultMessage(m) => Some(&m.id),
        }
    }

    /// Build a console event.
    pub fn console(level: ConsoleLevel, args: Vec<Value>, cid: &str) -> Self {
        Self::ConsoleMessage(ConsoleEvent::new(level, args, cid))
    }

    /// Build a command request.
    pub fn command_request(id: &str, cid: &str, command_name: &str, args: Vec<Value>) -> Self {
        Self::CommandRequestMessage(CommandRequest {
            id: id.to_string(),
            cid: cid.to_string(),
            command_name: command_name.to_string(),
            args,
        })
    }

    /// Build a successful command response.
    pub fn command_response_ok(id: &str, result: Option<Value>) -> Self {
        Self::CommandResponseMessage(CommandResponse {
            id: id.to_string(),
            result,
            error: None,
        })
    }

    /// Build a failed command response.
    pub fn command_response_err(id: &str, error: SerializedError) -> Self {
        Self::CommandResponseMessage(CommandResponse {
            id: id.to_string(),
            result: None,
            error: Some(error),
        })
    }

    /// Build a hook trigger.
    pub fn hook_trigger(id: &str, cid: &str, name: &str, args: Vec<Value>) -> Self {
        Self::HookTriggerMessage(HookTrigger {
            id: id.to_string(),
            cid: cid.to_string(),
            name: name.to_string(),
            args,
        })
    }

    /// Build a hook result. `None` means the hook succeeded.
    pub fn hook_result(id: &str, error: Option<SerializedError>) -> Self {
        Self::HookResultMessage(HookResultEvent {
            id: id.to_string(),
            error,
        })
    }
}

impl fmt::Display for SocketMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.correlation_id() {
            Some(id) => write!(f, "{}#{}", self.kind(), id),
            None => write!(f, "{}", self.kind()),
        }
    }
}

/// Browser console method that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    /// `console.log`
    Log,
    /// `console.info`
    Info,
    /// `console.warn`
    Warn,
    /// `console.debug`
    Debug,
    /// `console.error`
    Error,
}

impl ConsoleLevel {
    /// Returns the console method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Debug => "debug",
            Self::Error => "error",
        }
    }
}

/// Console output relayed from the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleEvent {
    /// Event name, always [`CONSOLE_EVENT_NAME`].
    #[serde(default = "console_event_name")]
    pub name: String,
    /// Console method.
    #[serde(rename = "type")]
    pub level: ConsoleLevel,
    /// Arguments passed to the console method, in call order.
    pub args: Vec<Value>,
    /// Session the output belongs to.
    pub cid: String,
}

impl ConsoleEvent {
    /// Creates a console event for session `cid`.
    pub fn new(level: ConsoleLevel, args: Vec<Value>, cid: &str) -> Self {
        Self {
            name: console_event_name(),
            level,
            args,
            cid: cid.to_string(),
        }
    }
}

fn console_event_name() -> String {
    CONSOLE_EVENT_NAME.to_string()
}

/// Request to execute a command in the remote environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    /// Correlation id.
    pub id: String,
    /// Session the command runs in.
    pub cid: String,
    /// Command to execute.
    pub command_name: String,
    /// Positional arguments, in call order.
    pub args: Vec<Value>,
}

/// Response to a [`CommandRequest`]. Carries a result or an error, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Correlation id of the request.
    pub id: String,
    /// Command return value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error raised by the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SerializedError>,
}

/// Request to run a named hook in the remote environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookTrigger {
    /// Correlation id.
    pub id: String,
    /// Session the hook runs in.
    pub cid: String,
    /// Hook name.
    pub name: String,
    /// Positional arguments, in call order.
    pub args: Vec<Value>,
}

/// Result of a [`HookTrigger`]. No error means success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookResultEvent {
    /// Correlation id of the trigger.
    pub id: String,
    /// Error raised by the hook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SerializedError>,
}
