//! Structured error payload carried by response messages.

use std::fmt;

use serde::{Deserialize, Serialize};

use hookrelay_core::Severity;

/// Error class name that runners use to mark an error as severe.
pub const SEVERE_ERROR_NAME: &str = "SevereServiceError";

/// An error serialized as structured data so the receiving side can
/// rebuild it and classify it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedError {
    /// Error kind or class name. Senders may omit it.
    #[serde(default = "default_error_name")]
    pub name: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Stack trace or equivalent context, when the sender had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Explicit severity tag. Older senders omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

fn default_error_name() -> String {
    "Error".to_string()
}

impl SerializedError {
    /// Creates an error with an explicit severity.
    pub fn new(name: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
            severity: Some(severity),
        }
    }

    /// Attaches a stack trace.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Resolves the effective severity.
    ///
    /// An explicit tag wins; otherwise the severe class name is honoured.
    pub fn severity(&self) -> Severity {
        match self.severity {
            Some(severity) => severity,
            None if self.name == SEVERE_ERROR_NAME => Severity::Fatal,
            None => Severity::Recoverable,
        }
    }

    /// Returns whether this error stops the run.
    pub fn is_severe(&self) -> bool {
        self.severity().is_fatal()
    }
}

impl fmt::Display for SerializedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_error_object_decodes() {
        let err: SerializedError = serde_json::from_value(serde_json::json!({
            "message": "boom",
            "stack": "Error: boom"
        }))
        .unwrap();
        assert_eq!(err.name, "Error");
        assert_eq!(err.message, "boom");
        assert!(!err.is_severe());

        let err: SerializedError = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(err.name, "Error");
        assert!(err.message.is_empty());
    }

    #[test]
    fn test_explicit_tag_wins_over_name() {
        let err = SerializedError::new(SEVERE_ERROR_NAME, "boom", Severity::Recoverable);
        assert!(!err.is_severe());
    }

    #[test]
    fn test_severe_name_without_tag() {
        let err: SerializedError = serde_json::from_value(serde_json::json!({
            "name": "SevereServiceError",
            "message": "auth failed",
            "stack": "SevereServiceError: auth failed\n    at login"
        }))
        .unwrap();
        assert!(err.is_severe());
        assert_eq!(err.stack.as_deref(), Some("SevereServiceError: auth failed\n    at login"));
    }

    #[test]
    fn test_plain_error_is_recoverable() {
        let err: SerializedError =
            serde_json::from_value(serde_json::json!({"name": "Error", "message": "disk full"}))
                .unwrap();
        assert_eq!(err.severity(), Severity::Recoverable);
        assert_eq!(err.to_string(), "Error: disk full");
    }

    #[test]
    fn test_severity_survives_the_wire() {
        let err = SerializedError::new("AuthError", "auth failed", Severity::Fatal);
        let text = serde_json::to_string(&err).unwrap();
        assert!(text.contains("\"severity\":\"fatal\""));
        let back: SerializedError = serde_json::from_str(&text).unwrap();
        assert!(back.is_severe());
        assert_eq!(back.name, "AuthError");
    }
}
