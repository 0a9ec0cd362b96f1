//! Severity tag carried by service errors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a service error affects the run it occurred in.
///
/// Set by whoever raises the error and inspected by the orchestrator.
/// Crosses the wire as a plain string so that a remote error keeps its
/// classification after deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Logged and tolerated; the run continues.
    #[default]
    Recoverable,
    /// Stops the run.
    Fatal,
}

impl Severity {
    /// Returns the string name of this severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Fatal => "fatal",
        }
    }

    /// Returns whether this severity stops the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_recoverable() {
        assert_eq!(Severity::default(), Severity::Recoverable);
        assert!(!Severity::default().is_fatal());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Severity::Fatal).unwrap(), "\"fatal\"");
        let parsed: Severity = serde_json::from_str("\"recoverable\"").unwrap();
        assert_eq!(parsed, Severity::Recoverable);
    }
}
