//! Per-handle outcomes and the aggregated verdict of a hook run.

use std::time::Duration;

use super::error::HookFailure;

/// Result of invoking one hook on one handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// The hook succeeded or the handle does not implement it.
    Success,
    /// The hook failed with an ordinary error; the run continues.
    RecoverableFailure {
        /// Formatted failure message.
        message: String,
        /// Handle the failure came from.
        origin: String,
    },
    /// The hook failed with a severe error; the run stops.
    FatalFailure {
        /// Formatted failure message.
        message: String,
        /// Handle the failure came from.
        origin: String,
    },
}

impl HookOutcome {
    /// Returns whether this outcome stops the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalFailure { .. })
    }

    /// Returns whether this outcome is a tolerated failure.
    pub fn is_recoverable_failure(&self) -> bool {
        matches!(self, Self::RecoverableFailure { .. })
    }
}

/// Aggregate of every outcome of one hook run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No fatal outcome occurred.
    Ok,
    /// At least one fatal outcome occurred.
    Stopped {
        /// Every fatal message, in handle order.
        reason: String,
    },
}

impl Verdict {
    /// Reduces outcomes to a verdict. Recoverable failures never count.
    pub fn from_outcomes(outcomes: &[HookOutcome]) -> Self {
        let fatal: Vec<&str> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                HookOutcome::FatalFailure { message, .. } => Some(message.as_str()),
                _ => None,
            })
            .collect();

        if fatal.is_empty() {
            return Self::Ok;
        }

        Self::Stopped {
            reason: format!("\n{}\n\nStopping runner...", fatal.join(",")),
        }
    }

    /// Returns whether the run may continue.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Converts into a result attributed to `origin`.
    pub fn into_result(self, origin: &str) -> Result<(), HookFailure> {
        match self {
            Self::Ok => Ok(()),
            Self::Stopped { reason } => Err(HookFailure::new(reason, origin)),
        }
    }
}

/// Everything observed while running one hook across all service handles.
#[derive(Debug, Clone)]
pub struct ServiceHookReport {
    /// Hook name.
    pub hook: String,
    /// One outcome per handle, in handle order.
    pub outcomes: Vec<HookOutcome>,
    /// Aggregated verdict.
    pub verdict: Verdict,
    /// Wall time from first invocation to last settlement.
    pub elapsed: Duration,
}

impl ServiceHookReport {
    /// Number of tolerated failures.
    pub fn recoverable_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.is_recoverable_failure())
            .count()
    }

    /// Number of fatal failures.
    pub fn fatal_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_fatal()).count()
    }

    /// Converts into the caller-facing result, attributed to the hook name.
    pub fn into_result(self) -> Result<(), HookFailure> {
        self.verdict.into_result(&self.hook)
    }
}
