//! Request id generation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic per-channel request id source.
#[derive(Debug, Default)]
pub struct RequestIdGenerator {
    next: AtomicU64,
}

impl RequestIdGenerator {
    /// Creates a generator starting at `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator whose first id is `start`.
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Returns the next unused id.
    pub fn next_id(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}
