//! Relay metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Channel-level metrics counters.
#[derive(Debug, Default)]
pub struct RelayMetrics {
    /// Total messages sent
    pub messages_sent: AtomicU64,
    /// Total messages received
    pub messages_received: AtomicU64,
    /// Total frames or messages dropped as protocol violations
    pub protocol_errors: AtomicU64,
    /// Total correlated requests registered
    pub requests_registered: AtomicU64,
    /// Total requests answered with a success response
    pub requests_resolved: AtomicU64,
    /// Total requests answered with an error response
    pub requests_rejected: AtomicU64,
    /// Total requests cancelled by channel closure
    pub requests_cancelled: AtomicU64,
    /// Total requests that hit their deadline
    pub requests_timed_out: AtomicU64,
}

impl RelayMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outbound message
    pub fn record_sent(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an inbound message
    pub fn record_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a protocol violation
    pub fn record_protocol_error(&self) {
        self.protocol_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request registration
    pub fn record_registered(&self) {
        self.requests_registered.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a response; `ok` is false when the response carried an error
    pub fn record_response(&self, ok: bool) {
        if ok {
            self.requests_resolved.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record cancelled requests
    pub fn record_cancelled(&self, count: usize) {
        self.requests_cancelled
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record a request deadline expiry
    pub fn record_timeout(&self) {
        self.requests_timed_out.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            protocol_errors: self.protocol_errors.load(Ordering::Relaxed),
            requests_registered: self.requests_registered.load(Ordering::Relaxed),
            requests_resolved: self.requests_resolved.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            requests_cancelled: self.requests_cancelled.load(Ordering::Relaxed),
            requests_timed_out: self.requests_timed_out.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total messages sent
    pub messages_sent: u64,
    /// Total messages received
    pub messages_received: u64,
    /// Total protocol violations
    pub protocol_errors: u64,
    /// Total correlated requests registered
    pub requests_registered: u64,
    /// Total success responses
    pub requests_resolved: u64,
    /// Total error responses
    pub requests_rejected: u64,
    /// Total requests cancelled by channel closure
    pub requests_cancelled: u64,
    /// Total request deadline expiries
    pub requests_timed_out: u64,
}
