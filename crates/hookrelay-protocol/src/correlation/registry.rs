//! Correlation registry: pairs each outstanding request id with exactly one response.

use std::fmt;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use hookrelay_core::error::AppError;

/// A request waiting for its response.
#[derive(Debug)]
struct PendingRequest<T> {
    /// When the request was registered.
    created_at: DateTime<Utc>,
    /// Completes the caller's [`PendingResponse`].
    responder: oneshot::Sender<Result<T, AppError>>,
}

/// Awaitable handle returned by [`CorrelationRegistry::register`].
#[derive(Debug)]
pub struct PendingResponse<T> {
    /// Correlation id.
    id: String,
    /// Receives the resolution or rejection.
    rx: oneshot::Receiver<Result<T, AppError>>,
}

impl<T> PendingResponse<T> {
    /// Returns the correlation id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Suspends until the request is resolved or rejected.
    pub async fn wait(self) -> Result<T, AppError> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(AppError::channel_closed(format!(
                "Request '{}' was dropped without a response",
                self.id
            ))),
        }
    }
}

/// Registry of requests awaiting a correlated response.
///
/// Every entry is removed exactly once: by [`resolve`](Self::resolve),
/// [`reject`](Self::reject), [`discard`](Self::discard) or
/// [`cancel_all`](Self::cancel_all). Map mutations are atomic, so the
/// registry can be shared between tasks.
pub struct CorrelationRegistry<T> {
    /// Label used in log lines.
    label: &'static str,
    /// Request id → pending request.
    pending: DashMap<String, PendingRequest<T>>,
}

impl<T> CorrelationRegistry<T> {
    /// Creates an empty registry.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            pending: DashMap::new(),
        }
    }

    /// Registers a request id and returns the handle its caller awaits.
    ///
    /// A duplicate id is a programming error in the id generator and is
    /// never retried.
    pub fn register(&self, id: impl Into<String>) -> Result<PendingResponse<T>, AppError> {
        let id = id.into();
        match self.pending.entry(id.clone()) {
            Entry::Occupied(_) => Err(AppError::duplicate_id(&id)),
            Entry::Vacant(slot) => {
                let (responder, rx) = oneshot::channel();
                slot.insert(PendingRequest {
                    created_at: Utc::now(),
                    responder,
                });
                debug!(registry = self.label, id = %id, "Request registered");
                Ok(PendingResponse { id, rx })
            }
        }
    }

    /// Completes a pending request with a value.
    ///
    /// Returns `false` (and logs) when the id is unknown or already settled.
    pub fn resolve(&self, id: &str, value: T) -> bool {
        self.settle(id, Ok(value))
    }

    /// Completes a pending request with an error.
    ///
    /// Returns `false` (and logs) when the id is unknown or already settled.
    pub fn reject(&self, id: &str, error: AppError) -> bool {
        self.settle(id, Err(error))
    }

    /// Removes a pending request without answering it.
    pub fn discard(&self, id: &str) -> bool {
        self.pending.remove(id).is_some()
    }

    /// Rejects every pending request with a channel-closed error.
    ///
    /// Idempotent: a second call finds nothing to cancel. Returns the number
    /// of requests cancelled.
    pub fn cancel_all(&self, reason: &str) -> usize {
        let ids: Vec<String> = self.pending.iter().map(|entry| entry.key().clone()).collect();

        let mut cancelled = 0;
        for id in ids {
            if let Some((_, request)) = self.pending.remove(&id) {
                let _ = request
                    .responder
                    .send(Err(AppError::channel_closed(reason.to_string())));
                cancelled += 1;
            }
        }

        if cancelled > 0 {
            info!(
                registry = self.label,
                cancelled = cancelled,
                reason = %reason,
                "Cancelled pending requests"
            );
        }

        cancelled
    }

    /// Returns whether a request with this id is pending.
    pub fn contains(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    /// Returns the number of pending requests.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns whether no request is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn settle(&self, id: &str, outcome: Result<T, AppError>) -> bool {
        match self.pending.remove(id) {
            Some((_, request)) => {
                let waited_ms = (Utc::now() - request.created_at).num_milliseconds();
                debug!(
                    registry = self.label,
                    id = %id,
                    waited_ms = waited_ms,
                    ok = outcome.is_ok(),
                    "Request settled"
                );
                // The caller may have stopped waiting; the entry is gone either way.
                let _ = request.responder.send(outcome);
                true
            }
            None => {
                warn!(
                    registry = self.label,
                    id = %id,
                    "Response for unknown or already settled request, ignoring"
                );
                false
            }
        }
    }
}

impl<T> fmt::Debug for CorrelationRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorrelationRegistry")
            .field("label", &self.label)
            .field("pending", &self.pending.len())
            .finish()
    }
}
