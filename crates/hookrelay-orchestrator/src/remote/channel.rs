//! Channel to a browser-hosted participant.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use hookrelay_core::config::RelayConfig;
use hookrelay_core::error::AppError;
use hookrelay_protocol::correlation::id::RequestIdGenerator;
use hookrelay_protocol::correlation::registry::CorrelationRegistry;
use hookrelay_protocol::message::serializer::{decode, peek_response_id};
use hookrelay_protocol::message::types::{CommandResponse, HookResultEvent, SocketMessage};
use hookrelay_protocol::metrics::RelayMetrics;

use crate::hooks::error::ServiceError;

use super::console::ConsoleRelay;
use super::transport::MessageSink;

/// One transport connection to a remote participant.
///
/// Hook and command invocations become correlated request messages; the
/// matching responses arrive through [`handle_inbound`](Self::handle_inbound)
/// in any order. Several sessions (`cid`s) can share one channel.
#[derive(Debug)]
pub struct RemoteChannel {
    /// Outbound transport.
    sink: Arc<dyn MessageSink>,
    /// Pending hook triggers.
    hooks: CorrelationRegistry<HookResultEvent>,
    /// Pending command requests.
    commands: CorrelationRegistry<CommandResponse>,
    /// Request id source.
    ids: RequestIdGenerator,
    /// Console output relay.
    console: ConsoleRelay,
    /// Counters.
    metrics: Arc<RelayMetrics>,
    /// Configuration.
    config: RelayConfig,
    /// Set once the channel is closed.
    closed: AtomicBool,
}

impl RemoteChannel {
    /// Creates a channel sending through `sink`.
    pub fn new(config: RelayConfig, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            sink,
            hooks: CorrelationRegistry::new("hooks"),
            commands: CorrelationRegistry::new("commands"),
            ids: RequestIdGenerator::new(),
            console: ConsoleRelay::new(config.console_buffer_size),
            metrics: Arc::new(RelayMetrics::new()),
            config,
            closed: AtomicBool::new(false),
        }
    }

    /// Creates a channel backed by an in-process queue.
    ///
    /// Returns the channel and the receiving end of its outbound queue.
    pub fn with_queue(config: RelayConfig) -> (Self, mpsc::Receiver<SocketMessage>) {
        let (tx, rx) = mpsc::channel(config.outbound_buffer_size.max(1));
        (Self::new(config, Arc::new(tx)), rx)
    }

    /// Starts request ids at `start` instead of `0`.
    pub fn with_id_start(mut self, start: u64) -> Self {
        self.ids = RequestIdGenerator::starting_at(start);
        self
    }

    /// Runs a hook in the remote session `cid` and waits for its result.
    ///
    /// A remote error keeps the severity it was serialized with. Transport
    /// loss and deadline expiry are recoverable.
    pub async fn trigger_hook(
        &self,
        cid: &str,
        name: &str,
        args: Vec<Value>,
    ) -> Result<(), ServiceError> {
        let id = self.ids.next_id();
        let msg = SocketMessage::hook_trigger(&id, cid, name, args);

        let response = self
            .request(&self.hooks, &id, msg)
            .await
            .map_err(ServiceError::from_transport)?;

        match response.error {
            Some(err) => Err(ServiceError::from(err)),
            None => Ok(()),
        }
    }

    /// Executes a command in the remote session `cid` and returns its value.
    pub async fn execute_command(
        &self,
        cid: &str,
        command_name: &str,
        args: Vec<Value>,
    ) -> Result<Value, ServiceError> {
        let id = self.ids.next_id();
        let msg = SocketMessage::command_request(&id, cid, command_name, args);

        let response = self
            .request(&self.commands, &id, msg)
            .await
            .map_err(ServiceError::from_transport)?;

        match response.error {
            Some(err) => Err(ServiceError::from(err)),
            None => Ok(response.result.unwrap_or(Value::Null)),
        }
    }

    /// Routes one inbound message.
    ///
    /// Responses for unknown ids and messages that only travel outbound are
    /// logged and dropped.
    pub fn handle_inbound(&self, msg: SocketMessage) {
        self.metrics.record_received();

        match msg {
            SocketMessage::ConsoleMessage(event) => self.console.relay(event),
            SocketMessage::CommandResponseMessage(response) => {
                let id = response.id.clone();
                let ok = response.error.is_none();
                self.settle(&self.commands, &id, response, ok);
            }
            SocketMessage::HookResultMessage(result) => {
                let id = result.id.clone();
                let ok = result.error.is_none();
                self.settle(&self.hooks, &id, result, ok);
            }
            other => {
                self.metrics.record_protocol_error();
                warn!(msg = %other, "Received outbound-only message from remote, ignoring");
            }
        }
    }

    /// Decodes and routes one inbound text frame.
    pub fn handle_frame(&self, frame: &str) -> Result<(), AppError> {
        match decode(frame, self.config.max_message_size) {
            Ok(msg) => {
                self.handle_inbound(msg);
                Ok(())
            }
            Err(e) => {
                self.metrics.record_protocol_error();
                warn!(error = %e, "Dropping undecodable frame");
                if let Some((kind, id)) = peek_response_id(frame) {
                    self.reject_undecodable(&kind, &id, &e);
                }
                Err(e)
            }
        }
    }

    /// Consumes inbound messages until the sender side ends, then closes the channel.
    pub async fn run(self: Arc<Self>, mut inbound: mpsc::Receiver<SocketMessage>) {
        while let Some(msg) = inbound.recv().await {
            self.handle_inbound(msg);
        }
        self.close("Remote channel closed");
    }

    /// Consumes inbound text frames until the sender side ends, then closes the channel.
    pub async fn run_frames(self: Arc<Self>, mut inbound: mpsc::Receiver<String>) {
        while let Some(frame) = inbound.recv().await {
            // Already logged and counted.
            let _ = self.handle_frame(&frame);
        }
        self.close("Remote channel closed");
    }

    /// Closes the channel and rejects every pending request.
    ///
    /// Idempotent. Returns the number of requests cancelled by this call.
    pub fn close(&self, reason: &str) -> usize {
        let first = !self.closed.swap(true, Ordering::SeqCst);

        let cancelled = self.hooks.cancel_all(reason) + self.commands.cancel_all(reason);
        self.metrics.record_cancelled(cancelled);

        if first {
            info!(reason = %reason, cancelled = cancelled, "Remote channel closed");
        }

        cancelled
    }

    /// Returns whether the channel is closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Returns whether a request with this id is awaiting its response.
    pub fn is_pending(&self, id: &str) -> bool {
        self.hooks.contains(id) || self.commands.contains(id)
    }

    /// Returns the number of requests awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.hooks.len() + self.commands.len()
    }

    /// Returns the console relay.
    pub fn console(&self) -> &ConsoleRelay {
        &self.console
    }

    /// Returns the channel metrics.
    pub fn metrics(&self) -> &Arc<RelayMetrics> {
        &self.metrics
    }

    async fn request<T>(
        &self,
        registry: &CorrelationRegistry<T>,
        id: &str,
        msg: SocketMessage,
    ) -> Result<T, AppError> {
        if self.is_closed() {
            return Err(AppError::channel_closed("Remote channel is closed"));
        }

        let pending = registry.register(id)?;
        self.metrics.record_registered();
        let mut entry = PendingEntry::new(registry, id);

        // A close racing with the registration above must not strand the entry.
        if self.is_closed() {
            return Err(AppError::channel_closed("Remote channel is closed"));
        }

        debug!(msg = %msg, "Sending request");
        if let Err(e) = self.sink.send(msg).await {
            drop(entry);
            self.close(&e.message);
            return Err(e);
        }
        self.metrics.record_sent();

        let Some(deadline) = self.config.request_timeout() else {
            let result = pending.wait().await;
            entry.settled();
            return result;
        };

        match tokio::time::timeout(deadline, pending.wait()).await {
            Ok(result) => {
                entry.settled();
                result
            }
            Err(_) => {
                drop(entry);
                self.metrics.record_timeout();
                warn!(
                    id = %id,
                    timeout_ms = deadline.as_millis() as u64,
                    "Request timed out"
                );
                Err(AppError::timeout(format!(
                    "No response for request '{id}' within {}ms",
                    deadline.as_millis()
                )))
            }
        }
    }

    fn reject_undecodable(&self, kind: &str, id: &str, cause: &AppError) {
        let error = || AppError::protocol(format!("Undecodable response: {}", cause.message));
        let rejected = match kind {
            "hookResultMessage" => self.hooks.reject(id, error()),
            "commandResponseMessage" => self.commands.reject(id, error()),
            _ => false,
        };
        if rejected {
            self.metrics.record_response(false);
        }
    }

    fn settle<T>(&self, registry: &CorrelationRegistry<T>, id: &str, value: T, ok: bool) {
        if registry.resolve(id, value) {
            self.metrics.record_response(ok);
        } else {
            self.metrics.record_protocol_error();
        }
    }
}

/// Removes a registered request from its registry when dropped, unless the
/// request was settled. Covers callers that stop awaiting mid-request.
struct PendingEntry<'a, T> {
    registry: &'a CorrelationRegistry<T>,
    id: &'a str,
    armed: bool,
}

impl<'a, T> PendingEntry<'a, T> {
    fn new(registry: &'a CorrelationRegistry<T>, id: &'a str) -> Self {
        Self {
            registry,
            id,
            armed: true,
        }
    }

    fn settled(&mut self) {
        self.armed = false;
    }
}

impl<T> Drop for PendingEntry<'_, T> {
    fn drop(&mut self) {
        if self.armed && self.registry.discard(self.id) {
            debug!(id = %self.id, "Discarded abandoned request");
        }
    }
}
