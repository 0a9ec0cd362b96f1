//! Browser console relay.

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use hookrelay_protocol::message::types::{ConsoleEvent, ConsoleLevel};

/// Re-emits browser console output through `tracing` and to subscribers.
#[derive(Debug)]
pub struct ConsoleRelay {
    tx: broadcast::Sender<ConsoleEvent>,
}

impl ConsoleRelay {
    /// Creates a relay buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribes to relayed events.
    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.tx.subscribe()
    }

    /// Logs one event at its console level and forwards it to subscribers.
    pub fn relay(&self, event: ConsoleEvent) {
        let line = render_args(&event.args);
        match event.level {
            ConsoleLevel::Error => error!(target: "hookrelay::browser", cid = %event.cid, "{line}"),
            ConsoleLevel::Warn => warn!(target: "hookrelay::browser", cid = %event.cid, "{line}"),
            ConsoleLevel::Info | ConsoleLevel::Log => {
                info!(target: "hookrelay::browser", cid = %event.cid, "{line}")
            }
            ConsoleLevel::Debug => debug!(target: "hookrelay::browser", cid = %event.cid, "{line}"),
        }

        // No subscribers is not an error.
        let _ = self.tx.send(event);
    }
}

/// Joins console arguments the way a console prints them.
fn render_args(args: &[Value]) -> String {
    args.iter()
        .map(|arg| match arg {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
