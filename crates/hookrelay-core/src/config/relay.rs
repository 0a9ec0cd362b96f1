//! Remote channel configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for a channel to a remote (browser-hosted) participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Deadline for a correlated request in milliseconds.
    ///
    /// `None` waits until a response arrives or the channel closes.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// Buffer size of the outbound message queue.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer_size: usize,
    /// Buffer size of the console broadcast channel.
    #[serde(default = "default_console_buffer")]
    pub console_buffer_size: usize,
    /// Maximum accepted size of a raw inbound frame in bytes.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
}

impl RelayConfig {
    /// Returns the request deadline, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: None,
            outbound_buffer_size: default_outbound_buffer(),
            console_buffer_size: default_console_buffer(),
            max_message_size: default_max_message_size(),
        }
    }
}

fn default_outbound_buffer() -> usize {
    256
}

fn default_console_buffer() -> usize {
    256
}

fn default_max_message_size() -> usize {
    1_048_576
}
