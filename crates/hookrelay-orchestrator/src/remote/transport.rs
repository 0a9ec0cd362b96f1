//! Outbound transport seam.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

use hookrelay_core::error::AppError;
use hookrelay_protocol::message::serializer::encode;
use hookrelay_protocol::message::types::SocketMessage;

/// Delivers outbound messages to the remote participant.
///
/// The channel only needs "send one message"; sockets, pipes and
/// in-process queues all fit behind this trait.
#[async_trait]
pub trait MessageSink: Send + Sync + fmt::Debug {
    /// Sends one message. An error means the transport is gone.
    async fn send(&self, msg: SocketMessage) -> Result<(), AppError>;
}

/// In-process queue carrying typed messages.
#[async_trait]
impl MessageSink for mpsc::Sender<SocketMessage> {
    async fn send(&self, msg: SocketMessage) -> Result<(), AppError> {
        mpsc::Sender::send(self, msg)
            .await
            .map_err(|_| AppError::channel_closed("Outbound message queue closed"))
    }
}

/// Text transport carrying encoded JSON frames.
#[async_trait]
impl MessageSink for mpsc::Sender<String> {
    async fn send(&self, msg: SocketMessage) -> Result<(), AppError> {
        let frame = encode(&msg)?;
        mpsc::Sender::send(self, frame)
            .await
            .map_err(|_| AppError::channel_closed("Outbound frame queue closed"))
    }
}
