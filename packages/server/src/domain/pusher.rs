//! MessagePusher trait: delivery of messages to registered peers.
//!
//! Every peer has a bounded outbound queue drained by its writer task, plus a
//! close signal that is independent of the queue, so a peer can be closed even
//! when its queue is full or its writer is gone.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{
    mpsc::{self, error::TrySendError},
    watch,
};

use super::{Message, MessagePushError, PeerId};

/// Sending side of a peer's outbound queue, stored in the registry
#[derive(Debug, Clone)]
pub struct PeerChannel {
    messages: mpsc::Sender<Message>,
    close: Arc<watch::Sender<bool>>,
}

/// Receiving side of a peer's outbound queue, owned by its session
#[derive(Debug)]
pub struct PeerOutbox {
    pub messages: mpsc::Receiver<Message>,
    pub close: CloseSignal,
}

/// Observes a close request for one peer.
#[derive(Debug, Clone)]
pub struct CloseSignal(watch::Receiver<bool>);

/// Create a peer's queue holding at most `queue_size` undelivered messages.
///
/// # Panics
///
/// Panics if `queue_size` is 0.
pub fn peer_channel(queue_size: usize) -> (PeerChannel, PeerOutbox) {
    let (messages_tx, messages_rx) = mpsc::channel(queue_size);
    let (close_tx, close_rx) = watch::channel(false);

    let channel = PeerChannel {
        messages: messages_tx,
        close: Arc::new(close_tx),
    };
    let outbox = PeerOutbox {
        messages: messages_rx,
        close: CloseSignal(close_rx),
    };
    (channel, outbox)
}

impl PeerChannel {
    /// Enqueue without waiting. A full queue drops the message.
    pub(crate) fn try_send(&self, peer_id: PeerId, message: Message) -> Result<(), MessagePushError> {
        self.messages.try_send(message).map_err(|err| match err {
            TrySendError::Full(_) => MessagePushError::QueueFull(peer_id),
            TrySendError::Closed(_) => MessagePushError::ChannelClosed(peer_id),
        })
    }

    /// Request the connection be shut down. Never fails and may be repeated.
    pub(crate) fn close(&self) {
        self.close.send_replace(true);
    }
}

impl CloseSignal {
    pub fn is_requested(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once a close is requested, or once every `PeerChannel` is gone.
    pub async fn requested(&mut self) {
        let _ = self.0.wait_for(|closed| *closed).await;
    }
}

/// Best-effort delivery to registered peers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Deliver to one registered peer.
    async fn push_to(&self, peer_id: PeerId, message: Message) -> Result<(), MessagePushError>;

    /// Deliver to every registered peer except `exclude`.
    ///
    /// Per-peer failures, including a full queue, are swallowed. Returns how
    /// many peers the message was handed to.
    async fn broadcast(&self, message: Message, exclude: Option<PeerId>) -> usize;

    /// Empty the registry, sending `farewell` and then closing every drained peer.
    ///
    /// Returns how many peers were closed.
    async fn disconnect_all(&self, farewell: Message) -> usize;
}
