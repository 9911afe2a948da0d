//! Domain errors.

use thiserror::Error;

use super::PeerId;

/// Failure to hand a message to a single peer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// The peer is not (or no longer) in the registry
    #[error("Client {0} is not connected")]
    PeerNotFound(PeerId),

    /// The peer's outbound channel has been closed
    #[error("outbound channel of Client {0} is closed")]
    ChannelClosed(PeerId),

    /// The peer is not reading; the message was dropped
    #[error("outbound queue of Client {0} is full")]
    QueueFull(PeerId),
}
