//! Domain layer: peers, messages and the interfaces the other layers depend on.
//!
//! The registry and the message pusher are defined here as traits; concrete
//! implementations live in the infrastructure layer.

mod error;
mod lifecycle;
mod message;
pub mod notice;
mod peer;
mod pusher;
mod registry;

pub use error::MessagePushError;
pub use lifecycle::ServerLifecycle;
pub use message::Message;
pub use peer::{Peer, PeerHandle, PeerId, Timestamp};
#[cfg(test)]
pub use pusher::MockMessagePusher;
pub use pusher::{CloseSignal, MessagePusher, PeerChannel, PeerOutbox, peer_channel};
pub use registry::PeerRegistry;
