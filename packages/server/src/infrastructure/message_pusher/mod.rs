//! Message delivery implementations.
//!
//! - `channel`: hands messages to each peer's outbound queue; a writer task per
//!   peer owns the socket.

pub mod channel;

pub use channel::ChannelMessagePusher;
