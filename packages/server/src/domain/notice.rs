//! Plain-text notices the server sends to peers.
//!
//! These are pure functions so the exact wording can be tested without sockets.
//! None of them end with a newline: the protocol has no framing, a notice is
//! whatever the peer receives in one chunk.

use super::{Message, Peer, PeerId};

pub const SERVER_FULL: &str = "[Server] Sorry, server is full. Try again later.";
pub const SHUTTING_DOWN: &str = "[Server] Server is shutting down. Goodbye!";

/// Sent to everyone except the new peer
pub fn peer_joined(peer: &Peer) -> Message {
    Message::from(format!(
        "[Server] Client {} ({}) joined the chat!",
        peer.id,
        peer.ip()
    ))
}

/// Sent to the new peer only
pub fn welcome(peer: &Peer, connected: usize) -> Message {
    Message::from(format!(
        "[Server] Welcome! You are Client {}. There are {} clients connected.",
        peer.id, connected
    ))
}

pub fn peer_left(peer: &Peer) -> Message {
    Message::from(format!(
        "[Server] Client {} ({}) left the chat.",
        peer.id,
        peer.ip()
    ))
}

pub fn server_full() -> Message {
    Message::from(SERVER_FULL)
}

pub fn shutting_down() -> Message {
    Message::from(SHUTTING_DOWN)
}

/// Tag a chunk received from `from` with its sender.
pub fn relay(from: PeerId, payload: &[u8]) -> Message {
    let prefix = format!("[Client {}]: ", from);
    let mut bytes = Vec::with_capacity(prefix.len() + payload.len());
    bytes.extend_from_slice(prefix.as_bytes());
    bytes.extend_from_slice(payload);
    Message::from(bytes)
}

/// Operator console broadcast
pub fn operator(line: &str) -> Message {
    Message::from(format!("[Server]: {}", line))
}
