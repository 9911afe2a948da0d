//! Peer registry trait.

use async_trait::async_trait;

use super::{PeerHandle, PeerId};

/// Shared set of live peers.
///
/// All operations are serialized by the implementation; none of them may hold
/// the lock across network I/O. A peer is present iff its session can still
/// receive broadcasts.
#[async_trait]
pub trait PeerRegistry: Send + Sync {
    /// Insert unconditionally. Capacity is the caller's concern.
    async fn add(&self, handle: PeerHandle);

    /// Remove if present. Returns `false` when the peer was already gone.
    async fn remove(&self, peer_id: PeerId) -> bool;

    async fn get(&self, peer_id: PeerId) -> Option<PeerHandle>;

    /// Point-in-time copy in id order, safe to iterate while others mutate the registry.
    async fn snapshot(&self) -> Vec<PeerHandle>;

    async fn count(&self) -> usize;

    /// Atomically take every peer out of the registry.
    async fn drain(&self) -> Vec<PeerHandle>;
}
