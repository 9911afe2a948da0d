//! UseCase: 参加者切断処理

use std::sync::Arc;

use crate::domain::{MessagePusher, Peer, PeerId, PeerRegistry, notice};

/// 参加者切断のユースケース
pub struct DisconnectPeerUseCase {
    registry: Arc<dyn PeerRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectPeerUseCase {
    pub fn new(registry: Arc<dyn PeerRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Tell every other peer that `peer` left.
    pub async fn broadcast_peer_left(&self, peer: &Peer) -> usize {
        self.message_pusher
            .broadcast(notice::peer_left(peer), Some(peer.id))
            .await
    }

    /// Remove the peer from the registry. Safe to call for a peer that is already gone.
    pub async fn execute(&self, peer_id: PeerId) -> bool {
        self.registry.remove(peer_id).await
    }
}
