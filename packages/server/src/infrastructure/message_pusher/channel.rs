//! Channel-backed MessagePusher: the broadcast relay.
//!
//! Each registered peer owns a bounded outbound queue drained by its own
//! writer task (see `ui::session`). Pushing only enqueues and never waits: a
//! peer whose queue is full misses the message. Socket writes never happen
//! under the registry lock.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Message, MessagePushError, MessagePusher, PeerId, PeerRegistry};

/// Relay that delivers through the handles stored in a `PeerRegistry`
pub struct ChannelMessagePusher {
    registry: Arc<dyn PeerRegistry>,
}

impl ChannelMessagePusher {
    pub fn new(registry: Arc<dyn PeerRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl MessagePusher for ChannelMessagePusher {
    async fn push_to(&self, peer_id: PeerId, message: Message) -> Result<(), MessagePushError> {
        let handle = self
            .registry
            .get(peer_id)
            .await
            .ok_or(MessagePushError::PeerNotFound(peer_id))?;
        handle.deliver(message)?;
        tracing::debug!("Pushed message to Client {}", peer_id);
        Ok(())
    }

    async fn broadcast(&self, message: Message, exclude: Option<PeerId>) -> usize {
        let targets = self.registry.snapshot().await;
        let mut delivered = 0;

        for target in targets.iter().filter(|t| Some(t.id()) != exclude) {
            // ブロードキャストでは一部の送信失敗を許容
            match target.deliver(message.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!("Skipping Client {} during broadcast: {}", target.id(), e),
            }
        }

        tracing::debug!(
            "Broadcasted {} bytes to {} client(s)",
            message.as_bytes().len(),
            delivered
        );
        delivered
    }

    async fn disconnect_all(&self, farewell: Message) -> usize {
        let peers = self.registry.drain().await;

        for handle in &peers {
            if let Err(e) = handle.deliver(farewell.clone()) {
                tracing::warn!("Closing Client {} without farewell: {}", handle.id(), e);
            }
            handle.close();
        }

        peers.len()
    }
}
