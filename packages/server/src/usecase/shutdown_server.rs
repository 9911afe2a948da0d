//! UseCase: サーバー停止処理

use std::sync::Arc;

use crate::domain::{MessagePusher, ServerLifecycle, notice};

/// サーバー停止のユースケース
///
/// Stops the lifecycle first so the accept loop admits nobody new, then sends
/// the shutdown notice to every peer, closes their connections and empties
/// the registry.
pub struct ShutdownServerUseCase {
    lifecycle: Arc<ServerLifecycle>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ShutdownServerUseCase {
    pub fn new(lifecycle: Arc<ServerLifecycle>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            lifecycle,
            message_pusher,
        }
    }

    /// Returns how many peers were disconnected.
    pub async fn execute(&self) -> usize {
        if !self.lifecycle.stop() {
            tracing::debug!("Shutdown requested while already stopping");
        }
        self.message_pusher
            .disconnect_all(notice::shutting_down())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Message, MockMessagePusher, Peer, PeerHandle, PeerId, PeerRegistry, Timestamp,
            peer_channel,
        },
        infrastructure::{
            message_pusher::ChannelMessagePusher, registry::InMemoryPeerRegistry,
        },
    };
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_shutdown_stops_lifecycle_and_closes_peers() {
        // テスト項目: 停止フラグが立ち、全員に終了通知と Close が届き、Registry が空になる
        // given (前提条件):
        let registry = Arc::new(InMemoryPeerRegistry::new());
        let lifecycle = Arc::new(ServerLifecycle::new());
        let usecase = ShutdownServerUseCase::new(
            lifecycle.clone(),
            Arc::new(ChannelMessagePusher::new(registry.clone())),
        );
        let (tx, mut outbox) = peer_channel(8);
        let peer = Peer::new(
            PeerId::new(1),
            "127.0.0.1:40000".parse().unwrap(),
            Timestamp::new(0),
        );
        registry.add(PeerHandle::new(peer, tx)).await;

        // when (操作):
        let closed = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(closed, 1);
        assert!(!lifecycle.is_running());
        assert_eq!(registry.count().await, 0);
        assert_eq!(
            outbox.messages.recv().await,
            Some(Message::from("[Server] Server is shutting down. Goodbye!"))
        );
        assert!(outbox.close.is_requested());
    }

    #[tokio::test]
    async fn test_shutdown_twice_is_harmless() {
        // テスト項目: 二重に停止しても二回目は誰も切断しない
        // given (前提条件):
        let lifecycle = Arc::new(ServerLifecycle::new());
        let mut message_pusher = MockMessagePusher::new();
        message_pusher
            .expect_disconnect_all()
            .with(eq(Message::from(notice::SHUTTING_DOWN)))
            .times(2)
            .returning({
                let mut calls = 0;
                move |_| {
                    calls += 1;
                    if calls == 1 { 2 } else { 0 }
                }
            });
        let usecase = ShutdownServerUseCase::new(lifecycle.clone(), Arc::new(message_pusher));

        // when (操作):
        let first = usecase.execute().await;
        let second = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert!(!lifecycle.is_running());
    }
}
