//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectPeerUseCase::execute(): 容量チェック、ID 採番、Registry への登録
//! - ConnectPeerUseCase::announce(): 参加通知とウェルカムメッセージ
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ピアの接続
//! - 異常系：容量超過、停止中の接続
//! - エッジケース：容量ちょうどで拒否された場合に ID が消費されないこと

use std::{net::SocketAddr, sync::Arc};

use hiroba_shared::time::Clock;

use crate::domain::{
    MessagePushError, MessagePusher, Peer, PeerChannel, PeerHandle, PeerRegistry,
    ServerLifecycle, Timestamp, notice,
};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectPeerUseCase {
    registry: Arc<dyn PeerRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    lifecycle: Arc<ServerLifecycle>,
    clock: Arc<dyn Clock>,
    /// Maximum number of simultaneously registered peers
    capacity: usize,
}

impl ConnectPeerUseCase {
    pub fn new(
        registry: Arc<dyn PeerRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        lifecycle: Arc<ServerLifecycle>,
        clock: Arc<dyn Clock>,
        capacity: usize,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            lifecycle,
            clock,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Admit a connection: check capacity, assign the next id, register.
    ///
    /// # Errors
    ///
    /// * `ConnectError::ServerStopping` - the server is shutting down
    /// * `ConnectError::CapacityExceeded` - `capacity` peers are already registered
    pub async fn execute(
        &self,
        addr: SocketAddr,
        channel: PeerChannel,
    ) -> Result<Peer, ConnectError> {
        if !self.lifecycle.is_running() {
            return Err(ConnectError::ServerStopping);
        }

        // 1. 容量チェック（登録前に行う）
        if self.registry.count().await >= self.capacity {
            return Err(ConnectError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        // 2. ID を採番して Registry に登録
        let peer = Peer::new(
            self.lifecycle.next_peer_id(),
            addr,
            Timestamp::new(self.clock.now_millis()),
        );
        self.registry
            .add(PeerHandle::new(peer.clone(), channel))
            .await;

        Ok(peer)
    }

    /// Tell everyone else about `peer`, then greet `peer` itself.
    ///
    /// Returns the number of connected peers quoted in the welcome.
    pub async fn announce(&self, peer: &Peer) -> Result<usize, MessagePushError> {
        self.message_pusher
            .broadcast(notice::peer_joined(peer), Some(peer.id))
            .await;

        let connected = self.registry.count().await;
        self.message_pusher
            .push_to(peer.id, notice::welcome(peer, connected))
            .await?;

        Ok(connected)
    }
}
