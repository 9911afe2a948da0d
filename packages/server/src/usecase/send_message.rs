//! UseCase: メッセージ中継処理
//!
//! 受信したチャンク 1 つを 1 メッセージとして扱い、送信者 ID を付けて
//! 送信者以外の全員にブロードキャストする。

use std::sync::Arc;

use crate::domain::{MessagePusher, PeerId, notice};

/// メッセージ中継のユースケース
pub struct SendMessageUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// Relay one received chunk from `from` to every other peer.
    ///
    /// Returns how many peers the message was handed to.
    pub async fn execute(&self, from: PeerId, payload: &[u8]) -> usize {
        self.message_pusher
            .broadcast(notice::relay(from, payload), Some(from))
            .await
    }
}
