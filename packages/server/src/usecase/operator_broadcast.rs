//! UseCase: オペレーターからの全体送信

use std::sync::Arc;

use crate::domain::{MessagePusher, notice};

/// オペレーターコンソールからのブロードキャスト
pub struct OperatorBroadcastUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl OperatorBroadcastUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// Broadcast `line` with the server prefix to every peer.
    ///
    /// The console is not a peer, so nobody is excluded.
    pub async fn execute(&self, line: &str) -> usize {
        self.message_pusher
            .broadcast(notice::operator(line), None)
            .await
    }
}
