//! Server state shared by the accept loop, sessions and console.

use std::sync::Arc;

use crate::{
    domain::ServerLifecycle,
    usecase::{
        ConnectPeerUseCase, DisconnectPeerUseCase, OperatorBroadcastUseCase, SendMessageUseCase,
        ShutdownServerUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectPeerUseCase（参加者接続のユースケース）
    pub connect_peer_usecase: Arc<ConnectPeerUseCase>,
    /// SendMessageUseCase（メッセージ中継のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// DisconnectPeerUseCase（参加者切断のユースケース）
    pub disconnect_peer_usecase: Arc<DisconnectPeerUseCase>,
    /// OperatorBroadcastUseCase（オペレーター送信のユースケース）
    pub operator_broadcast_usecase: Arc<OperatorBroadcastUseCase>,
    /// ShutdownServerUseCase（サーバー停止のユースケース）
    pub shutdown_server_usecase: Arc<ShutdownServerUseCase>,
    pub lifecycle: Arc<ServerLifecycle>,
    /// Bytes requested per receive call
    pub read_buffer_size: usize,
    /// Capacity of each peer's outbound queue
    pub outbound_queue_size: usize,
}
