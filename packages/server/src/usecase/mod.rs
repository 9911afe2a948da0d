//! UseCase layer: what the server does, independent of sockets and terminals.

mod connect_peer;
mod disconnect_peer;
mod error;
mod operator_broadcast;
mod send_message;
mod shutdown_server;

pub use connect_peer::ConnectPeerUseCase;
pub use disconnect_peer::DisconnectPeerUseCase;
pub use error::ConnectError;
pub use operator_broadcast::OperatorBroadcastUseCase;
pub use send_message::SendMessageUseCase;
pub use shutdown_server::ShutdownServerUseCase;
