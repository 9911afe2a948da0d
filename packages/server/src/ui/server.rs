//! Server execution logic.

use std::{future::Future, net::SocketAddr, sync::Arc};

use tokio::{
    io::AsyncWriteExt,
    net::{TcpListener, TcpStream},
    sync::mpsc,
};

use crate::{
    config::ServerConfig,
    domain::{ServerLifecycle, notice, peer_channel},
    error::ServerError,
    usecase::{
        ConnectError, ConnectPeerUseCase, DisconnectPeerUseCase, OperatorBroadcastUseCase,
        SendMessageUseCase, ShutdownServerUseCase,
    },
};

use super::{
    console::{run_console, spawn_stdin_reader},
    session::PeerSession,
    signal::shutdown_signal,
    state::AppState,
};

/// TCP broadcast chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     config,
///     connect_peer_usecase,
///     send_message_usecase,
///     disconnect_peer_usecase,
///     operator_broadcast_usecase,
///     shutdown_server_usecase,
///     lifecycle,
/// );
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    /// ConnectPeerUseCase（参加者接続のユースケース）
    connect_peer_usecase: Arc<ConnectPeerUseCase>,
    /// SendMessageUseCase（メッセージ中継のユースケース）
    send_message_usecase: Arc<SendMessageUseCase>,
    /// DisconnectPeerUseCase（参加者切断のユースケース）
    disconnect_peer_usecase: Arc<DisconnectPeerUseCase>,
    /// OperatorBroadcastUseCase（オペレーター送信のユースケース）
    operator_broadcast_usecase: Arc<OperatorBroadcastUseCase>,
    /// ShutdownServerUseCase（サーバー停止のユースケース）
    shutdown_server_usecase: Arc<ShutdownServerUseCase>,
    lifecycle: Arc<ServerLifecycle>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `config` - Bind address, capacity and read buffer size
    /// * `connect_peer_usecase` - UseCase for admitting and greeting peers
    /// * `send_message_usecase` - UseCase for relaying peer messages
    /// * `disconnect_peer_usecase` - UseCase for peer departure
    /// * `operator_broadcast_usecase` - UseCase for console broadcasts
    /// * `shutdown_server_usecase` - UseCase for orderly shutdown
    /// * `lifecycle` - Running flag shared with the use cases
    pub fn new(
        config: ServerConfig,
        connect_peer_usecase: Arc<ConnectPeerUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        disconnect_peer_usecase: Arc<DisconnectPeerUseCase>,
        operator_broadcast_usecase: Arc<OperatorBroadcastUseCase>,
        shutdown_server_usecase: Arc<ShutdownServerUseCase>,
        lifecycle: Arc<ServerLifecycle>,
    ) -> Self {
        Self {
            config,
            connect_peer_usecase,
            send_message_usecase,
            disconnect_peer_usecase,
            operator_broadcast_usecase,
            shutdown_server_usecase,
            lifecycle,
        }
    }

    /// Bind the configured address and serve until `quit` or Ctrl+C.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the address cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        self.config.validate()?;

        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;

        self.run_until(listener, spawn_stdin_reader(), shutdown_signal())
            .await
    }

    /// Serve on an already bound listener.
    ///
    /// Operator lines are read from `console_input`. When `shutdown` resolves the
    /// server goes through the same shutdown as the `quit` command. Returns once
    /// the accept loop has stopped.
    pub async fn run_until<F>(
        self,
        listener: TcpListener,
        console_input: mpsc::UnboundedReceiver<String>,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        self.config.validate()?;

        let app_state = Arc::new(AppState {
            connect_peer_usecase: self.connect_peer_usecase,
            send_message_usecase: self.send_message_usecase,
            disconnect_peer_usecase: self.disconnect_peer_usecase,
            operator_broadcast_usecase: self.operator_broadcast_usecase,
            shutdown_server_usecase: self.shutdown_server_usecase,
            lifecycle: self.lifecycle,
            read_buffer_size: self.config.read_buffer_size,
            outbound_queue_size: self.config.outbound_queue_size,
        });

        tracing::info!(
            "Chat server listening on {} (capacity {})",
            listener.local_addr()?,
            app_state.connect_peer_usecase.capacity()
        );
        tracing::info!("Press Ctrl+C or type 'quit' to shutdown gracefully");

        let console_task = tokio::spawn(run_console(console_input, app_state.clone()));

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
                _ = app_state.lifecycle.stopped() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => admit(stream, addr, &app_state).await,
                    Err(e) => {
                        if !app_state.lifecycle.is_running() {
                            break;
                        }
                        tracing::error!("Failed to accept connection: {}", e);
                    }
                },
            }
        }

        // Idempotent: also closes peers admitted while a console `quit` was in progress.
        let closed = app_state.shutdown_server_usecase.execute().await;
        if closed > 0 {
            tracing::info!("Disconnected {} client(s)", closed);
        }
        console_task.abort();
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Register a fresh connection and start its session, or turn it away.
async fn admit(mut stream: TcpStream, addr: SocketAddr, app_state: &Arc<AppState>) {
    let (channel, outbox) = peer_channel(app_state.outbound_queue_size);

    match app_state.connect_peer_usecase.execute(addr, channel).await {
        Ok(peer) => {
            tracing::debug!("Accepted connection from {} as Client {}", addr, peer.id);
            let session = PeerSession::new(peer, app_state.clone());
            tokio::spawn(session.run(stream, outbox));
        }
        Err(ConnectError::CapacityExceeded { capacity }) => {
            tracing::warn!(
                "Rejected connection from {}: server is full ({} clients)",
                addr,
                capacity
            );
            let full = notice::server_full();
            if let Err(e) = stream.write_all(full.as_bytes()).await {
                tracing::debug!("Failed to send full notice to {}: {}", addr, e);
            }
            if let Err(e) = stream.shutdown().await {
                tracing::debug!("Failed to shut down rejected connection {}: {}", addr, e);
            }
        }
        Err(ConnectError::ServerStopping) => {
            tracing::debug!("Dropped connection from {}: server is stopping", addr);
        }
    }
}
