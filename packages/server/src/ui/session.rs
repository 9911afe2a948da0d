//! Peer session handler.
//!
//! One session per accepted connection, running as a detached task:
//!
//! ```text
//! Joining -> Active -> Leaving -> Closed
//! ```
//!
//! Outbound traffic goes through the peer's bounded queue and a dedicated
//! writer task (`pusher_loop`); the session itself only reads. Every
//! successful read is one message, whatever it contains: there is no
//! delimiter framing.

use std::{fmt, io, sync::Arc};

use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, WriteHalf},
    sync::mpsc,
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::domain::{CloseSignal, Message, Peer, PeerId, PeerOutbox};

use super::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionState {
    Joining,
    Active,
    Leaving,
    Closed,
}

#[derive(Debug)]
enum LeaveReason {
    Disconnected,
    ReadFailed(io::Error),
    ServerStopping,
    ForcedClose,
}

impl fmt::Display for LeaveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveReason::Disconnected => write!(f, "connection closed by client"),
            LeaveReason::ReadFailed(err) => write!(f, "read error: {}", err),
            LeaveReason::ServerStopping => write!(f, "server stopping"),
            LeaveReason::ForcedClose => write!(f, "connection closed by server"),
        }
    }
}

/// How the writer task ended
#[derive(Debug, PartialEq, Eq)]
enum WriterExit {
    /// Asked to close, or the queue was dropped by the registry
    Closed,
    /// A socket write failed; the read side or a close request ends the session
    Failed,
}

pub(crate) struct PeerSession {
    peer: Peer,
    state: SessionState,
    app: Arc<AppState>,
}

impl PeerSession {
    pub(crate) fn new(peer: Peer, app: Arc<AppState>) -> Self {
        Self {
            peer,
            state: SessionState::Joining,
            app,
        }
    }

    /// Drive the session to `Closed`. Nothing is reported back to the spawner.
    pub(crate) async fn run<S>(mut self, stream: S, outbox: PeerOutbox)
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let PeerOutbox { messages, close } = outbox;
        let (reader, writer) = tokio::io::split(stream);
        let mut writer_task = tokio::spawn(pusher_loop(self.peer.id, messages, close.clone(), writer));

        // Joining
        match self.app.connect_peer_usecase.announce(&self.peer).await {
            Ok(connected) => info!(
                "Client {} ({}) joined the chat at {}, {} connected",
                self.peer.id,
                self.peer.addr,
                self.peer.connected_at.to_rfc3339(),
                connected
            ),
            Err(e) => warn!("Failed to welcome Client {}: {}", self.peer.id, e),
        }
        self.transition(SessionState::Active);

        // Active
        let reason = self.relay_until_leave(reader, &mut writer_task, close).await;
        self.transition(SessionState::Leaving);

        // Leaving
        if let LeaveReason::ReadFailed(_) = reason {
            warn!("Client {} ({}) left the chat: {}", self.peer.id, self.peer.addr, reason);
        } else {
            info!("Client {} ({}) left the chat: {}", self.peer.id, self.peer.addr, reason);
        }
        self.app
            .disconnect_peer_usecase
            .broadcast_peer_left(&self.peer)
            .await;
        self.transition(SessionState::Closed);

        // Closed
        self.app.disconnect_peer_usecase.execute(self.peer.id).await;
        writer_task.abort();
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Client {}: {:?} -> {:?}", self.peer.id, self.state, next);
        self.state = next;
    }

    async fn relay_until_leave<R>(
        &self,
        reader: R,
        writer_task: &mut JoinHandle<WriterExit>,
        mut close: CloseSignal,
    ) -> LeaveReason
    where
        R: AsyncRead + Unpin,
    {
        let inbound = self.read_loop(reader, close.clone());
        tokio::pin!(inbound);

        tokio::select! {
            reason = &mut inbound => reason,
            exit = writer_task => match exit {
                // Nothing can be written any more, but the peer may still be talking.
                Ok(WriterExit::Failed) => tokio::select! {
                    reason = &mut inbound => reason,
                    _ = close.requested() => LeaveReason::ForcedClose,
                },
                Ok(WriterExit::Closed) | Err(_) => LeaveReason::ForcedClose,
            },
        }
    }

    async fn read_loop<R>(&self, mut reader: R, close: CloseSignal) -> LeaveReason
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = vec![0u8; self.app.read_buffer_size];

        loop {
            if !self.app.lifecycle.is_running() {
                return LeaveReason::ServerStopping;
            }
            if close.is_requested() {
                return LeaveReason::ForcedClose;
            }

            let n = match reader.read(&mut buf).await {
                Ok(0) => return LeaveReason::Disconnected,
                Ok(n) => n,
                Err(err) => return LeaveReason::ReadFailed(err),
            };

            let payload = &buf[..n];
            info!(
                "[Client {}]: {}",
                self.peer.id,
                String::from_utf8_lossy(payload)
            );
            let delivered = self
                .app
                .send_message_usecase
                .execute(self.peer.id, payload)
                .await;
            debug!(
                "Relayed {} bytes from Client {} to {} client(s)",
                n, self.peer.id, delivered
            );
        }
    }
}

/// Drain a peer's outbound queue into its socket.
///
/// Queued messages are written before a close request is honoured, so a
/// farewell enqueued ahead of the close still reaches the peer.
async fn pusher_loop<S>(
    peer_id: PeerId,
    mut messages: mpsc::Receiver<Message>,
    mut close: CloseSignal,
    mut writer: WriteHalf<S>,
) -> WriterExit
where
    S: AsyncRead + AsyncWrite,
{
    loop {
        tokio::select! {
            biased;

            message = messages.recv() => {
                let Some(message) = message else {
                    return WriterExit::Closed;
                };
                if let Err(err) = write_message(&mut writer, message.as_bytes()).await {
                    warn!("Failed to write to Client {}: {}", peer_id, err);
                    return WriterExit::Failed;
                }
            }
            _ = close.requested() => {
                if let Err(err) = writer.shutdown().await {
                    debug!("Shutdown of Client {} failed: {}", peer_id, err);
                }
                return WriterExit::Closed;
            }
        }
    }
}

async fn write_message<W>(writer: &mut W, bytes: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(bytes).await?;
    writer.flush().await
}
