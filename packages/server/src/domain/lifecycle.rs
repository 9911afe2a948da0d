//! Process-wide server state: running flag and peer id counter.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use super::PeerId;

/// Running flag plus the next-identifier counter.
///
/// Starts running; once stopped it is never reset.
#[derive(Debug)]
pub struct ServerLifecycle {
    running: watch::Sender<bool>,
    next_peer_id: AtomicU64,
}

impl ServerLifecycle {
    pub fn new() -> Self {
        let (running, _) = watch::channel(true);
        Self {
            running,
            next_peer_id: AtomicU64::new(1),
        }
    }

    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    /// Flip to stopping. Returns `true` only for the call that actually stopped the server.
    pub fn stop(&self) -> bool {
        self.running.send_if_modified(|running| {
            let was_running = *running;
            *running = false;
            was_running
        })
    }

    /// Resolves once the server is stopping (immediately if it already is).
    pub async fn stopped(&self) {
        let mut running = self.running.subscribe();
        let _ = running.wait_for(|running| !*running).await;
    }

    pub fn next_peer_id(&self) -> PeerId {
        PeerId::new(self.next_peer_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ServerLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
