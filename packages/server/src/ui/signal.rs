use std::future::pending;

use tracing::{info, warn};

/// Resolves on Ctrl+C, or on SIGTERM where supported.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = wait_for_ctrl_c() => {}
                    _ = terminate.recv() => {
                        info!("received SIGTERM");
                    }
                }
            }
            Err(err) => {
                warn!("failed to install SIGTERM handler: {}", err);
                wait_for_ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        wait_for_ctrl_c().await;
    }
}

async fn wait_for_ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl+C: {}", err);
        // Without a handler this must never look like a shutdown request.
        pending::<()>().await;
    } else {
        info!("received Ctrl+C");
    }
}
