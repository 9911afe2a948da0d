//! UseCase errors.

use thiserror::Error;

/// Why a freshly accepted connection was not admitted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// The registry already holds `capacity` peers
    #[error("server is full ({capacity} clients connected)")]
    CapacityExceeded { capacity: usize },

    /// The server is shutting down
    #[error("server is shutting down")]
    ServerStopping,
}
