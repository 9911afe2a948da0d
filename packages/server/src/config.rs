//! Server configuration.

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
/// Maximum number of simultaneously connected peers
pub const DEFAULT_CAPACITY: usize = 10;
/// Size of one receive call; a chunk of up to this many bytes is one message
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;
/// Messages held for a peer that is not reading before further ones are dropped
pub const DEFAULT_OUTBOUND_QUEUE_SIZE: usize = 64;

/// Invalid configuration values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("capacity must be at least 1")]
    ZeroCapacity,

    #[error("read buffer size must be at least 1 byte")]
    ZeroReadBufferSize,

    #[error("outbound queue size must be at least 1 message")]
    ZeroOutboundQueueSize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub capacity: usize,
    pub read_buffer_size: usize,
    pub outbound_queue_size: usize,
}

impl ServerConfig {
    /// Address passed to `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.read_buffer_size == 0 {
            return Err(ConfigError::ZeroReadBufferSize);
        }
        if self.outbound_queue_size == 0 {
            return Err(ConfigError::ZeroOutboundQueueSize);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            capacity: DEFAULT_CAPACITY,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            outbound_queue_size: DEFAULT_OUTBOUND_QUEUE_SIZE,
        }
    }
}
