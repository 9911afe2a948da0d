//! TCP broadcast chat server.
//!
//! Relays every chunk a client sends to all other connected clients. Lines
//! typed on the server's terminal are broadcast as `[Server]: <line>`; `quit`
//! shuts the server down.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 127.0.0.1 --port 3000 --capacity 5
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_server::{
    config::{
        DEFAULT_CAPACITY, DEFAULT_HOST, DEFAULT_OUTBOUND_QUEUE_SIZE, DEFAULT_PORT,
        DEFAULT_READ_BUFFER_SIZE, ServerConfig,
    },
    domain::ServerLifecycle,
    infrastructure::{message_pusher::ChannelMessagePusher, registry::InMemoryPeerRegistry},
    ui::Server,
    usecase::{
        ConnectPeerUseCase, DisconnectPeerUseCase, OperatorBroadcastUseCase, SendMessageUseCase,
        ShutdownServerUseCase,
    },
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "TCP chat server with broadcast support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Maximum number of simultaneously connected clients
    #[arg(short = 'c', long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Bytes read from a client socket per receive call
    #[arg(long = "buffer-size", default_value_t = DEFAULT_READ_BUFFER_SIZE)]
    buffer_size: usize,

    /// Messages queued for a slow client before further ones are dropped
    #[arg(long = "queue-size", default_value_t = DEFAULT_OUTBOUND_QUEUE_SIZE)]
    queue_size: usize,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        capacity: args.capacity,
        read_buffer_size: args.buffer_size,
        outbound_queue_size: args.queue_size,
    };

    // Initialize dependencies in order:
    // 1. Registry
    // 2. MessagePusher
    // 3. Lifecycle
    // 4. UseCases
    // 5. Server

    // 1. Create Registry (in-memory)
    let registry = Arc::new(InMemoryPeerRegistry::new());

    // 2. Create MessagePusher (per-peer channel implementation)
    let message_pusher = Arc::new(ChannelMessagePusher::new(registry.clone()));

    // 3. Create Lifecycle (running flag and id counter)
    let lifecycle = Arc::new(ServerLifecycle::new());

    // 4. Create UseCases
    let connect_peer_usecase = Arc::new(ConnectPeerUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        lifecycle.clone(),
        Arc::new(SystemClock),
        config.capacity,
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(message_pusher.clone()));
    let disconnect_peer_usecase = Arc::new(DisconnectPeerUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let operator_broadcast_usecase =
        Arc::new(OperatorBroadcastUseCase::new(message_pusher.clone()));
    let shutdown_server_usecase = Arc::new(ShutdownServerUseCase::new(
        lifecycle.clone(),
        message_pusher.clone(),
    ));

    // 5. Create and run the server
    let server = Server::new(
        config,
        connect_peer_usecase,
        send_message_usecase,
        disconnect_peer_usecase,
        operator_broadcast_usecase,
        shutdown_server_usecase,
        lifecycle,
    );
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
