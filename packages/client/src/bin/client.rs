//! Terminal client for the Hiroba TCP chat server.
//!
//! Prints every message the server relays and sends each typed line.
//! Type `exit` to disconnect.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client
//! cargo run --bin hiroba-client -- --host 127.0.0.1 --port 3000 --greeting "hello"
//! ```

use clap::Parser;

use hiroba_client::run_client;
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-client")]
#[command(about = "TCP chat client for the Hiroba broadcast server", long_about = None)]
struct Args {
    /// Server host to connect to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to connect to
    #[arg(short = 'p', long, default_value_t = 8080)]
    port: u16,

    /// Message sent right after connecting
    #[arg(short = 'g', long)]
    greeting: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = run_client(&args.host, args.port, args.greeting.as_deref()).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
