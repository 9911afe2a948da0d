//! Client execution logic.

use std::io;

use tokio::net::TcpStream;

use crate::{
    error::ClientError,
    input::spawn_line_reader,
    session::{EXIT_COMMAND, SessionEnd, run_session},
};

/// Connect to `host:port` and chat until the server closes, `exit` is typed
/// or input ends.
///
/// # Errors
///
/// Returns an error if the connection cannot be established or breaks.
pub async fn run_client(host: &str, port: u16, greeting: Option<&str>) -> Result<(), ClientError> {
    let addr = format!("{}:{}", host, port);
    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|source| ClientError::Connect {
            addr: addr.clone(),
            source,
        })?;

    tracing::info!("Connected to chat server at {}", addr);
    println!(
        "\nType messages and press Enter to send. Type '{}' to disconnect.\n",
        EXIT_COMMAND
    );

    let mut input = spawn_line_reader();
    let mut stdout = io::stdout();
    let end = run_session(stream, &mut input, greeting, &mut stdout).await?;

    match end {
        SessionEnd::ServerClosed => tracing::info!("Server closed the connection"),
        SessionEnd::UserExit => tracing::info!("Disconnected"),
        SessionEnd::InputClosed => tracing::info!("Input closed, disconnected"),
    }

    Ok(())
}
