//! Operator console.
//!
//! The terminal is read on a plain OS thread that forwards lines over a
//! channel, so a blocked `stdin` read never keeps the runtime alive after
//! shutdown. Tests feed the same channel directly.

use std::{
    io::{self, BufRead},
    sync::Arc,
    thread,
};

use tokio::sync::mpsc;
use tracing::{info, warn};

use super::state::AppState;

/// Exact, case-sensitive command that stops the server
pub const QUIT_COMMAND: &str = "quit";

/// One line of operator input, interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand<'a> {
    Quit,
    Broadcast(&'a str),
    Ignore,
}

impl<'a> ConsoleCommand<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line == QUIT_COMMAND {
            ConsoleCommand::Quit
        } else if line.is_empty() {
            ConsoleCommand::Ignore
        } else {
            ConsoleCommand::Broadcast(line)
        }
    }
}

/// Start a thread forwarding `stdin` lines; the channel closes at EOF.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!("failed to read operator input: {}", err);
                    break;
                }
            }
        }
    });

    rx
}

/// Console loop. Ends on `quit`, when operator input closes, or when the server stops.
pub(crate) async fn run_console(mut input: mpsc::UnboundedReceiver<String>, state: Arc<AppState>) {
    info!("Server console ready. Type messages to broadcast, or '{QUIT_COMMAND}' to shutdown.");

    while state.lifecycle.is_running() {
        let Some(line) = input.recv().await else {
            info!("Operator input closed; console stopped, server keeps running");
            return;
        };

        match ConsoleCommand::parse(&line) {
            ConsoleCommand::Quit => {
                info!("Shutting down server...");
                let closed = state.shutdown_server_usecase.execute().await;
                info!("Disconnected {} client(s)", closed);
                return;
            }
            ConsoleCommand::Broadcast(text) => {
                info!("[Server]: {}", text);
                let delivered = state.operator_broadcast_usecase.execute(text).await;
                tracing::debug!("Operator message delivered to {} client(s)", delivered);
            }
            ConsoleCommand::Ignore => {}
        }
    }
}
