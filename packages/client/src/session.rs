//! Chat session over an established connection.
//!
//! The server has no framing: whatever one `read` returns is shown as one
//! message, and every typed line goes out as one chunk with no newline.

use std::io::Write;

use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    sync::mpsc,
};

use crate::error::ClientError;

/// Typing this disconnects
pub const EXIT_COMMAND: &str = "exit";

const READ_BUFFER_SIZE: usize = 1024;

/// What to do with one line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand<'a> {
    Exit,
    Skip,
    Send(&'a str),
}

impl<'a> ClientCommand<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line == EXIT_COMMAND {
            ClientCommand::Exit
        } else if line.trim().is_empty() {
            ClientCommand::Skip
        } else {
            ClientCommand::Send(line)
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server closed the connection
    ServerClosed,
    /// The user typed `exit`
    UserExit,
    /// The input source closed (Ctrl+C / Ctrl+D)
    InputClosed,
}

/// Relay between `stream`, user `input` and `output` until one side ends.
///
/// # Errors
///
/// Returns an error if reading from or writing to the connection fails, or if
/// `output` cannot be written.
pub async fn run_session<S, W>(
    stream: S,
    input: &mut mpsc::UnboundedReceiver<String>,
    greeting: Option<&str>,
    output: &mut W,
) -> Result<SessionEnd, ClientError>
where
    S: AsyncRead + AsyncWrite,
    W: Write,
{
    let (mut reader, mut writer) = tokio::io::split(stream);

    if let Some(greeting) = greeting.filter(|g| !g.is_empty()) {
        writer.write_all(greeting.as_bytes()).await?;
    }

    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    loop {
        tokio::select! {
            read = reader.read(&mut buf) => {
                let n = read?;
                if n == 0 {
                    return Ok(SessionEnd::ServerClosed);
                }
                output.write_all(&buf[..n])?;
                output.write_all(b"\n")?;
                output.flush()?;
            }
            line = input.recv() => {
                let Some(line) = line else {
                    writer.shutdown().await?;
                    return Ok(SessionEnd::InputClosed);
                };
                match ClientCommand::parse(&line) {
                    ClientCommand::Exit => {
                        writer.shutdown().await?;
                        return Ok(SessionEnd::UserExit);
                    }
                    ClientCommand::Skip => {}
                    ClientCommand::Send(text) => {
                        writer.write_all(text.as_bytes()).await?;
                        writer.flush().await?;
                    }
                }
            }
        }
    }
}
