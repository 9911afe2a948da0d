//! UI layer: TCP accept loop, per-peer sessions and the operator console.

pub mod console;
mod server;
mod session;
mod signal;
pub mod state;

pub use server::Server;
pub use signal::shutdown_signal;
