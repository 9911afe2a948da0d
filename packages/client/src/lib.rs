//! Line-oriented terminal client for the Hiroba chat server.
//!
//! Every received chunk is printed on its own line; every typed line is sent
//! as one raw chunk. Typing `exit` disconnects.

pub mod error;
pub mod input;
pub mod runner;
pub mod session;

pub use runner::run_client;
