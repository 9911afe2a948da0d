//! Concurrent TCP broadcast chat server.
//!
//! Every accepted connection gets its own task; whatever one peer sends is
//! relayed to all other connected peers. An operator console can broadcast
//! to everyone or shut the server down.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
pub mod error;
