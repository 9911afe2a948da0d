//! Peer registry implementations.

mod inmemory;

pub use inmemory::InMemoryPeerRegistry;
