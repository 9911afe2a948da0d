//! Infrastructure layer: concrete implementations of the domain traits.

pub mod message_pusher;
pub mod registry;
