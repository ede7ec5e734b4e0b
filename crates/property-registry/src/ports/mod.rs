//! Ports: the store trait the registry persists through.

pub mod outbound;

pub use outbound::{InMemoryPropertyStore, PropertyStore};
