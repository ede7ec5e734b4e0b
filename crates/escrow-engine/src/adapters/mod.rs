//! Adapters: concrete implementations of the outbound ports.

pub mod mock_ledger;

pub use mock_ledger::{ChannelEventSource, MockEscrowLedger};
