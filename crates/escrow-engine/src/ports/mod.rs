//! Ports: what the engine offers and what it consumes.

pub mod inbound;
pub mod outbound;

pub use inbound::EscrowApi;
pub use outbound::{DealMirror, EscrowLedger, EventSink, EventSource, PendingTx, TxReceipt};
