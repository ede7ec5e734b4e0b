//! # Escrow Engine
//!
//! The lifecycle of a property sale, coordinated across the authoritative
//! on-chain escrow contract and the off-chain mirror kept for queries.
//!
//! ## State machine
//!
//! ```text
//! (none) --create--> PENDING --deposit--> FUNDED --complete--> COMPLETED
//!                       |                    |
//!                    cancel               refund
//!                       v                    v
//!                   CANCELLED            REFUNDED
//! ```
//!
//! No transition skips FUNDED en route to COMPLETED or REFUNDED, and the
//! three right-hand states are terminal. Guards are re-checked by the
//! contract at commit time; this crate enforces them up front so failures
//! surface as distinguishable errors instead of burned gas.
//!
//! ## Custody invariants
//!
//! - At most one non-terminal deal exists per token at a time.
//! - `fee` is computed from the contract's basis-point rate at creation and
//!   frozen; later rate changes affect only new deals.
//! - A deposit must equal `price + fee` exactly.
//! - Completion effects (ownership transfer, payout, sale metrics) happen
//!   exactly once.
//!
//! ## Module Structure
//!
//! ```text
//! escrow-engine/
//! ├── domain/          # EscrowDeal, EscrowStatus, guards, fees, errors
//! ├── ports/           # EscrowApi, EscrowLedger, DealMirror, EventSink
//! ├── service/         # EscrowService orchestration + event listener
//! └── adapters/        # MockEscrowLedger (in-memory contract)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{ChannelEventSource, MockEscrowLedger};
pub use domain::{
    compute_fee, CostBreakdown, EscrowDeal, EscrowError, EscrowEvent, EscrowEventKind,
    EscrowStatus, GuardViolation, FEE_DENOMINATOR,
};
pub use ports::{DealMirror, EscrowApi, EscrowLedger, EventSink, EventSource, PendingTx, TxReceipt};
pub use service::{spawn_event_listener, EscrowService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
