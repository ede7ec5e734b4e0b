//! Domain layer: the deal entity, its state machine, guards, and fees.

pub mod entities;
pub mod errors;
pub mod events;
pub mod fees;
pub mod guards;
pub mod value_objects;

pub use entities::{DealParams, EscrowDeal};
pub use errors::{EscrowError, GuardViolation};
pub use guards::{
    guard_cancel, guard_complete, guard_create, guard_deposit, guard_no_active_deal,
    guard_refund, guard_token_owner,
};
pub use events::{EscrowEvent, EscrowEventKind};
pub use fees::{compute_fee, CostBreakdown, FEE_DENOMINATOR};
pub use value_objects::EscrowStatus;
