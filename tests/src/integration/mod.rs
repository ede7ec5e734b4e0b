//! Cross-crate integration tests.

mod escrow_flows;
mod persistence;
