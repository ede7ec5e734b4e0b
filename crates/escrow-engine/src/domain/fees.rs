//! # Fee Computation
//!
//! Fees are a basis-point cut of the price, truncated to integer minor
//! units, computed once at deal creation and frozen thereafter.

use super::errors::EscrowError;
use serde::{Deserialize, Serialize};
use shared_types::Amount;

/// Basis points in 100%.
pub const FEE_DENOMINATOR: u64 = 10_000;

/// `price * fee_bps / 10_000`, truncating.
///
/// Never recomputed on later reads; the result is stored on the deal.
pub fn compute_fee(price: Amount, fee_bps: u32) -> Result<Amount, EscrowError> {
    let numerator = price
        .checked_mul(Amount::from(fee_bps))
        .ok_or(EscrowError::AmountOverflow("fee"))?;
    Ok(numerator / Amount::from(FEE_DENOMINATOR))
}

/// Price, fee, and their sum, as quoted to a buyer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Sale price in minor units.
    pub price: Amount,
    /// Escrow fee in minor units.
    pub fee: Amount,
    /// `price + fee`; the exact amount the buyer must deposit.
    pub total: Amount,
}

impl CostBreakdown {
    /// Quote the full cost of a deal at the given fee rate.
    pub fn quote(price: Amount, fee_bps: u32) -> Result<Self, EscrowError> {
        let fee = compute_fee(price, fee_bps)?;
        let total = price
            .checked_add(fee)
            .ok_or(EscrowError::AmountOverflow("total"))?;
        Ok(Self { price, fee, total })
    }
}
