//! # Transition Guards
//!
//! Pure guard checks for each state-machine event. The contract re-checks
//! these at commit time; the engine runs them first so every failure surfaces
//! as a specific [`GuardViolation`] before a transaction is submitted.

use super::entities::EscrowDeal;
use super::errors::GuardViolation;
use super::value_objects::EscrowStatus;
use shared_types::{Address, Amount, TokenId};

/// Guards for `create_escrow` that do not require ledger reads.
///
/// Ownership, the single-active-deal rule, and the KYC checks need the
/// ledger and are enforced by the service.
pub fn guard_create(
    seller: Address,
    buyer: Address,
    price: Amount,
) -> Result<(), GuardViolation> {
    if price.is_zero() {
        return Err(GuardViolation::ZeroPrice);
    }
    if buyer == seller {
        return Err(GuardViolation::BuyerIsSeller(buyer));
    }
    Ok(())
}

/// Guard: the caller owns the token under sale.
pub fn guard_token_owner(
    owner: Address,
    caller: Address,
    token_id: TokenId,
) -> Result<(), GuardViolation> {
    if owner != caller {
        return Err(GuardViolation::NotTokenOwner { caller, token_id });
    }
    Ok(())
}

/// Guard: no non-terminal deal exists for the token.
pub fn guard_no_active_deal(
    existing: Option<&EscrowDeal>,
    token_id: TokenId,
) -> Result<(), GuardViolation> {
    if existing.map(|d| d.is_active()).unwrap_or(false) {
        return Err(GuardViolation::EscrowExists(token_id));
    }
    Ok(())
}

/// Guards for `deposit_funds`: buyer only, exact `price + fee`, from Pending.
pub fn guard_deposit(
    deal: &EscrowDeal,
    caller: Address,
    amount: Amount,
    expected_total: Amount,
) -> Result<(), GuardViolation> {
    guard_status(deal, EscrowStatus::Funded)?;
    if caller != deal.buyer {
        return Err(GuardViolation::NotBuyer(caller));
    }
    if amount != expected_total {
        return Err(GuardViolation::WrongDepositAmount {
            expected: expected_total,
            got: amount,
        });
    }
    Ok(())
}

/// Guards for `cancel_escrow`: a party, before any deposit.
pub fn guard_cancel(deal: &EscrowDeal, caller: Address) -> Result<(), GuardViolation> {
    // A live deal holding funds is not cancellable; the escape hatch is a
    // refund. Checked ahead of the generic status guard so the caller learns
    // the real reason. Terminal deals still report the invalid transition.
    if deal.funds_deposited && !deal.status.is_terminal() {
        return Err(GuardViolation::FundsAlreadyDeposited(deal.token_id));
    }
    guard_status(deal, EscrowStatus::Cancelled)?;
    if !deal.is_party(caller) {
        return Err(GuardViolation::NotParty(caller));
    }
    Ok(())
}

/// Guards for `complete_deal` that do not require the KYC gate: a party,
/// from Funded. The KYC re-check happens in the service at completion time.
pub fn guard_complete(deal: &EscrowDeal, caller: Address) -> Result<(), GuardViolation> {
    guard_status(deal, EscrowStatus::Completed)?;
    if !deal.is_party(caller) {
        return Err(GuardViolation::NotParty(caller));
    }
    Ok(())
}

/// Guards for `refund_buyer`: seller only, from Funded.
pub fn guard_refund(deal: &EscrowDeal, caller: Address) -> Result<(), GuardViolation> {
    guard_status(deal, EscrowStatus::Refunded)?;
    if caller != deal.seller {
        return Err(GuardViolation::NotSeller(caller));
    }
    Ok(())
}

fn guard_status(deal: &EscrowDeal, next: EscrowStatus) -> Result<(), GuardViolation> {
    if !deal.status.can_transition_to(next) {
        return Err(GuardViolation::InvalidTransition {
            from: deal.status,
            to: next,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DealParams;

    fn seller() -> Address {
        "0x1111111111111111111111111111111111111111".parse().unwrap()
    }

    fn buyer() -> Address {
        "0x2222222222222222222222222222222222222222".parse().unwrap()
    }

    fn stranger() -> Address {
        "0x3333333333333333333333333333333333333333".parse().unwrap()
    }

    fn pending_deal() -> EscrowDeal {
        EscrowDeal::new(DealParams {
            token_id: TokenId(7),
            seller: seller(),
            buyer: buyer(),
            price: Amount::from(1_000_000u64),
            fee: Amount::from(25_000u64),
            created_at: 0,
        })
    }

    fn funded_deal() -> EscrowDeal {
        let mut deal = pending_deal();
        deal.transition_to(EscrowStatus::Funded).unwrap();
        deal
    }

    #[test]
    fn test_guard_create_zero_price() {
        assert_eq!(
            guard_create(seller(), buyer(), Amount::zero()),
            Err(GuardViolation::ZeroPrice)
        );
    }

    #[test]
    fn test_guard_create_self_sale() {
        assert!(matches!(
            guard_create(seller(), seller(), Amount::from(1u64)),
            Err(GuardViolation::BuyerIsSeller(_))
        ));
    }

    #[test]
    fn test_guard_no_active_deal_blocks_second_escrow() {
        let deal = pending_deal();
        assert_eq!(
            guard_no_active_deal(Some(&deal), TokenId(7)),
            Err(GuardViolation::EscrowExists(TokenId(7)))
        );
    }

    #[test]
    fn test_guard_no_active_deal_allows_after_terminal() {
        let mut deal = pending_deal();
        deal.transition_to(EscrowStatus::Cancelled).unwrap();
        assert!(guard_no_active_deal(Some(&deal), TokenId(7)).is_ok());
        assert!(guard_no_active_deal(None, TokenId(7)).is_ok());
    }

    #[test]
    fn test_guard_deposit_exact_amount_only() {
        let deal = pending_deal();
        let total = deal.total().unwrap();
        assert!(guard_deposit(&deal, buyer(), total, total).is_ok());
        // Underpayment and overpayment both rejected.
        assert!(matches!(
            guard_deposit(&deal, buyer(), total - Amount::from(1u64), total),
            Err(GuardViolation::WrongDepositAmount { .. })
        ));
        assert!(matches!(
            guard_deposit(&deal, buyer(), total + Amount::from(1u64), total),
            Err(GuardViolation::WrongDepositAmount { .. })
        ));
    }

    #[test]
    fn test_guard_deposit_seller_rejected() {
        let deal = pending_deal();
        let total = deal.total().unwrap();
        assert!(matches!(
            guard_deposit(&deal, seller(), total, total),
            Err(GuardViolation::NotBuyer(_))
        ));
    }

    #[test]
    fn test_guard_cancel_after_funding_names_deposit() {
        let deal = funded_deal();
        assert_eq!(
            guard_cancel(&deal, buyer()),
            Err(GuardViolation::FundsAlreadyDeposited(TokenId(7)))
        );
    }

    #[test]
    fn test_guard_cancel_terminal_deal_is_invalid_transition() {
        let mut deal = funded_deal();
        deal.transition_to(EscrowStatus::Completed).unwrap();
        assert!(matches!(
            guard_cancel(&deal, buyer()),
            Err(GuardViolation::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_guard_cancel_stranger_rejected() {
        let deal = pending_deal();
        assert!(matches!(
            guard_cancel(&deal, stranger()),
            Err(GuardViolation::NotParty(_))
        ));
    }

    #[test]
    fn test_guard_complete_needs_funded() {
        let deal = pending_deal();
        assert!(matches!(
            guard_complete(&deal, buyer()),
            Err(GuardViolation::InvalidTransition { .. })
        ));
        assert!(guard_complete(&funded_deal(), buyer()).is_ok());
        assert!(guard_complete(&funded_deal(), seller()).is_ok());
    }

    #[test]
    fn test_guard_refund_seller_only() {
        let deal = funded_deal();
        assert!(guard_refund(&deal, seller()).is_ok());
        assert!(matches!(
            guard_refund(&deal, buyer()),
            Err(GuardViolation::NotSeller(_))
        ));
    }
}
