//! # Monetary Amounts
//!
//! Amounts are integers in minor units (wei). `U256` matches the value range
//! of the external ledger; fixed-point or float representations are never
//! used, and human-readable units are derived at presentation time only.

use crate::errors::ParseError;
use primitive_types::U256;

/// Minor-unit monetary amount.
pub type Amount = U256;

/// Parse a base-10 minor-unit amount, as received from API callers.
///
/// `U256`'s own serde encoding is hexadecimal; the REST boundary speaks
/// decimal strings, so boundary code funnels through here.
pub fn parse_amount(s: &str) -> Result<Amount, ParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidAmount(s.to_string()));
    }
    U256::from_dec_str(trimmed).map_err(|_| ParseError::InvalidAmount(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_decimal() {
        assert_eq!(parse_amount("0").unwrap(), U256::zero());
        assert_eq!(
            parse_amount("1000000000000000000").unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );
    }

    #[test]
    fn test_parse_amount_rejects_non_decimal() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("1.5").is_err());
        assert!(parse_amount("0x10").is_err());
        assert!(parse_amount("12abc").is_err());
    }

    #[test]
    fn test_amount_display_is_decimal() {
        let amount = parse_amount("1025000000000000000").unwrap();
        assert_eq!(amount.to_string(), "1025000000000000000");
    }
}
