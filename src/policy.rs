// src/policy.rs
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// True when a decoded amount meets the configured lower limit.
pub fn qualifies(amount: Decimal, lower_limit: Decimal) -> bool {
    amount >= lower_limit
}

/// Convert an integer amount in the chain's smallest unit into token units.
/// Returns None when the value does not fit a `Decimal`.
pub fn from_base_units(value: u128, decimals: u32) -> Option<Decimal> {
    let value = Decimal::from_u128(value)?;
    let scale = Decimal::from_u128(10u128.pow(decimals))?;
    Some(value / scale)
}

/// Same conversion from the decimal-string form the source APIs use.
/// Returns None when the string is not a plain unsigned integer.
pub fn parse_base_units(raw: &str, decimals: u32) -> Option<Decimal> {
    from_base_units(raw.parse().ok()?, decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_inclusive() {
        let limit = Decimal::from(1_000_000);
        assert!(qualifies(Decimal::from(1_000_000), limit));
        assert!(qualifies(Decimal::from(2_000_000), limit));
        assert!(!qualifies(Decimal::from(999_999), limit));
    }

    #[test]
    fn staking_balance_converts_from_18_decimals() {
        // 5 ASTR in planck is far below a 1,000,000 limit
        let amount = parse_base_units("5000000000000000000", 18).unwrap();
        assert_eq!(amount, Decimal::from(5));
        assert!(!qualifies(amount, Decimal::from(1_000_000)));
    }

    #[test]
    fn ton_value_converts_from_nanotons() {
        let limit = Decimal::from(10_000);

        let small = from_base_units(15_000_000_000, 9).unwrap();
        assert_eq!(small, Decimal::from(15));
        assert!(!qualifies(small, limit));

        let large = from_base_units(15_000_000_000_000, 9).unwrap();
        assert_eq!(large, Decimal::from(15_000));
        assert!(qualifies(large, limit));
    }

    #[test]
    fn garbage_amounts_are_rejected() {
        assert!(parse_base_units("", 18).is_none());
        assert!(parse_base_units("-5", 18).is_none());
        assert!(parse_base_units("0x10", 18).is_none());
    }
}
