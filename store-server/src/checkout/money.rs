//! Money calculation utilities using rust_decimal for precision
//!
//! All cart and order arithmetic is done using `Decimal` internally,
//! then converted to `f64` for storage/serialization.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per item (₹10,000,000)
pub const MAX_PRICE: f64 = 10_000_000.0;
/// Maximum allowed quantity per cart line
pub const MAX_QUANTITY: i32 = 9999;

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Round a monetary amount to 2 decimal places (half-up)
pub fn round2(value: f64) -> f64 {
    to_decimal(value)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Line total: quantity × unit price
pub fn line_total(unit_price: f64, quantity: i32) -> f64 {
    (to_decimal(unit_price) * Decimal::from(quantity))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Sum a series of amounts without accumulating float error
pub fn sum(amounts: impl IntoIterator<Item = f64>) -> f64 {
    amounts
        .into_iter()
        .map(to_decimal)
        .sum::<Decimal>()
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Subtract `b` from `a` (a − b), rounded
pub fn sub(a: f64, b: f64) -> f64 {
    (to_decimal(a) - to_decimal(b))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Add two amounts, rounded
pub fn add(a: f64, b: f64) -> f64 {
    (to_decimal(a) + to_decimal(b))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Convert a major-unit amount to minor currency units (paise)
/// for the payment gateway
pub fn to_minor_units(amount: f64) -> i64 {
    (to_decimal(amount) * Decimal::from(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(100.0, 2), 200.0);
        assert_eq!(line_total(0.1, 3), 0.3); // no float drift
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.005), 10.01);
        assert_eq!(round2(10.004), 10.0);
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(320.0), 32000);
        assert_eq!(to_minor_units(99.99), 9999);
        assert_eq!(to_minor_units(0.0), 0);
    }

    #[test]
    fn test_sum_without_drift() {
        assert_eq!(sum([0.1, 0.2]), 0.3);
    }
}
