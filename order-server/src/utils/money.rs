//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored as `f64`. Every multiplication and sum goes through
//! `Decimal` and is rounded to 2 decimal places (half-up) before converting
//! back. Arithmetic is checked: an amount that does not fit is an error,
//! never a panic and never a silent zero.

use rust_decimal::prelude::*;
use thiserror::Error;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price of a menu item
pub const MAX_PRICE: f64 = shared::models::MAX_MENU_PRICE;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MoneyError {
    #[error("amount must be a finite number, got {0}")]
    NotFinite(f64),

    #[error("price must be between 0 and {max}, got {0}", max = MAX_PRICE)]
    PriceOutOfRange(f64),

    #[error("amount does not fit in a decimal: {0}")]
    OutOfRange(f64),

    #[error("amount overflowed")]
    Overflow,
}

/// Convert a stored amount to `Decimal`
pub fn to_decimal(value: f64) -> Result<Decimal, MoneyError> {
    if !value.is_finite() {
        return Err(MoneyError::NotFinite(value));
    }
    Decimal::from_f64(value).ok_or(MoneyError::OutOfRange(value))
}

/// Round to money precision and convert back for storage
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// `unit_price × quantity`; the unit price must lie in `0..=MAX_PRICE`
pub fn line_total(unit_price: f64, quantity: i64) -> Result<f64, MoneyError> {
    let price = to_decimal(unit_price)?;
    if !(0.0..=MAX_PRICE).contains(&unit_price) {
        return Err(MoneyError::PriceOutOfRange(unit_price));
    }
    price
        .checked_mul(Decimal::from(quantity))
        .map(to_f64)
        .ok_or(MoneyError::Overflow)
}

/// Sum of amounts
pub fn sum<I>(amounts: I) -> Result<f64, MoneyError>
where
    I: IntoIterator<Item = f64>,
{
    sum_decimal(amounts).map(to_f64)
}

/// Sum of amounts without converting back
pub fn sum_decimal<I>(amounts: I) -> Result<Decimal, MoneyError>
where
    I: IntoIterator<Item = f64>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(to_decimal(amount)?)
            .ok_or(MoneyError::Overflow)
    })
}

/// `true` when both amounts are equal at money precision
///
/// Amounts that cannot be represented never compare equal.
pub fn amounts_equal(a: f64, b: f64) -> bool {
    match (to_decimal(a), to_decimal(b)) {
        (Ok(a), Ok(b)) => to_f64(a) == to_f64(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_is_exact() {
        assert_eq!(line_total(50.0, 2), Ok(100.0));
        assert_eq!(line_total(0.1, 3), Ok(0.3));
        assert_eq!(line_total(19.99, 3), Ok(59.97));
        assert_eq!(line_total(MAX_PRICE, 9999), Ok(9_999_000_000.0));
    }

    #[test]
    fn line_total_rejects_unrepresentable_prices() {
        assert_eq!(line_total(1e25, 9999), Err(MoneyError::PriceOutOfRange(1e25)));
        assert_eq!(line_total(1e30, 1), Err(MoneyError::OutOfRange(1e30)));
        assert_eq!(line_total(-1.0, 1), Err(MoneyError::PriceOutOfRange(-1.0)));
        assert!(matches!(line_total(f64::NAN, 1), Err(MoneyError::NotFinite(_))));
    }

    #[test]
    fn sum_avoids_float_drift() {
        assert_eq!(sum([0.1, 0.2]), Ok(0.3));
        assert_eq!(sum(Vec::<f64>::new()), Ok(0.0));
    }

    #[test]
    fn sum_reports_overflow() {
        assert_eq!(sum([7.0e28, 7.0e28]), Err(MoneyError::Overflow));
        assert_eq!(sum([f64::INFINITY]), Err(MoneyError::NotFinite(f64::INFINITY)));
    }

    #[test]
    fn equality_at_cent_precision() {
        assert!(amounts_equal(0.1 + 0.2, 0.3));
        assert!(!amounts_equal(10.0, 10.01));
        assert!(!amounts_equal(f64::NAN, f64::NAN));
    }
}
