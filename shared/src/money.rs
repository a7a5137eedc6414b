//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts travel as `f64` on the wire and in the store. Arithmetic is done in
//! `Decimal` and converted back, rounded to 2 decimal places (half away from zero).

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal; non-finite input becomes zero
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// `quantity × unit_price + tax`, rounded to cents.
///
/// `None` when the amount does not fit a `Decimal`.
pub fn line_total(quantity: i64, unit_price: f64, tax: f64) -> Option<f64> {
    Decimal::from(quantity)
        .checked_mul(to_decimal(unit_price))?
        .checked_add(to_decimal(tax))
        .map(to_f64)
}

/// Round to whole currency units (half away from zero)
pub fn round_whole(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Sum amounts without accumulating float error; saturates at `Decimal::MAX`
pub fn sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    to_f64(
        values
            .into_iter()
            .map(to_decimal)
            .fold(Decimal::ZERO, Decimal::saturating_add),
    )
}
