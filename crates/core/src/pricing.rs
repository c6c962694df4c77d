//! Price validation for bulk price overwrites.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CoreError;

/// Upper bound for any catalog price.
pub const MAX_PRICE: f64 = 100_000.0;

/// Prices are stored in whole cents.
const DECIMAL_PLACES: u32 = 2;

/// Validate a price and round it to cents (half away from zero).
///
/// Rounding happens on the shortest decimal form of the input, so a typed
/// `1.005` becomes `1.01` even though its binary value is slightly below.
/// Returns the value that should be written to the database.
pub fn normalize_price(price: f64) -> Result<f64, CoreError> {
    if !price.is_finite() {
        return Err(CoreError::Validation(format!(
            "Price must be a finite number, got {price}"
        )));
    }
    if price < 0.0 {
        return Err(CoreError::Validation(format!(
            "Price must not be negative, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(CoreError::Validation(format!(
            "Price {price} exceeds maximum of {MAX_PRICE}"
        )));
    }
    let decimal = price.to_string().parse::<Decimal>().map_err(|e| {
        CoreError::Validation(format!("Price {price} is not a decimal number: {e}"))
    })?;
    decimal
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .ok_or_else(|| CoreError::Validation(format!("Price {price} cannot be represented")))
}

/// Format a price for console output.
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn keeps_cents() {
        assert_eq!(normalize_price(19.99).unwrap(), 19.99);
        assert_eq!(normalize_price(0.0).unwrap(), 0.0);
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(normalize_price(12.346).unwrap(), 12.35);
        assert_eq!(normalize_price(12.344).unwrap(), 12.34);
        assert_eq!(normalize_price(9.999).unwrap(), 10.0);
    }

    #[test]
    fn half_cents_round_away_from_zero() {
        assert_eq!(normalize_price(1.005).unwrap(), 1.01);
        assert_eq!(normalize_price(2.675).unwrap(), 2.68);
        assert_eq!(normalize_price(8.345).unwrap(), 8.35);
        assert_eq!(normalize_price(0.125).unwrap(), 0.13);
    }

    #[test]
    fn rejects_negative() {
        assert_matches!(normalize_price(-1.0), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_non_finite() {
        assert_matches!(normalize_price(f64::NAN), Err(CoreError::Validation(_)));
        assert_matches!(normalize_price(f64::INFINITY), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_above_maximum() {
        assert_matches!(normalize_price(MAX_PRICE + 0.01), Err(CoreError::Validation(_)));
        assert_eq!(normalize_price(MAX_PRICE).unwrap(), MAX_PRICE);
    }

    #[test]
    fn formatting() {
        assert_eq!(format_price(5.0), "5.00");
        assert_eq!(format_price(24.5), "24.50");
    }
}
