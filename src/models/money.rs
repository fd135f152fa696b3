//! Conversions between stored minor units and the decimal numbers used at
//! the JSON and form boundaries.

use serde::Serializer;

/// Serializes an amount held in cents as a decimal JSON number.
pub fn serialize_cents<S>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(cents_to_decimal(*cents))
}

pub fn cents_to_decimal(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Parses a user-entered decimal amount ("12.50", "12,50", "  7 ") into
/// cents. Returns `None` for anything that is not a finite number.
pub fn parse_amount_cents(input: &str) -> Option<i64> {
    let normalized = input.trim().replace(',', ".");
    let amount: f64 = normalized.parse().ok()?;
    if !amount.is_finite() {
        return None;
    }
    let cents = (amount * 100.0).round();
    if cents.abs() > i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}
