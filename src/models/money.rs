//! Amounts are stored as integer cents and exchanged as decimal numbers.

use serde::Serializer;

/// Largest accepted amount in either direction, in cents. Totals of many
/// such amounts still fit in an `i64`.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000_000;

/// Convert a decimal amount to cents, rounding to the nearest cent.
/// Returns `None` for NaN, infinities and amounts beyond [`MAX_AMOUNT_CENTS`].
pub fn to_cents(amount: f64) -> Option<i64> {
    if !amount.is_finite() {
        return None;
    }
    let cents = (amount * 100.0).round();
    if cents.abs() > MAX_AMOUNT_CENTS as f64 {
        return None;
    }
    Some(cents as i64)
}

/// Sum of cent amounts, saturating at the `i64` bounds.
pub fn sum_cents<I: IntoIterator<Item = i64>>(amounts: I) -> i64 {
    amounts
        .into_iter()
        .fold(0, |total: i64, cents| total.saturating_add(cents))
}

pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn serialize_cents<S: Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(from_cents(*cents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cents_rounds() {
        assert_eq!(to_cents(12.345), Some(1235));
        assert_eq!(to_cents(-0.1), Some(-10));
        assert_eq!(to_cents(3000.0), Some(300000));
    }

    #[test]
    fn test_to_cents_rejects_non_finite() {
        assert_eq!(to_cents(f64::NAN), None);
        assert_eq!(to_cents(f64::INFINITY), None);
        assert_eq!(to_cents(1e300), None);
    }

    #[test]
    fn test_to_cents_bounds() {
        assert_eq!(to_cents(1e13), Some(MAX_AMOUNT_CENTS));
        assert_eq!(to_cents(-1e13), Some(-MAX_AMOUNT_CENTS));
        assert_eq!(to_cents(5e16), None);
        assert_eq!(to_cents(-5e16), None);
    }

    #[test]
    fn test_sum_cents_saturates() {
        assert_eq!(sum_cents([150, -50, 25]), 125);
        assert_eq!(sum_cents(Vec::<i64>::new()), 0);
        assert_eq!(sum_cents([i64::MAX, 1]), i64::MAX);
        assert_eq!(sum_cents([i64::MIN, -1]), i64::MIN);
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(from_cents(150050), 1500.5);
        assert_eq!(from_cents(-999), -9.99);
    }
}
