//! Rounding of decimal amounts to whole currency units.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the nearest whole unit, halves away from zero.
///
/// Values outside the `i64` range saturate.
///
/// ```
/// use payroll_engine::calculation::round_to_won;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_to_won(Decimal::new(2085, 1)), 209);
/// assert_eq!(round_to_won(Decimal::new(-25, 1)), -3);
/// ```
pub fn round_to_won(value: Decimal) -> i64 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Rounds hours to a whole number of hours, halves away from zero.
pub fn round_hours(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// `round(amount * rate)` for a whole-unit amount.
pub fn apply_rate(amount: i64, rate: Decimal) -> i64 {
    round_to_won(saturating_mul(Decimal::from(amount), rate))
}

/// `a * b`, clamped to the `Decimal` range.
pub(crate) fn saturating_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(if a.is_sign_negative() != b.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// `a + b`, clamped to the `Decimal` range.
pub(crate) fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(if a.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// Sum of whole-unit amounts, clamped to the `i64` range.
pub(crate) fn sum_won(amounts: impl IntoIterator<Item = i64>) -> i64 {
    amounts.into_iter().fold(0, i64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        assert_eq!(round_to_won(dec("0.5")), 1);
        assert_eq!(round_to_won(dec("1.5")), 2);
        assert_eq!(round_to_won(dec("2.5")), 3);
        assert_eq!(round_to_won(dec("2.4999")), 2);
    }

    #[test]
    fn test_round_hours() {
        assert_eq!(round_hours(dec("208.56")), dec("209"));
        assert_eq!(round_hours(dec("104.28")), dec("104"));
    }

    #[test]
    fn test_apply_rate() {
        assert_eq!(apply_rate(3_000_000, dec("0.03545")), 106_350);
        assert_eq!(apply_rate(106_350, dec("0.1281")), 13_623);
        assert_eq!(apply_rate(0, dec("0.045")), 0);
    }

    #[test]
    fn test_saturates_out_of_range() {
        assert_eq!(round_to_won(Decimal::MAX), i64::MAX);
        assert_eq!(round_to_won(Decimal::MIN), i64::MIN);
    }

    #[test]
    fn test_decimal_arithmetic_clamps_instead_of_panicking() {
        assert_eq!(saturating_mul(Decimal::MAX, dec("1.5")), Decimal::MAX);
        assert_eq!(saturating_mul(Decimal::MAX, dec("-2")), Decimal::MIN);
        assert_eq!(saturating_mul(dec("2.5"), dec("4")), dec("10"));
        assert_eq!(saturating_add(Decimal::MAX, Decimal::ONE), Decimal::MAX);
        assert_eq!(saturating_add(Decimal::MIN, dec("-1")), Decimal::MIN);
        assert_eq!(apply_rate(i64::MAX, Decimal::MAX), i64::MAX);
    }

    #[test]
    fn test_sum_won_clamps_to_i64() {
        assert_eq!(sum_won([1, 2, 3]), 6);
        assert_eq!(sum_won([i64::MAX, 1, 1]), i64::MAX);
        assert_eq!(sum_won(std::iter::empty()), 0);
    }
}
