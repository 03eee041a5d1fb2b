//! Discounts
//!
//! Percentage arithmetic shared by line discounts and coupons. Every helper truncates toward
//! zero and never returns a negative amount.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};

/// Converts percent points (e.g. `10` for 10%) into a fractional [`Percentage`], clamping the
/// points to `[0, 100]` first.
pub fn clamped_percentage(points: Decimal) -> Percentage {
    let points = points.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    Percentage::from(points / Decimal::ONE_HUNDRED)
}

/// Returns `floor(minor × percent)`, clamped to be non-negative.
pub fn percent_of_minor(percent: Percentage, minor: i64) -> i64 {
    floor_to_minor((percent * Decimal::ONE).saturating_mul(Decimal::from(minor)))
}

/// Returns `floor(minor × (1 − percent))`, clamped to be non-negative.
pub fn discounted_by_percent(percent: Percentage, minor: i64) -> i64 {
    let remaining = Decimal::ONE - (percent * Decimal::ONE);

    floor_to_minor(remaining.saturating_mul(Decimal::from(minor)))
}

/// Truncates a decimal amount to whole minor units, clamped to be non-negative.
pub fn floor_to_minor(value: Decimal) -> i64 {
    if value <= Decimal::ZERO {
        return 0;
    }

    value.floor().to_i64().unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn clamped_percentage_caps_points_at_one_hundred() {
        let percent = clamped_percentage(Decimal::from(250));

        assert_eq!(percent, Percentage::from(Decimal::ONE));
    }

    #[test]
    fn clamped_percentage_raises_negative_points_to_zero() {
        let percent = clamped_percentage(Decimal::from(-5));

        assert_eq!(percent, Percentage::from(Decimal::ZERO));
    }

    #[test]
    fn percent_of_minor_truncates_instead_of_rounding() -> TestResult {
        let percent = clamped_percentage(Decimal::from_str("15")?);

        // 999 × 0.15 = 149.85
        assert_eq!(percent_of_minor(percent, 999), 149);

        Ok(())
    }

    #[test]
    fn discounted_by_percent_truncates_the_remaining_amount() -> TestResult {
        let percent = clamped_percentage(Decimal::from_str("7")?);

        // 1_001 × 0.93 = 930.93
        assert_eq!(discounted_by_percent(percent, 1_001), 930);

        Ok(())
    }

    #[test]
    fn discounted_by_percent_is_exact_for_decimal_points() -> TestResult {
        let percent = clamped_percentage(Decimal::from_str("7")?);

        assert_eq!(discounted_by_percent(percent, 100), 93);

        Ok(())
    }

    #[test]
    fn floor_to_minor_never_goes_negative() -> TestResult {
        assert_eq!(floor_to_minor(Decimal::from_str("-12.5")?), 0);
        assert_eq!(floor_to_minor(Decimal::from_str("12.99")?), 12);

        Ok(())
    }
}
