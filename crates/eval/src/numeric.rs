//! Money and rate arithmetic using `rust_decimal`.
//!
//! Amounts are rounded to cents with `RoundingStrategy::MidpointNearestEven`.
//! Rates are kept exact. No `f64` anywhere in the evaluation path.
//! Arithmetic saturates instead of panicking: out-of-range inputs are not
//! validated by the engine, but they must never abort an evaluation.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Number of decimal places kept for money amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Round an amount to cents.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// `amount × rate`, rounded to cents.
pub fn apply_rate(amount: Decimal, rate: Decimal) -> Decimal {
    round_currency(amount.saturating_mul(rate))
}

/// `quantity × unit_cost`, unrounded.
pub fn times(quantity: Decimal, unit_cost: Decimal) -> Decimal {
    quantity.saturating_mul(unit_cost)
}

/// Saturating sum of a sequence of amounts.
pub fn sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Clamp a rate into `[0, ceiling]`, never above 1.
pub fn cap_rate(rate: Decimal, ceiling: Decimal) -> Decimal {
    rate.min(ceiling).min(Decimal::ONE).max(Decimal::ZERO)
}

/// `max(0, min(values))`. An empty slice yields zero.
pub fn clamp_min(values: &[Decimal]) -> Decimal {
    values
        .iter()
        .copied()
        .min()
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}

/// Render a rate as a percentage, e.g. `0.55` → `55%`.
pub fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

/// Render an amount with exactly two decimals, e.g. `1200` → `1200.00`.
pub fn money(value: Decimal) -> String {
    let mut rounded = round_currency(value);
    rounded.rescale(CURRENCY_SCALE);
    rounded.to_string()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn rounding_is_bankers() {
        assert_eq!(round_currency(dec("10.125")), dec("10.12"));
        assert_eq!(round_currency(dec("10.135")), dec("10.14"));
        assert_eq!(round_currency(dec("-3.005")), dec("-3.00"));
    }

    #[test]
    fn apply_rate_rounds_to_cents() {
        assert_eq!(apply_rate(dec("12345.67"), dec("0.65")), dec("8024.69"));
        assert_eq!(apply_rate(dec("100000"), dec("0.4")), dec("40000"));
    }

    #[test]
    fn apply_rate_saturates_on_overflow() {
        let huge = Decimal::MAX;
        assert_eq!(apply_rate(huge, dec("2")), round_currency(Decimal::MAX));
    }

    #[test]
    fn sum_of_empty_is_zero() {
        assert_eq!(sum(Vec::new()), Decimal::ZERO);
        assert_eq!(sum(vec![dec("1.10"), dec("2.20")]), dec("3.30"));
    }

    #[test]
    fn cap_rate_bounds() {
        assert_eq!(cap_rate(dec("0.80"), dec("0.65")), dec("0.65"));
        assert_eq!(cap_rate(dec("1.20"), dec("2")), Decimal::ONE);
        assert_eq!(cap_rate(dec("-0.1"), dec("0.65")), Decimal::ZERO);
        assert_eq!(cap_rate(dec("0.40"), dec("0.65")), dec("0.40"));
    }

    #[test]
    fn clamp_min_floors_at_zero() {
        assert_eq!(clamp_min(&[dec("5"), dec("3"), dec("9")]), dec("3"));
        assert_eq!(clamp_min(&[dec("5"), dec("-3")]), Decimal::ZERO);
        assert_eq!(clamp_min(&[]), Decimal::ZERO);
    }

    #[test]
    fn display_helpers() {
        assert_eq!(percent(dec("0.55")), "55%");
        assert_eq!(percent(dec("0.125")), "12.5%");
        assert_eq!(percent(Decimal::ONE), "100%");
        assert_eq!(money(dec("1200")), "1200.00");
        assert_eq!(money(dec("0.005")), "0.00");
    }
}
