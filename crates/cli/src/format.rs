//! Italian-locale rendering of amounts and rates.

use rust_decimal::Decimal;
use termico_eval::numeric::{percent, round_currency, CURRENCY_SCALE};

/// Format an amount as `1.234,56 €`: dot thousands separator, comma
/// decimal separator, two decimals, symbol after the number.
pub fn currency(value: Decimal, symbol: &str) -> String {
    let mut rounded = round_currency(value);
    rounded.rescale(CURRENCY_SCALE);
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit as char);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{},{} {}", sign, grouped, frac_part, symbol)
}

/// Format a rate as an Italian percentage, e.g. `0.125` → `12,5%`.
pub fn rate(value: Decimal) -> String {
    percent(value).replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn thousands_and_decimals() {
        assert_eq!(currency(dec("1234.56"), "€"), "1.234,56 €");
        assert_eq!(currency(dec("1234567.8"), "€"), "1.234.567,80 €");
        assert_eq!(currency(dec("999"), "€"), "999,00 €");
        assert_eq!(currency(Decimal::ZERO, "€"), "0,00 €");
    }

    #[test]
    fn rounds_half_even() {
        assert_eq!(currency(dec("0.125"), "EUR"), "0,12 EUR");
        assert_eq!(currency(dec("100000.005"), "€"), "100.000,00 €");
    }

    #[test]
    fn negative_amounts_keep_sign() {
        assert_eq!(currency(dec("-1500"), "€"), "-1.500,00 €");
    }

    #[test]
    fn rates() {
        assert_eq!(rate(dec("0.65")), "65%");
        assert_eq!(rate(dec("0.125")), "12,5%");
    }
}
