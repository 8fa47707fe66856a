//! Prices
//!
//! Localized `R$` price strings. The menu displays amounts as `R$ 1.234,56`
//! (dot thousands separator, decimal comma) and the order message renders
//! them back the same way, so parsing and formatting round-trip.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Currency marker carried by every display price.
const CURRENCY_MARKER: &str = "R$";

/// Errors that can occur while parsing a display price.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// The string did not contain a parseable amount.
    #[error("invalid price string: {0}")]
    InvalidPrice(String),
}

/// Parse a display price such as `"R$ 6,50"` or `"R$ 1.234,56"` into minor units.
///
/// Thousands separators are removed before the decimal comma is substituted;
/// in the other order any four-digit amount parses wrong.
///
/// # Errors
///
/// Returns [`PriceError::InvalidPrice`] if the remaining text is not a valid
/// decimal amount or does not fit in minor units.
pub fn parse_display_price(s: &str) -> Result<i64, PriceError> {
    let normalized = s.replace(CURRENCY_MARKER, "").replace('.', "").replace(',', ".");

    let amount = normalized
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidPrice(s.to_string()))?;

    amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| PriceError::InvalidPrice(s.to_string()))
}

/// Parse a display price straight into a [`Money`] value.
///
/// # Errors
///
/// Returns [`PriceError::InvalidPrice`] as [`parse_display_price`] does.
pub fn parse_display_money(
    s: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PriceError> {
    Ok(Money::from_minor(parse_display_price(s)?, currency))
}

/// Render a money value as the storefront does: `R$ 1.234,56`.
#[must_use]
pub fn format_price(money: &Money<'_, Currency>) -> String {
    format_minor(money.to_minor_units())
}

/// Render minor units as a display price.
#[must_use]
pub fn format_minor(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    let units = group_thousands(abs / 100);
    let cents = abs % 100;

    format!("{sign}{CURRENCY_MARKER} {units},{cents:02}")
}

/// Insert dot separators every three digits, from the right.
fn group_thousands(units: u64) -> String {
    let digits = units.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::BRL;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_plain_amount() -> TestResult {
        assert_eq!(parse_display_price("R$ 6,50")?, 650);

        Ok(())
    }

    #[test]
    fn parses_amount_with_thousands_separator() -> TestResult {
        assert_eq!(parse_display_price("R$ 1.234,56")?, 123_456);

        Ok(())
    }

    #[test]
    fn parses_menu_price() -> TestResult {
        assert_eq!(parse_display_price("R$ 54,90")?, 5490);

        Ok(())
    }

    #[test]
    fn parses_without_marker_or_cents() -> TestResult {
        assert_eq!(parse_display_price("12,00")?, 1200);
        assert_eq!(parse_display_price("R$ 12")?, 1200);

        Ok(())
    }

    #[test]
    fn rejects_garbage() {
        let result = parse_display_price("R$ muito");

        assert!(matches!(result, Err(PriceError::InvalidPrice(_))));
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            parse_display_price(""),
            Err(PriceError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_into_money() -> TestResult {
        let money = parse_display_money("R$ 54,90", BRL)?;

        assert_eq!(money, Money::from_minor(5490, BRL));

        Ok(())
    }

    #[test]
    fn formats_small_amount() {
        assert_eq!(format_minor(650), "R$ 6,50");
    }

    #[test]
    fn formats_amount_with_thousands_separator() {
        assert_eq!(format_minor(123_456), "R$ 1.234,56");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_minor(0), "R$ 0,00");
    }

    #[test]
    fn formats_negative_amount() {
        assert_eq!(format_minor(-550), "-R$ 5,50");
    }

    #[test]
    fn formats_seven_digit_units() {
        assert_eq!(format_minor(123_456_789_00), "R$ 123.456.789,00");
    }

    #[test]
    fn format_then_parse_round_trips() -> TestResult {
        for minor in [1, 99, 100, 650, 5490, 123_456, 9_999_999] {
            assert_eq!(parse_display_price(&format_minor(minor))?, minor);
        }

        Ok(())
    }
}
