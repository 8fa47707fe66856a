//! Coupons
//!
//! The recognized coupon codes and their discount rules. A discount is
//! always a function of the current subtotal, so recomputing after a cart
//! edit yields the up-to-date value: percentage rules scale, and the fixed
//! first-purchase rule is re-clamped against the new subtotal.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};

/// Ceiling of the first-purchase discount in minor units (R$ 10,00).
const FIRST_PURCHASE_CAP_MINOR: i64 = 1_000;

/// A recognized coupon code mapped to its discount rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coupon {
    /// `VILA10`: 10% of the subtotal.
    Vila10,

    /// `PRIMEIRACOMPRA`: the whole subtotal, capped at R$ 10,00.
    PrimeiraCompra,

    /// `BLACK`: 20% of the subtotal.
    Black,
}

impl Coupon {
    /// Match a code case-insensitively against the recognized set.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "VILA10" => Some(Coupon::Vila10),
            "PRIMEIRACOMPRA" => Some(Coupon::PrimeiraCompra),
            "BLACK" => Some(Coupon::Black),
            _ => None,
        }
    }

    /// Canonical code, as echoed in the order message.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Coupon::Vila10 => "VILA10",
            Coupon::PrimeiraCompra => "PRIMEIRACOMPRA",
            Coupon::Black => "BLACK",
        }
    }

    /// Discount for the given subtotal, in minor units.
    #[must_use]
    pub fn discount_minor(self, subtotal_minor: i64) -> i64 {
        match self {
            Coupon::Vila10 => percent_of_minor(Percentage::from(0.1), subtotal_minor),
            Coupon::PrimeiraCompra => subtotal_minor.min(FIRST_PURCHASE_CAP_MINOR),
            Coupon::Black => percent_of_minor(Percentage::from(0.2), subtotal_minor),
        }
    }
}

/// Calculate a percentage of a minor unit amount, rounding half away from zero.
fn percent_of_minor(percent: Percentage, minor: i64) -> i64 {
    let amount = Decimal::from_i64(minor).unwrap_or(Decimal::ZERO);

    (percent * amount)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}
