//! PDF invoices for storefront orders.
//!
//! [`render_invoice`] lays out a single A4 page from an
//! [`OrderSummary`](parfum_core::OrderSummary) and the storefront profile.
//! Rendering is pure and deterministic: the same order produces the same
//! bytes.

mod layout;
pub mod pdf;

pub use layout::render_invoice;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Two-decimal money text. A missing amount prints as `0.00`.
#[must_use]
pub fn format_amount(amount: Option<Decimal>) -> String {
    let value = amount
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let value = if value.is_zero() { Decimal::ZERO } else { value };
    format!("{value:.2}")
}

/// Convert a float total from an untyped source. NaN and infinities have no
/// decimal value and come back as `None`.
#[must_use]
pub fn amount_from_f64(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_always_have_two_decimals() {
        assert_eq!(format_amount(Some(Decimal::new(80, 0))), "80.00");
        assert_eq!(format_amount(Some(Decimal::new(795, 1))), "79.50");
        assert_eq!(format_amount(Some(Decimal::new(133_933, 4))), "13.39");
        assert_eq!(format_amount(Some(Decimal::new(1_005, 3))), "1.01");
    }

    #[test]
    fn missing_amount_renders_zero() {
        assert_eq!(format_amount(None), "0.00");
    }

    #[test]
    fn nan_renders_zero_never_nan() {
        let rendered = format_amount(amount_from_f64(f64::NAN));
        assert_eq!(rendered, "0.00");
        assert!(!rendered.contains("NaN"));
        assert_eq!(format_amount(amount_from_f64(f64::INFINITY)), "0.00");
    }

    #[test]
    fn negative_zero_is_plain_zero() {
        assert_eq!(format_amount(Some(Decimal::new(-1, 3))), "0.00");
    }
}
