//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` (rounded to 2 decimal places, half away from zero) for storage and
//! serialization.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use shared::models::serde_helpers::sanitize_price;
use shared::models::{LineItem, PaymentMethod};

/// Rounding precision for monetary values
const DECIMAL_PLACES: u32 = 2;

/// Card surcharge (13%), applied only when paying by card
pub const CARD_SURCHARGE_RATE: Decimal = Decimal::from_parts(13, 0, 0, false, 2);

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert a stored price to Decimal
///
/// Non-finite or negative values contribute nothing.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    if !value.is_finite() || value < 0.0 {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert a unit price to Decimal
///
/// Prices outside `0..=MAX_PRICE` contribute nothing.
#[inline]
pub fn price_to_decimal(price: f64) -> Decimal {
    to_decimal(sanitize_price(price))
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

#[inline]
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Subtotal, card surcharge and total of an order
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl Totals {
    /// Surcharge share of the total, in percent (2 dp); 0 for an empty order
    pub fn surcharge_share(&self) -> f64 {
        let total = to_decimal(self.total);
        if total.is_zero() {
            return 0.0;
        }
        to_f64(to_decimal(self.tax) / total * Decimal::ONE_HUNDRED)
    }
}

/// Sum of item prices
pub fn subtotal(items: &[LineItem]) -> Decimal {
    let sum = items
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc.saturating_add(price_to_decimal(item.price)));
    round_money(sum)
}

/// Card surcharge on a subtotal for the given payment method
pub fn card_tax(subtotal: Decimal, payment: PaymentMethod) -> Decimal {
    if payment.is_card() {
        round_money(subtotal.saturating_mul(CARD_SURCHARGE_RATE))
    } else {
        Decimal::ZERO
    }
}

/// Compute subtotal, surcharge and total
///
/// Pure: identical input always yields identical output. `total` is the
/// sum of the already-rounded subtotal and surcharge, so the three stored
/// figures always add up.
pub fn compute_totals(items: &[LineItem], payment: PaymentMethod) -> Totals {
    let subtotal = subtotal(items);
    let tax = card_tax(subtotal, payment);
    let total = subtotal.saturating_add(tax);

    Totals {
        subtotal: to_f64(subtotal),
        tax: to_f64(tax),
        total: to_f64(total),
    }
}

/// Whether two amounts are equal within a cent
pub fn money_eq(a: f64, b: f64) -> bool {
    (to_decimal_signed(a) - to_decimal_signed(b)).abs() < MONEY_TOLERANCE
}

#[inline]
fn to_decimal_signed(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::serde_helpers::MAX_PRICE;

    fn item(menu_id: &str, price: f64) -> LineItem {
        LineItem {
            menu_item_id: menu_id.into(),
            name: format!("Item {}", menu_id),
            category: "Test".into(),
            price,
            instance_id: format!("{}-{}", menu_id, price),
        }
    }

    fn order() -> Vec<LineItem> {
        vec![item("1", 5000.0), item("1", 5000.0), item("9", 7500.0)]
    }

    #[test]
    fn test_cash_has_no_surcharge() {
        let totals = compute_totals(&order(), PaymentMethod::Cash);
        assert_eq!(totals.subtotal, 17500.0);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.total, 17500.0);
    }

    #[test]
    fn test_card_surcharge() {
        let totals = compute_totals(&order(), PaymentMethod::Card);
        assert_eq!(totals.subtotal, 17500.0);
        assert_eq!(totals.tax, 2275.0);
        assert_eq!(totals.total, 19775.0);
    }

    #[test]
    fn test_only_card_is_taxed() {
        for method in PaymentMethod::ALL {
            let totals = compute_totals(&order(), method);
            let expected = if method == PaymentMethod::Card { 2275.0 } else { 0.0 };
            assert_eq!(totals.tax, expected, "method {}", method);
            assert!(money_eq(totals.total, totals.subtotal + totals.tax));
        }
    }

    #[test]
    fn test_empty_order() {
        let totals = compute_totals(&[], PaymentMethod::Card);
        assert_eq!(totals, Totals::default());
        assert_eq!(totals.surcharge_share(), 0.0);
    }

    #[test]
    fn test_malformed_prices_contribute_zero() {
        let items = vec![item("1", f64::NAN), item("2", -50.0), item("3", f64::INFINITY), item("4", 1000.0)];
        let totals = compute_totals(&items, PaymentMethod::Cash);
        assert_eq!(totals.subtotal, 1000.0);
    }

    #[test]
    fn test_huge_prices_contribute_zero() {
        let items = vec![item("1", 5e28), item("2", 5e28), item("3", 1e300), item("4", 2500.0)];

        let cash = compute_totals(&items, PaymentMethod::Cash);
        let card = compute_totals(&items, PaymentMethod::Card);

        assert_eq!(cash.total, 2500.0);
        assert_eq!(card.subtotal, 2500.0);
        assert_eq!(card.tax, 325.0);
    }

    #[test]
    fn test_many_items_at_price_cap() {
        let items: Vec<_> = (0..1000).map(|i| item(&i.to_string(), MAX_PRICE)).collect();

        let totals = compute_totals(&items, PaymentMethod::Card);

        assert_eq!(totals.subtotal, 100_000_000_000.0);
        assert_eq!(totals.tax, 13_000_000_000.0);
        assert_eq!(totals.total, 113_000_000_000.0);
    }

    #[test]
    fn test_fractional_amounts_round_half_away_from_zero() {
        // 0.05 * 0.13 = 0.0065 -> 0.01
        let totals = compute_totals(&[item("1", 0.05)], PaymentMethod::Card);
        assert_eq!(totals.tax, 0.01);
        assert_eq!(totals.total, 0.06);

        let totals = compute_totals(&[item("1", 0.1), item("2", 0.2)], PaymentMethod::Cash);
        assert_eq!(totals.subtotal, 0.3);
    }

    #[test]
    fn test_deterministic() {
        let a = compute_totals(&order(), PaymentMethod::Card);
        let b = compute_totals(&order(), PaymentMethod::Card);
        assert_eq!(a, b);
    }

    #[test]
    fn test_surcharge_share() {
        let totals = compute_totals(&order(), PaymentMethod::Card);
        // 2275 / 19775 = 11.504...%
        assert_eq!(totals.surcharge_share(), 11.5);
    }
}
