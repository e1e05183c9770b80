//! Colón display formatting
//!
//! Amounts render as `₡17 500` or `₡1 234,50`: whole amounts without
//! decimals, anything else with two, comma as decimal separator. Integer
//! parts under five digits are not grouped (`₡5000`).

use rust_decimal::prelude::*;

const SYMBOL: char = '₡';
const GROUP_SEPARATOR: char = ' ';
const DECIMAL_SEPARATOR: char = ',';
/// Shortest integer part that gets thousands separators
const MIN_GROUPING_DIGITS: usize = 5;

/// Format an amount in colones; non-finite input shows as `₡0`
pub fn format_colones(value: f64) -> String {
    let amount = if value.is_finite() {
        Decimal::from_f64(value).unwrap_or_default()
    } else {
        Decimal::ZERO
    };

    let whole = amount.fract().is_zero();
    let places = if whole { 0 } else { 2 };
    let rounded = amount
        .abs()
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);

    let mut out = String::new();
    if amount.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push(SYMBOL);

    let integer = rounded.trunc().to_u128().unwrap_or_default().to_string();
    out.push_str(&group_thousands(&integer));

    if !whole {
        let cents = (rounded.fract() * Decimal::ONE_HUNDRED)
            .to_u32()
            .unwrap_or_default();
        out.push(DECIMAL_SEPARATOR);
        out.push_str(&format!("{:02}", cents));
    }
    out
}

fn group_thousands(digits: &str) -> String {
    if digits.len() < MIN_GROUPING_DIGITS {
        return digits.to_string();
    }
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(ch);
    }
    grouped
}

/// Percentage with two decimals and comma separator, e.g. `11,5 %`
pub fn format_percent(value: f64) -> String {
    let amount = if value.is_finite() {
        Decimal::from_f64(value).unwrap_or_default()
    } else {
        Decimal::ZERO
    };
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{} %", rounded.to_string().replace('.', ","))
}
