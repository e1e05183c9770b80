//! Lenient serde helpers for documents written by older clients
//!
//! Stored prices have been seen as numbers, numeric strings, `null` or
//! missing entirely. Anything that is not a finite number in
//! `0..=MAX_PRICE` decodes as `0.0` so that malformed data contributes
//! nothing to totals instead of failing the whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Largest accepted unit price
pub const MAX_PRICE: f64 = 100_000_000.0;

/// Deserialize a price, degrading malformed values to `0.0`
pub fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| price_from_value(&v)).unwrap_or(0.0))
}

/// Interpret a JSON value as a price
pub fn price_from_value(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    };
    sanitize_price(raw.unwrap_or(0.0))
}

/// Clamp a raw price to the valid domain (finite, non-negative, at most `MAX_PRICE`)
pub fn sanitize_price(price: f64) -> f64 {
    if price.is_finite() && (0.0..=MAX_PRICE).contains(&price) {
        price
    } else {
        0.0
    }
}

/// Parse the longest numeric prefix of `text`
///
/// Leading whitespace is skipped and trailing text ignored, so
/// `"5000 colones"` reads as `5000`. Returns `None` when no digit starts
/// the text.
pub fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}
