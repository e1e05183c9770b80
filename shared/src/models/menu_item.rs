//! Menu Item Model

use super::serde_helpers::lenient_price;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Menu entry (reference data, replaced only in bulk)
///
/// A price of `0` marks a variable-price item whose price is entered at
/// sale time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
}

impl MenuItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
        }
    }

    /// Whether the price must be supplied when the item is sold
    pub fn is_variable_price(&self) -> bool {
        self.price == 0.0
    }
}

/// Menu ordering: numeric ids ascending, then non-numeric ids lexicographically
pub fn compare_menu_ids(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_price() {
        assert!(MenuItem::new("99", "Especial", "Especial", 0.0).is_variable_price());
        assert!(!MenuItem::new("1", "Ensalada", "Ensaladas", 5000.0).is_variable_price());
    }

    #[test]
    fn test_numeric_id_order() {
        let mut ids = vec!["10", "2", "b", "1", "a"];
        ids.sort_by(|a, b| compare_menu_ids(a, b));
        assert_eq!(ids, vec!["1", "2", "10", "a", "b"]);
    }
}
