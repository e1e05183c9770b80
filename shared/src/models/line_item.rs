//! Line Item Model

use super::menu_item::MenuItem;
use super::serde_helpers::lenient_price;
use serde::{Deserialize, Serialize};

/// One instance of a menu item on a table's open order
///
/// `instance_id` is the only thing that tells two otherwise identical items
/// apart; it is unique within the table's current item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(alias = "id")]
    pub menu_item_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    pub instance_id: String,
}

impl LineItem {
    /// Snapshot a menu item at the given (already resolved) price
    pub fn from_menu_item(item: &MenuItem, price: f64, instance_id: impl Into<String>) -> Self {
        Self {
            menu_item_id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            price,
            instance_id: instance_id.into(),
        }
    }
}
