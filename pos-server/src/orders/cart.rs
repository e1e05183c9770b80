//! Cart aggregation
//!
//! Groups a table's flat item list into display rows keyed by
//! `(menu_item_id, price)`. The same menu item sold at two different prices
//! (a variable-price special) yields two rows. Groups are a view: they are
//! recomputed from the item list on every read and never stored.

use super::money::{price_to_decimal, to_f64};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::LineItem;
use std::collections::HashMap;

/// Quantity group of identical line items
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartGroup {
    pub menu_item_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub qty: usize,
    /// Contributing instances, oldest first
    pub instance_ids: Vec<String>,
}

impl CartGroup {
    fn start(item: &LineItem) -> Self {
        Self {
            menu_item_id: item.menu_item_id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            price: item.price,
            qty: 0,
            instance_ids: Vec::new(),
        }
    }

    /// Instance removed by "remove one": the oldest added
    pub fn first_instance(&self) -> Option<&str> {
        self.instance_ids.first().map(String::as_str)
    }

    /// `price × qty`
    pub fn line_total(&self) -> f64 {
        to_f64(price_to_decimal(self.price).saturating_mul(Decimal::from(self.qty)))
    }
}

/// Grouping key; `-0.0` and `0.0` share a group
fn price_key(price: f64) -> u64 {
    if price == 0.0 { 0 } else { price.to_bits() }
}

/// Group items, preserving order of first appearance
pub fn group_items(items: &[LineItem]) -> Vec<CartGroup> {
    let mut groups: Vec<CartGroup> = Vec::new();
    let mut index: HashMap<(&str, u64), usize> = HashMap::new();

    for item in items {
        let key = (item.menu_item_id.as_str(), price_key(item.price));
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(CartGroup::start(item));
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.qty += 1;
        group.instance_ids.push(item.instance_id.clone());
    }

    groups
}

/// Remove the oldest instance of `group` from `items`
///
/// Returns the removed item, or `None` when the group is empty or its first
/// instance is no longer in the list.
pub fn remove_one(items: &mut Vec<LineItem>, group: &CartGroup) -> Option<LineItem> {
    let target = group.first_instance()?;
    let pos = items.iter().position(|item| item.instance_id == target)?;
    Some(items.remove(pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(menu_id: &str, price: f64, instance: &str) -> LineItem {
        LineItem {
            menu_item_id: menu_id.into(),
            name: format!("Item {}", menu_id),
            category: "Test".into(),
            price,
            instance_id: instance.into(),
        }
    }

    #[test]
    fn test_groups_by_id_and_price() {
        let items = vec![
            item("1", 5000.0, "a"),
            item("9", 7500.0, "b"),
            item("1", 5000.0, "c"),
            item("99", 12000.0, "d"),
            item("99", 8000.0, "e"),
        ];
        let groups = group_items(&items);

        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0].menu_item_id, "1");
        assert_eq!(groups[0].qty, 2);
        assert_eq!(groups[0].instance_ids, vec!["a", "c"]);
        assert_eq!(groups[1].menu_item_id, "9");
        assert_eq!(groups[2].price, 12000.0);
        assert_eq!(groups[3].price, 8000.0);
    }

    #[test]
    fn test_quantities_conserve_item_count() {
        let items = vec![
            item("1", 5000.0, "a"),
            item("1", 5000.0, "b"),
            item("2", 100.0, "c"),
            item("1", 5000.0, "d"),
        ];
        let groups = group_items(&items);
        assert_eq!(groups.iter().map(|g| g.qty).sum::<usize>(), items.len());
        for group in &groups {
            assert_eq!(group.instance_ids.len(), group.qty);
        }
    }

    #[test]
    fn test_remove_one_targets_oldest() {
        let mut items = vec![
            item("1", 5000.0, "a"),
            item("2", 100.0, "b"),
            item("1", 5000.0, "c"),
        ];
        let group = group_items(&items).remove(0);

        let removed = remove_one(&mut items, &group).unwrap();
        assert_eq!(removed.instance_id, "a");

        let regrouped = group_items(&items);
        let ones = regrouped.iter().find(|g| g.menu_item_id == "1").unwrap();
        assert_eq!(ones.qty, group.qty - 1);
        assert_eq!(ones.instance_ids, vec!["c"]);
    }

    #[test]
    fn test_remove_one_stale_group_is_noop() {
        let mut items = vec![item("1", 5000.0, "a")];
        let mut group = group_items(&items).remove(0);
        group.instance_ids = vec!["gone".into()];
        assert!(remove_one(&mut items, &group).is_none());
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_line_total() {
        let items = vec![item("1", 5000.0, "a"), item("1", 5000.0, "b")];
        assert_eq!(group_items(&items)[0].line_total(), 10000.0);
    }

    #[test]
    fn test_line_total_ignores_out_of_range_price() {
        let items = vec![item("1", 5e28, "a"), item("1", 5e28, "b")];
        assert_eq!(group_items(&items)[0].line_total(), 0.0);
    }

    #[test]
    fn test_empty() {
        assert!(group_items(&[]).is_empty());
    }
}
