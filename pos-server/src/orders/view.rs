//! Derived views for the presentation layer
//!
//! Built fresh from each table snapshot. Nothing here is persisted, and the
//! stored `status` field is never trusted: it is derived again from items.

use super::cart::{CartGroup, group_items};
use super::money::{Totals, compute_totals};
use serde::Serialize;
use shared::models::{DiningTable, TableStatus};

/// Everything the order screen shows for one table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub table: DiningTable,
    pub status: TableStatus,
    pub groups: Vec<CartGroup>,
    pub totals: Totals,
}

impl TableView {
    pub fn derive(table: &DiningTable) -> Self {
        Self {
            status: TableStatus::derive(&table.items),
            groups: group_items(&table.items),
            totals: compute_totals(&table.items, table.payment),
            table: table.clone(),
        }
    }
}

/// One tile on the floor plan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub id: String,
    pub name: String,
    pub status: TableStatus,
    pub item_count: usize,
    /// Running subtotal before any card surcharge
    pub subtotal: f64,
    /// Only empty tables offer deletion
    pub deletable: bool,
}

impl TableSummary {
    pub fn derive(table: &DiningTable) -> Self {
        let status = TableStatus::derive(&table.items);
        Self {
            id: table.id.clone(),
            name: table.name.clone(),
            status,
            item_count: table.items.len(),
            subtotal: compute_totals(&table.items, table.payment).subtotal,
            deletable: status == TableStatus::Free,
        }
    }
}

/// Floor plan in store order
pub fn summarize(tables: &[DiningTable]) -> Vec<TableSummary> {
    tables.iter().map(TableSummary::derive).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{LineItem, PaymentMethod};

    fn table_with(prices: &[f64], payment: PaymentMethod) -> DiningTable {
        let mut table = DiningTable::new("t1", "Mesa 1", 1);
        table.items = prices
            .iter()
            .enumerate()
            .map(|(i, price)| LineItem {
                menu_item_id: "1".into(),
                name: "Ensalada".into(),
                category: "Ensaladas".into(),
                price: *price,
                instance_id: format!("i{}", i),
            })
            .collect();
        table.payment = payment;
        table
    }

    #[test]
    fn test_view_rederives_status() {
        let mut table = table_with(&[5000.0], PaymentMethod::Card);
        table.status = TableStatus::Free; // stale document
        let view = TableView::derive(&table);
        assert_eq!(view.status, TableStatus::Occupied);
        assert_eq!(view.totals.total, 5650.0);
        assert_eq!(view.groups.len(), 1);
    }

    #[test]
    fn test_summary() {
        let summaries = summarize(&[
            table_with(&[5000.0, 5000.0], PaymentMethod::Card),
            table_with(&[], PaymentMethod::Cash),
        ]);
        assert_eq!(summaries[0].subtotal, 10000.0);
        assert_eq!(summaries[0].status, TableStatus::Occupied);
        assert!(!summaries[0].deletable);
        assert!(summaries[1].deletable);
        assert_eq!(summaries[1].item_count, 0);
    }
}
