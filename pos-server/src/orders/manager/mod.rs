//! OrdersManager - table state machine and order closing
//!
//! Tables move between `free` and `occupied` purely as a consequence of
//! their item list; every mutation re-derives status through
//! [`TableStatus::derive`](shared::models::TableStatus::derive) inside
//! [`DiningTable::apply`].
//!
//! # Close Flow
//!
//! ```text
//! close_order(table_id)
//!     ├─ 1. Re-read the persisted table (never the caller's copy)
//!     ├─ 2. Missing → TableNotFound, nothing written
//!     ├─ 3. compute_totals(items, payment)
//!     ├─ 4. store.close_table(id, revision, sale)
//!     │      one transaction: append sale + reset table
//!     ├─ 5. Revision moved → TransactionConflict → back to 1
//!     │      (bounded by max_close_retries)
//!     └─ 6. Return the archived SaleRecord
//! ```
//!
//! Plain item and payment updates are read-modify-write without a version
//! check, so two tills editing the same table concurrently resolve as
//! last-write-wins.

mod error;
pub use error::*;

use super::cart::{self, CartGroup};
use super::ids::IdGenerator;
use super::money::compute_totals;
use super::view::TableView;
use crate::db::DocumentStore;
use shared::models::{
    DiningTable, LineItem, MenuItem, PaymentMethod, SaleRecord, TablePatch,
    serde_helpers::{MAX_PRICE, sanitize_price},
};
use shared::util::now_millis;
use std::sync::Arc;

/// Default number of extra close attempts after a conflict
pub const DEFAULT_CLOSE_RETRIES: u32 = 3;

/// Attempts to find an instance id not already on the table
const MAX_ID_ATTEMPTS: usize = 16;

/// OrdersManager for table and order operations
pub struct OrdersManager {
    store: Arc<dyn DocumentStore>,
    ids: Arc<dyn IdGenerator>,
    max_close_retries: u32,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("store", &"<DocumentStore>")
            .field("max_close_retries", &self.max_close_retries)
            .finish()
    }
}

impl OrdersManager {
    pub fn new(store: Arc<dyn DocumentStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store,
            ids,
            max_close_retries: DEFAULT_CLOSE_RETRIES,
        }
    }

    /// Override how many times a conflicting close is retried
    pub fn with_close_retries(mut self, retries: u32) -> Self {
        self.max_close_retries = retries;
        self
    }

    /// Get the underlying store
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    fn load_table(&self, table_id: &str) -> ManagerResult<DiningTable> {
        self.store
            .get_table(table_id)?
            .ok_or_else(|| ManagerError::TableNotFound(table_id.to_string()))
    }

    // ========== Tables ==========

    /// Create a free table with an empty order
    pub fn create_table(&self, name: &str) -> ManagerResult<DiningTable> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ManagerError::EmptyTableName);
        }

        let table = DiningTable::new(self.ids.next_id(), name, now_millis());
        self.store.insert_table(&table)?;
        tracing::info!(table_id = %table.id, name = %table.name, "Table created");
        Ok(table)
    }

    /// Delete a table that has no open order
    pub fn delete_table(&self, table_id: &str) -> ManagerResult<()> {
        match self.store.delete_table(table_id) {
            Ok(()) => {
                tracing::info!(table_id = %table_id, "Table deleted");
                Ok(())
            }
            Err(e) => {
                let err = ManagerError::from(e);
                if matches!(err, ManagerError::TableOccupied(_)) {
                    tracing::warn!(table_id = %table_id, "Refused to delete occupied table");
                }
                Err(err)
            }
        }
    }

    /// Current state of a table with groups and totals
    pub fn table_view(&self, table_id: &str) -> ManagerResult<TableView> {
        Ok(TableView::derive(&self.load_table(table_id)?))
    }

    // ========== Items ==========

    /// Add one instance of `menu_item` to the table
    ///
    /// Variable-price items (price 0) need `override_price`, resolved by the
    /// caller beforehand. For fixed-price items the override is ignored.
    pub fn add_item(
        &self,
        table_id: &str,
        menu_item: &MenuItem,
        override_price: Option<f64>,
    ) -> ManagerResult<LineItem> {
        let price = resolve_price(menu_item, override_price)?;
        let table = self.load_table(table_id)?;

        let instance_id = self.fresh_instance_id(&table)?;
        let item = LineItem::from_menu_item(menu_item, price, instance_id);

        let mut items = table.items;
        items.push(item.clone());
        let updated = self.store.update_table(table_id, TablePatch::items(items))?;

        tracing::debug!(
            table_id = %table_id,
            menu_item_id = %item.menu_item_id,
            instance_id = %item.instance_id,
            price = item.price,
            status = ?updated.status,
            "Item added"
        );
        Ok(item)
    }

    fn fresh_instance_id(&self, table: &DiningTable) -> ManagerResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !table.items.iter().any(|item| item.instance_id == id) {
                return Ok(id);
            }
        }
        Err(ManagerError::Internal(format!(
            "could not generate a unique item id for table {}",
            table.id
        )))
    }

    /// Remove the item with `instance_id`; absent ids are a no-op
    pub fn remove_item(&self, table_id: &str, instance_id: &str) -> ManagerResult<Option<LineItem>> {
        let table = self.load_table(table_id)?;
        let mut items = table.items;

        let Some(pos) = items.iter().position(|item| item.instance_id == instance_id) else {
            tracing::debug!(table_id = %table_id, instance_id = %instance_id, "Item already gone");
            return Ok(None);
        };
        let removed = items.remove(pos);
        self.persist_items(table_id, items)?;
        Ok(Some(removed))
    }

    /// Remove the oldest instance of a cart group
    pub fn remove_one(&self, table_id: &str, group: &CartGroup) -> ManagerResult<Option<LineItem>> {
        let table = self.load_table(table_id)?;
        let mut items = table.items;

        let Some(removed) = cart::remove_one(&mut items, group) else {
            return Ok(None);
        };
        self.persist_items(table_id, items)?;
        Ok(Some(removed))
    }

    fn persist_items(&self, table_id: &str, items: Vec<LineItem>) -> ManagerResult<DiningTable> {
        let updated = self.store.update_table(table_id, TablePatch::items(items))?;
        tracing::debug!(
            table_id = %table_id,
            items = updated.items.len(),
            status = ?updated.status,
            "Items updated"
        );
        Ok(updated)
    }

    /// Choose how the table pays; items are untouched
    pub fn set_payment_method(
        &self,
        table_id: &str,
        method: PaymentMethod,
    ) -> ManagerResult<DiningTable> {
        let updated = self
            .store
            .update_table(table_id, TablePatch::payment(method))?;
        tracing::debug!(table_id = %table_id, payment = %method, "Payment method set");
        Ok(updated)
    }

    // ========== Close ==========

    /// Archive the table's order as a sale and reset the table
    pub fn close_order(&self, table_id: &str) -> ManagerResult<SaleRecord> {
        let mut attempt: u32 = 0;
        loop {
            match self.try_close_order(table_id) {
                Err(ManagerError::TransactionConflict(_)) if attempt < self.max_close_retries => {
                    attempt += 1;
                    tracing::warn!(
                        table_id = %table_id,
                        attempt,
                        max_retries = self.max_close_retries,
                        "Table changed while closing, retrying with fresh state"
                    );
                }
                Err(e) => {
                    tracing::error!(table_id = %table_id, error = %e, "Close order failed");
                    return Err(e);
                }
                Ok(sale) => return Ok(sale),
            }
        }
    }

    fn try_close_order(&self, table_id: &str) -> ManagerResult<SaleRecord> {
        let table = self.load_table(table_id)?;
        let totals = compute_totals(&table.items, table.payment);
        let now = now_millis();

        let sale = SaleRecord {
            id: self.ids.next_id(),
            timestamp: now,
            table_id: table.id.clone(),
            table_name: table.name.clone(),
            items: table.items.clone(),
            subtotal: totals.subtotal,
            card_tax: totals.tax,
            total: totals.total,
            payment_method: table.payment,
            created_at: now,
        };

        self.store.close_table(table_id, table.revision, &sale)?;

        tracing::info!(
            table_id = %table_id,
            sale_id = %sale.id,
            items = sale.items.len(),
            total = sale.total,
            payment = %sale.payment_method,
            "Order closed"
        );
        Ok(sale)
    }
}

/// Price the item will be sold at
fn resolve_price(menu_item: &MenuItem, override_price: Option<f64>) -> ManagerResult<f64> {
    if !menu_item.is_variable_price() {
        return Ok(sanitize_price(menu_item.price));
    }
    match override_price {
        None => Err(ManagerError::PriceRequired(menu_item.id.clone())),
        Some(price) if !price.is_finite() || !(0.0..=MAX_PRICE).contains(&price) => {
            Err(ManagerError::InvalidPrice(price))
        }
        Some(price) => Ok(price),
    }
}

#[cfg(test)]
mod tests;
