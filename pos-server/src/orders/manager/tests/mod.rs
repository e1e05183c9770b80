use super::*;
use crate::db::{RedbStore, StorageError, StorageResult, StoreEvent};
use crate::orders::ids::SequentialIdGenerator;
use parking_lot::Mutex;
use shared::models::TableStatus;
use tokio::sync::broadcast;

mod test_close;

fn create_test_manager() -> (OrdersManager, RedbStore) {
    let store = RedbStore::open_in_memory().unwrap();
    let manager = OrdersManager::new(
        Arc::new(store.clone()),
        Arc::new(SequentialIdGenerator::new("id")),
    );
    (manager, store)
}

fn menu_item(id: &str, name: &str, price: f64) -> MenuItem {
    MenuItem::new(id, name, "Platos", price)
}

// ========================================================================
// Helper: create a table and fill it with fixed-price items
// ========================================================================

fn table_with_items(manager: &OrdersManager, name: &str, items: &[MenuItem]) -> DiningTable {
    let table = manager.create_table(name).unwrap();
    for item in items {
        manager.add_item(&table.id, item, None).unwrap();
    }
    manager.store().get_table(&table.id).unwrap().unwrap()
}

/// Store wrapper that lets another till touch the table right before a close
/// commits, so the close sees a stale revision.
struct InterferingStore {
    inner: RedbStore,
    interferences_left: Mutex<u32>,
    close_calls: Mutex<u32>,
}

impl InterferingStore {
    fn new(inner: RedbStore, interferences: u32) -> Self {
        Self {
            inner,
            interferences_left: Mutex::new(interferences),
            close_calls: Mutex::new(0),
        }
    }

    fn close_calls(&self) -> u32 {
        *self.close_calls.lock()
    }
}

impl DocumentStore for InterferingStore {
    fn list_menu(&self) -> StorageResult<Vec<MenuItem>> {
        self.inner.list_menu()
    }

    fn replace_menu(&self, items: &[MenuItem]) -> StorageResult<usize> {
        self.inner.replace_menu(items)
    }

    fn insert_table(&self, table: &DiningTable) -> StorageResult<()> {
        self.inner.insert_table(table)
    }

    fn get_table(&self, id: &str) -> StorageResult<Option<DiningTable>> {
        self.inner.get_table(id)
    }

    fn list_tables(&self) -> StorageResult<Vec<DiningTable>> {
        self.inner.list_tables()
    }

    fn update_table(&self, id: &str, patch: TablePatch) -> StorageResult<DiningTable> {
        self.inner.update_table(id, patch)
    }

    fn delete_table(&self, id: &str) -> StorageResult<()> {
        self.inner.delete_table(id)
    }

    fn list_sales(&self, limit: Option<usize>) -> StorageResult<Vec<SaleRecord>> {
        self.inner.list_sales(limit)
    }

    fn close_table(
        &self,
        table_id: &str,
        expected_revision: u64,
        sale: &SaleRecord,
    ) -> StorageResult<DiningTable> {
        *self.close_calls.lock() += 1;
        {
            let mut left = self.interferences_left.lock();
            if *left > 0 {
                *left -= 1;
                // Another till adds a late item between read and commit
                let current = self
                    .inner
                    .get_table(table_id)?
                    .ok_or_else(|| StorageError::TableNotFound(table_id.to_string()))?;
                let mut items = current.items;
                items.push(LineItem::from_menu_item(
                    &MenuItem::new("99", "Postre", "Postres", 1000.0),
                    1000.0,
                    format!("late-{}", *left),
                ));
                self.inner.update_table(table_id, TablePatch::items(items))?;
            }
        }
        self.inner.close_table(table_id, expected_revision, sale)
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.subscribe()
    }
}
