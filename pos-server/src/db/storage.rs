//! redb-based document store
//!
//! # Tables
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `menu` | `id` | JSON-serialized `MenuItem` |
//! | `tables` | `id` | JSON-serialized `DiningTable` |
//! | `sales` | `(timestamp, id)` | JSON-serialized `SaleRecord` (append-only) |
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns and use
//! copy-on-write with an atomic pointer swap, so a crash never exposes a
//! half-applied transaction. Dropping a `WriteTransaction` without
//! committing aborts it; every multi-document operation relies on that.

use super::{ChangeKind, Collection, DocumentStore, StorageError, StorageResult, StoreEvent};
use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
};
use shared::models::menu_item::compare_menu_ids;
use shared::models::{DiningTable, MenuItem, SaleRecord, TablePatch};
use shared::util::now_millis;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Menu items: key = item id
const MENU_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("menu");

/// Dining tables: key = table id
const TABLES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tables");

/// Sales archive: key = (timestamp millis, sale id), iterated in reverse for newest-first
const SALES_TABLE: TableDefinition<(i64, &str), &[u8]> = TableDefinition::new("sales");

/// Change notification channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Document store backed by redb
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("db", &"<redb::Database>")
            .field("subscribers", &self.event_tx.receiver_count())
            .finish()
    }
}

impl RedbStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and demos)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(MENU_TABLE)?;
            let _ = write_txn.open_table(TABLES_TABLE)?;
            let _ = write_txn.open_table(SALES_TABLE)?;
        }
        write_txn.commit()?;

        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            db: Arc::new(db),
            event_tx,
        })
    }

    fn publish(&self, events: impl IntoIterator<Item = StoreEvent>) {
        for event in events {
            if self.event_tx.send(event).is_err() {
                // no live feeds attached
                tracing::trace!("Store event dropped: no subscribers");
                break;
            }
        }
    }

    /// Number of archived sales
    pub fn sales_count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SALES_TABLE)?;
        Ok(table.len()?)
    }
}

/// Decode a table document, if present
fn read_table_doc<T>(table: &T, id: &str) -> StorageResult<Option<DiningTable>>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    match table.get(id)? {
        Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
        None => Ok(None),
    }
}

impl DocumentStore for RedbStore {
    // ========== Menu ==========

    fn list_menu(&self) -> StorageResult<Vec<MenuItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_TABLE)?;

        let mut items = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let item: MenuItem = serde_json::from_slice(value.value())?;
            items.push(item);
        }

        items.sort_by(|a, b| compare_menu_ids(&a.id, &b.id));
        Ok(items)
    }

    fn replace_menu(&self, items: &[MenuItem]) -> StorageResult<usize> {
        let write_txn = self.db.begin_write()?;
        let stored = {
            let mut table = write_txn.open_table(MENU_TABLE)?;

            let mut old_keys = Vec::new();
            for result in table.iter()? {
                let (key, _value) = result?;
                old_keys.push(key.value().to_string());
            }
            for key in &old_keys {
                table.remove(key.as_str())?;
            }

            for item in items {
                let value = serde_json::to_vec(item)?;
                table.insert(item.id.as_str(), value.as_slice())?;
            }
            table.len()? as usize
        };
        write_txn.commit()?;

        tracing::info!(count = stored, "Menu replaced");
        self.publish([StoreEvent::replaced(Collection::Menu)]);
        Ok(stored)
    }

    // ========== Tables ==========

    fn insert_table(&self, dining_table: &DiningTable) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLES_TABLE)?;
            if table.get(dining_table.id.as_str())?.is_some() {
                return Err(StorageError::TableExists(dining_table.id.clone()));
            }
            let value = serde_json::to_vec(dining_table)?;
            table.insert(dining_table.id.as_str(), value.as_slice())?;
        }
        write_txn.commit()?;

        self.publish([StoreEvent::new(
            Collection::Tables,
            ChangeKind::Created,
            &dining_table.id,
        )]);
        Ok(())
    }

    fn get_table(&self, id: &str) -> StorageResult<Option<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLES_TABLE)?;
        read_table_doc(&table, id)
    }

    fn list_tables(&self) -> StorageResult<Vec<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLES_TABLE)?;

        let mut tables = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let dining_table: DiningTable = serde_json::from_slice(value.value())?;
            tables.push(dining_table);
        }

        tables.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(tables)
    }

    fn update_table(&self, id: &str, patch: TablePatch) -> StorageResult<DiningTable> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(TABLES_TABLE)?;
            let mut current =
                read_table_doc(&table, id)?.ok_or_else(|| StorageError::TableNotFound(id.to_string()))?;
            current.apply(patch, now_millis());
            let value = serde_json::to_vec(&current)?;
            table.insert(id, value.as_slice())?;
            current
        };
        write_txn.commit()?;

        self.publish([StoreEvent::new(Collection::Tables, ChangeKind::Updated, id)]);
        Ok(updated)
    }

    fn delete_table(&self, id: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLES_TABLE)?;
            let current =
                read_table_doc(&table, id)?.ok_or_else(|| StorageError::TableNotFound(id.to_string()))?;
            if current.is_occupied() {
                return Err(StorageError::TableOccupied(current.name));
            }
            table.remove(id)?;
        }
        write_txn.commit()?;

        self.publish([StoreEvent::new(Collection::Tables, ChangeKind::Deleted, id)]);
        Ok(())
    }

    // ========== Sales ==========

    fn list_sales(&self, limit: Option<usize>) -> StorageResult<Vec<SaleRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SALES_TABLE)?;

        let mut sales = Vec::new();
        for result in table.iter()?.rev().take(limit.unwrap_or(usize::MAX)) {
            let (_key, value) = result?;
            let sale: SaleRecord = serde_json::from_slice(value.value())?;
            sales.push(sale);
        }
        Ok(sales)
    }

    fn close_table(
        &self,
        table_id: &str,
        expected_revision: u64,
        sale: &SaleRecord,
    ) -> StorageResult<DiningTable> {
        let write_txn = self.db.begin_write()?;
        let reset = {
            let mut tables = write_txn.open_table(TABLES_TABLE)?;
            let mut current = read_table_doc(&tables, table_id)?
                .ok_or_else(|| StorageError::TableNotFound(table_id.to_string()))?;
            if current.revision != expected_revision {
                return Err(StorageError::Conflict {
                    table_id: table_id.to_string(),
                    expected: expected_revision,
                    actual: current.revision,
                });
            }

            let mut sales = write_txn.open_table(SALES_TABLE)?;
            let sale_value = serde_json::to_vec(sale)?;
            sales.insert((sale.timestamp, sale.id.as_str()), sale_value.as_slice())?;

            current.reset(now_millis());
            let table_value = serde_json::to_vec(&current)?;
            tables.insert(table_id, table_value.as_slice())?;
            current
        };
        write_txn.commit()?;

        self.publish([
            StoreEvent::new(Collection::Sales, ChangeKind::Created, &sale.id),
            StoreEvent::new(Collection::Tables, ChangeKind::Updated, table_id),
        ]);
        Ok(reset)
    }

    // ========== Notifications ==========

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }
}
