//! Document store
//!
//! Three logical collections back the POS:
//!
//! | Collection | Key | Document | Read order |
//! |------------|-----|----------|------------|
//! | `menu` | item id | [`MenuItem`] | numeric id ascending |
//! | `tables` | table id | [`DiningTable`] | `created_at` ascending |
//! | `sales` | `(timestamp, id)` | [`SaleRecord`] | `timestamp` descending |
//!
//! [`DocumentStore`] is the seam the order lifecycle talks to; [`RedbStore`]
//! is the embedded implementation. Every committed write publishes a
//! [`StoreEvent`] so live feeds can re-query.

mod error;
mod storage;

pub use error::{StorageError, StorageResult};
pub use storage::RedbStore;

use shared::models::{DiningTable, MenuItem, SaleRecord, TablePatch};
use tokio::sync::broadcast;

/// Logical collection touched by a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Menu,
    Tables,
    Sales,
}

/// What happened to the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
    /// Whole collection replaced in one batch
    Replaced,
}

/// Change notification published after a successful commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub collection: Collection,
    pub kind: ChangeKind,
    /// Document id, absent for whole-collection changes
    pub id: Option<String>,
}

impl StoreEvent {
    pub fn new(collection: Collection, kind: ChangeKind, id: impl Into<String>) -> Self {
        Self {
            collection,
            kind,
            id: Some(id.into()),
        }
    }

    pub fn replaced(collection: Collection) -> Self {
        Self {
            collection,
            kind: ChangeKind::Replaced,
            id: None,
        }
    }
}

/// Persistence contract for the POS
///
/// Plain writes are independent; `close_table` and `replace_menu` are
/// all-or-nothing. Reads always reflect the last committed state.
pub trait DocumentStore: Send + Sync {
    // ========== Menu ==========

    /// Menu ordered by numeric id ascending
    fn list_menu(&self) -> StorageResult<Vec<MenuItem>>;

    /// Delete every menu item and insert `items` in a single transaction
    fn replace_menu(&self, items: &[MenuItem]) -> StorageResult<usize>;

    // ========== Tables ==========

    fn insert_table(&self, table: &DiningTable) -> StorageResult<()>;

    fn get_table(&self, id: &str) -> StorageResult<Option<DiningTable>>;

    /// Tables ordered by creation time ascending
    fn list_tables(&self) -> StorageResult<Vec<DiningTable>>;

    /// Apply a partial update and return the stored result
    ///
    /// No version check: concurrent updates are last-write-wins.
    fn update_table(&self, id: &str, patch: TablePatch) -> StorageResult<DiningTable>;

    /// Delete a table that holds no items
    ///
    /// Fails with [`StorageError::TableOccupied`] when the stored table has
    /// items; the check and the delete share one transaction.
    fn delete_table(&self, id: &str) -> StorageResult<()>;

    // ========== Sales ==========

    /// Sales ordered by timestamp descending, optionally capped
    fn list_sales(&self, limit: Option<usize>) -> StorageResult<Vec<SaleRecord>>;

    /// Archive `sale` and reset the table in one transaction
    ///
    /// Aborts with [`StorageError::Conflict`] when the table's revision is no
    /// longer `expected_revision`, and with [`StorageError::TableNotFound`]
    /// when the table is gone. On error nothing is written.
    fn close_table(
        &self,
        table_id: &str,
        expected_revision: u64,
        sale: &SaleRecord,
    ) -> StorageResult<DiningTable>;

    // ========== Notifications ==========

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}
