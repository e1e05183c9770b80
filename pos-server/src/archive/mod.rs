//! Sales Archive - read side of closed orders
//!
//! Sales are only ever appended by
//! [`OrdersManager::close_order`](crate::orders::OrdersManager::close_order);
//! this service reads them back for the history screen and for export.

use crate::data_transfer::{ExportError, ExportScope, export_sales, render_sales_csv, select_sales};
use crate::db::{DocumentStore, StorageResult};
use chrono_tz::Tz;
use shared::models::SaleRecord;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default size of the recent-sales window
pub const DEFAULT_RECENT_LIMIT: usize = 50;

#[derive(Clone)]
pub struct SalesArchive {
    store: Arc<dyn DocumentStore>,
    recent_limit: usize,
    tz: Tz,
}

impl std::fmt::Debug for SalesArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesArchive")
            .field("recent_limit", &self.recent_limit)
            .field("tz", &self.tz)
            .finish()
    }
}

impl SalesArchive {
    pub fn new(store: Arc<dyn DocumentStore>, recent_limit: usize, tz: Tz) -> Self {
        Self {
            store,
            recent_limit,
            tz,
        }
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Every sale, newest first
    pub fn all(&self) -> StorageResult<Vec<SaleRecord>> {
        self.store.list_sales(None)
    }

    /// The newest `recent_limit` sales
    pub fn recent(&self) -> StorageResult<Vec<SaleRecord>> {
        self.store.list_sales(Some(self.recent_limit))
    }

    /// Export text for `scope`
    pub fn export_text(&self, scope: ExportScope) -> Result<String, ExportError> {
        let sales = self.all()?;
        render_sales_csv(&select_sales(&sales, scope, self.tz), self.tz)
    }

    /// Write the export for `scope` into `dir`
    pub fn export_to_dir(&self, scope: ExportScope, dir: &Path) -> Result<PathBuf, ExportError> {
        let sales = self.all()?;
        export_sales(&sales, scope, self.tz, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RedbStore;
    use chrono::{TimeZone, Utc};
    use shared::models::{DiningTable, PaymentMethod};

    const TZ: Tz = chrono_tz::America::Costa_Rica;

    fn seeded(count: i64) -> (SalesArchive, RedbStore) {
        let store = RedbStore::open_in_memory().unwrap();
        let table = DiningTable::new("t1", "Mesa 1", 0);
        store.insert_table(&table).unwrap();

        let base = TZ
            .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .unwrap()
            .timestamp_millis();
        for i in 0..count {
            let current = store.get_table("t1").unwrap().unwrap();
            let ts = base + i * 60_000;
            let sale = SaleRecord {
                id: format!("s{}", i),
                timestamp: ts,
                table_id: "t1".into(),
                table_name: "Mesa 1".into(),
                items: Vec::new(),
                subtotal: 0.0,
                card_tax: 0.0,
                total: 0.0,
                payment_method: PaymentMethod::Cash,
                created_at: ts,
            };
            store.close_table("t1", current.revision, &sale).unwrap();
        }
        (SalesArchive::new(Arc::new(store.clone()), 3, TZ), store)
    }

    #[test]
    fn test_recent_window() {
        let (archive, _store) = seeded(5);

        let recent = archive.recent().unwrap();

        let ids: Vec<_> = recent.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s4", "s3", "s2"]);
        assert_eq!(archive.all().unwrap().len(), 5);
    }

    #[test]
    fn test_export_reads_whole_archive() {
        let (archive, _store) = seeded(5);

        let text = archive.export_text(ExportScope::All).unwrap();

        // header + every sale, not just the recent window
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn test_same_day_export_empty() {
        let (archive, _store) = seeded(2);
        let other_day = TZ
            .with_ymd_and_hms(2025, 6, 2, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc);

        let err = archive.export_text(ExportScope::SameDay(other_day)).unwrap_err();

        assert!(matches!(err, ExportError::NothingToExport));
    }

    #[test]
    fn test_export_empty_archive() {
        let (archive, _store) = seeded(0);
        let dir = tempfile::tempdir().unwrap();

        let err = archive.export_to_dir(ExportScope::All, dir.path()).unwrap_err();

        assert!(matches!(err, ExportError::NothingToExport));
    }
}
