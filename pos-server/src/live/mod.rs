//! Live Feeds - continuous snapshot subscriptions
//!
//! ```text
//! DocumentStore (broadcast StoreEvent)
//!        │
//!        └── LiveFeeds
//!               ├── watch ──► Subscription<Vec<DiningTable>>  (tables)
//!               ├── watch ──► Subscription<Vec<MenuItem>>     (menu)
//!               └── watch ──► Subscription<Vec<SaleRecord>>   (recent sales)
//! ```
//!
//! Each feed re-queries its collection on every relevant event and
//! publishes the full ordered snapshot. Consumers re-derive their views
//! from the snapshot instead of patching previous state. A lagged feed
//! simply re-queries, since the next snapshot supersedes whatever was
//! missed.

use crate::db::{Collection, DocumentStore, StorageResult};
use shared::models::{DiningTable, MenuItem, SaleRecord};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// Live view of one collection; unsubscribes when dropped
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T: Clone> Subscription<T> {
    /// Latest snapshot
    pub fn current(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot; `None` once the feed has stopped
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Invoke `callback` with the current snapshot and every later one
    ///
    /// The returned handle unsubscribes when dropped.
    pub fn for_each<F>(mut self, mut callback: F) -> FeedHandle
    where
        T: Send + Sync + 'static,
        F: FnMut(&T) + Send + 'static,
    {
        let task = tokio::spawn(async move {
            callback(&self.rx.borrow_and_update());
            while self.rx.changed().await.is_ok() {
                callback(&self.rx.borrow_and_update());
            }
        });
        FeedHandle { task }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Registration handle for a callback feed
#[must_use = "dropping the handle unsubscribes the callback"]
pub struct FeedHandle {
    task: JoinHandle<()>,
}

impl FeedHandle {
    pub fn unsubscribe(self) {}
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Factory for the three store feeds
#[derive(Clone)]
pub struct LiveFeeds {
    store: Arc<dyn DocumentStore>,
    recent_sales_limit: usize,
}

impl std::fmt::Debug for LiveFeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveFeeds")
            .field("recent_sales_limit", &self.recent_sales_limit)
            .finish_non_exhaustive()
    }
}

impl LiveFeeds {
    pub fn new(store: Arc<dyn DocumentStore>, recent_sales_limit: usize) -> Self {
        Self {
            store,
            recent_sales_limit,
        }
    }

    /// Tables ordered by creation time
    pub fn tables(&self) -> StorageResult<Subscription<Vec<DiningTable>>> {
        self.feed(Collection::Tables, |store| store.list_tables())
    }

    /// Menu ordered by numeric id
    pub fn menu(&self) -> StorageResult<Subscription<Vec<MenuItem>>> {
        self.feed(Collection::Menu, |store| store.list_menu())
    }

    /// Newest sales, capped at the configured limit
    pub fn recent_sales(&self) -> StorageResult<Subscription<Vec<SaleRecord>>> {
        let limit = self.recent_sales_limit;
        self.feed(Collection::Sales, move |store| store.list_sales(Some(limit)))
    }

    pub fn on_tables<F>(&self, callback: F) -> StorageResult<FeedHandle>
    where
        F: FnMut(&Vec<DiningTable>) + Send + 'static,
    {
        Ok(self.tables()?.for_each(callback))
    }

    pub fn on_menu<F>(&self, callback: F) -> StorageResult<FeedHandle>
    where
        F: FnMut(&Vec<MenuItem>) + Send + 'static,
    {
        Ok(self.menu()?.for_each(callback))
    }

    pub fn on_recent_sales<F>(&self, callback: F) -> StorageResult<FeedHandle>
    where
        F: FnMut(&Vec<SaleRecord>) + Send + 'static,
    {
        Ok(self.recent_sales()?.for_each(callback))
    }

    fn feed<T, Q>(&self, collection: Collection, query: Q) -> StorageResult<Subscription<T>>
    where
        T: Send + Sync + 'static,
        Q: Fn(&dyn DocumentStore) -> StorageResult<T> + Send + 'static,
    {
        // Subscribe before the first read so no commit slips in between
        let events = self.store.subscribe();
        let initial = query(self.store.as_ref())?;
        let (tx, rx) = watch::channel(initial);

        let store = self.store.clone();
        let task = tokio::spawn(run_feed(store, collection, events, tx, query));
        Ok(Subscription { rx, task })
    }
}

async fn run_feed<T, Q>(
    store: Arc<dyn DocumentStore>,
    collection: Collection,
    mut events: broadcast::Receiver<crate::db::StoreEvent>,
    tx: watch::Sender<T>,
    query: Q,
) where
    Q: Fn(&dyn DocumentStore) -> StorageResult<T>,
{
    loop {
        match events.recv().await {
            Ok(event) if event.collection == collection => {}
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(?collection, skipped, "Live feed lagged, re-querying");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::debug!(?collection, "Store closed, live feed stopping");
                break;
            }
        }

        match query(store.as_ref()) {
            Ok(snapshot) => {
                if tx.send(snapshot).is_err() {
                    break;
                }
            }
            Err(e) => {
                // Keep the last good snapshot
                tracing::warn!(?collection, error = %e, "Live feed query failed");
            }
        }
    }
}
