use super::Config;
use crate::archive::SalesArchive;
use crate::data_transfer::{self, ExportError, ExportScope, ImportError};
use crate::db::{DocumentStore, RedbStore, StorageResult};
use crate::live::LiveFeeds;
use crate::orders::{CommandDispatcher, Confirmer, OrdersManager, UuidGenerator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Runtime state shared by the binary and embedding UIs
///
/// Cheap to clone; every service shares the same store.
#[derive(Clone, Debug)]
pub struct PosState {
    pub config: Config,
    pub store: RedbStore,
    pub orders: Arc<OrdersManager>,
    pub archive: SalesArchive,
    pub feeds: LiveFeeds,
}

impl PosState {
    /// Open the database under `work_dir` and build the services
    pub fn initialize(config: &Config) -> StorageResult<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let db_path = config.db_path();
        tracing::info!(path = %db_path.display(), "Opening database");
        let store = RedbStore::open(&db_path)?;
        Ok(Self::with_store(config.clone(), store))
    }

    /// Build the services over an already-open store
    pub fn with_store(config: Config, store: RedbStore) -> Self {
        let shared: Arc<dyn DocumentStore> = Arc::new(store.clone());

        let orders = Arc::new(
            OrdersManager::new(shared.clone(), Arc::new(UuidGenerator))
                .with_close_retries(config.close_order_max_retries),
        );
        let archive = SalesArchive::new(
            shared.clone(),
            config.recent_sales_limit,
            config.business_timezone,
        );
        let feeds = LiveFeeds::new(shared, config.recent_sales_limit);

        Self {
            config,
            store,
            orders,
            archive,
            feeds,
        }
    }

    /// Start the command worker
    ///
    /// Must be called inside a tokio runtime.
    pub fn start_dispatcher(
        &self,
        confirmer: Arc<dyn Confirmer>,
    ) -> (CommandDispatcher, JoinHandle<()>) {
        CommandDispatcher::spawn(self.orders.clone(), confirmer)
    }

    /// Replace the menu from `MENU_IMPORT_PATH`, if configured
    ///
    /// An empty menu with no import path is left empty.
    pub fn import_configured_menu(&self) -> Result<Option<usize>, ImportError> {
        let Some(path) = &self.config.menu_import_path else {
            if self.store.list_menu()?.is_empty() {
                tracing::warn!("Menu is empty and no MENU_IMPORT_PATH is configured");
            }
            return Ok(None);
        };
        let stored = data_transfer::import_menu_file(&self.store, Path::new(path))?;
        Ok(Some(stored))
    }

    /// Export sales into the configured export directory
    pub fn export_sales(&self, scope: ExportScope) -> Result<PathBuf, ExportError> {
        self.archive.export_to_dir(scope, &self.config.export_path())
    }
}
