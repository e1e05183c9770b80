//! POS Server - single-restaurant point of sale core
//!
//! # Overview
//!
//! - **Orders** (`orders`): table state machine, cart grouping, billing and
//!   the atomic close-order step
//! - **Store** (`db`): embedded redb document store with change events
//! - **Live feeds** (`live`): snapshot subscriptions for tables, menu and
//!   recent sales
//! - **Archive** (`archive`): read side of closed sales
//! - **Import/export** (`data_transfer`): menu CSV in, sales CSV out
//!
//! # Layout
//!
//! ```text
//! pos-server/src/
//! ├── core/           # config, assembled state
//! ├── db/             # DocumentStore + RedbStore
//! ├── orders/         # money, cart, view, manager, dispatcher
//! ├── live/           # Subscription feeds
//! ├── archive/        # SalesArchive
//! ├── catalog/        # menu categories and search
//! ├── data_transfer/  # CSV import/export
//! └── utils/          # logging, colón formatting
//! ```

pub mod archive;
pub mod catalog;
pub mod core;
pub mod data_transfer;
pub mod db;
pub mod live;
pub mod orders;
pub mod utils;

// Re-export public types
pub use archive::SalesArchive;
pub use core::{Config, PosState};
pub use db::{DocumentStore, RedbStore, StorageError};
pub use live::{LiveFeeds, Subscription};
pub use orders::{CommandDispatcher, OrdersManager, TableCommand};

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, then configuration, then logging
///
/// Returns the config and the file-logging guard (if any), which must be
/// held until shutdown.
pub fn setup_environment()
-> std::io::Result<(Config, Option<tracing_appender::non_blocking::WorkerGuard>)> {
    // Missing .env is normal in production
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    let guard = init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    )?;
    Ok((config, guard))
}
