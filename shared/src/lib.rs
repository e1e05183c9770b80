//! Shared types for the restaurant POS
//!
//! Data models persisted in the document store, the unified error system
//! surfaced to the presentation layer, and small utilities used by every
//! crate in the workspace.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{
    DiningTable, LineItem, MenuItem, PaymentMethod, SaleRecord, TableStatus,
};
pub use serde::{Deserialize, Serialize};
