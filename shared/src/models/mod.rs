//! Data models
//!
//! Documents persisted in the store's three collections (`menu`, `tables`,
//! `sales`) plus the value types they embed.

pub mod dining_table;
pub mod line_item;
pub mod menu_item;
pub mod payment;
pub mod sale_record;
pub mod serde_helpers;

pub use dining_table::{DiningTable, TablePatch, TableStatus};
pub use line_item::LineItem;
pub use menu_item::MenuItem;
pub use payment::PaymentMethod;
pub use sale_record::SaleRecord;
