//! Order lifecycle for dining tables
//!
//! - **money**: subtotal, card surcharge and total
//! - **cart**: grouping of line items for display
//! - **view**: derived per-table state for the presentation layer
//! - **manager**: table state machine and atomic order close
//! - **dispatcher**: fire-and-forget command queue with failure notices
//!
//! # Architecture
//!
//! ```text
//! UI → CommandDispatcher → OrdersManager → DocumentStore (redb)
//!            ↓                                  ↓
//!     Notice::Failed                       StoreEvent
//!            ↓                                  ↓
//!        UI alert                    LiveFeeds → UI re-derives views
//! ```

pub mod cart;
pub mod dispatcher;
pub mod ids;
pub mod manager;
pub mod money;
pub mod view;

// Re-exports
pub use cart::{CartGroup, group_items};
pub use dispatcher::{
    AlwaysConfirm, CommandDispatcher, Confirmer, Notice, SubmitError, Submitted, TableCommand,
};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use manager::{ErrorKind, ManagerError, ManagerResult, OrdersManager};
pub use money::{Totals, compute_totals};
pub use view::{TableSummary, TableView, summarize};
