//! Sale Record Model

use super::line_item::LineItem;
use super::payment::PaymentMethod;
use serde::{Deserialize, Serialize};

/// Archived order, immutable once written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: String,
    /// Moment the order was closed (Unix millis)
    pub timestamp: i64,
    pub table_id: String,
    pub table_name: String,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub card_tax: f64,
    pub total: f64,
    pub payment_method: PaymentMethod,
    pub created_at: i64,
}
