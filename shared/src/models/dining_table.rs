//! Dining Table Model

use super::line_item::LineItem;
use super::payment::PaymentMethod;
use serde::{Deserialize, Serialize};

/// Table status, always derived from the item list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    Free,
    Occupied,
}

impl TableStatus {
    /// The only place status is computed: occupied iff there are items
    pub fn derive(items: &[LineItem]) -> Self {
        if items.is_empty() {
            Self::Free
        } else {
            Self::Occupied
        }
    }
}

/// Dining table holding at most one open order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: TableStatus,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub payment: PaymentMethod,
    pub created_at: i64,
    #[serde(default)]
    pub last_updated_at: i64,
    /// Bumped by the store on every write
    #[serde(default)]
    pub revision: u64,
}

impl DiningTable {
    /// A free table with an empty order
    pub fn new(id: impl Into<String>, name: impl Into<String>, now: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: TableStatus::Free,
            items: Vec::new(),
            payment: PaymentMethod::Cash,
            created_at: now,
            last_updated_at: now,
            revision: 0,
        }
    }

    pub fn is_occupied(&self) -> bool {
        !self.items.is_empty()
    }

    /// Apply a partial update, re-deriving status from the resulting items
    pub fn apply(&mut self, patch: TablePatch, now: i64) {
        if let Some(items) = patch.items {
            self.items = items;
        }
        if let Some(payment) = patch.payment {
            self.payment = payment;
        }
        self.status = TableStatus::derive(&self.items);
        self.last_updated_at = now;
        self.revision += 1;
    }

    /// Clear the order after it has been archived
    pub fn reset(&mut self, now: i64) {
        self.apply(
            TablePatch {
                items: Some(Vec::new()),
                payment: Some(PaymentMethod::Cash),
            },
            now,
        );
    }
}

/// Partial update of a table document
///
/// Status is deliberately absent: it is recomputed from `items` whenever a
/// patch is applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentMethod>,
}

impl TablePatch {
    pub fn items(items: Vec<LineItem>) -> Self {
        Self {
            items: Some(items),
            payment: None,
        }
    }

    pub fn payment(payment: PaymentMethod) -> Self {
        Self {
            items: None,
            payment: Some(payment),
        }
    }
}
