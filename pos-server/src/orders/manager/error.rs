use crate::db::StorageError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Error kinds surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any mutation
    Validation,
    /// Operation not allowed in the table's current state
    PreconditionFailed,
    NotFound,
    /// Concurrent write detected during close-order
    TransactionConflict,
    StoreUnavailable,
    Internal,
}

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Table name is required")]
    EmptyTableName,

    #[error("A price is required for variable-price item {0}")]
    PriceRequired(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    #[error("Table {0} has an open order and cannot be deleted")]
    TableOccupied(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table {0} was modified while closing the order")]
    TransactionConflict(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ManagerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyTableName | Self::PriceRequired(_) | Self::InvalidPrice(_) => {
                ErrorKind::Validation
            }
            Self::TableOccupied(_) => ErrorKind::PreconditionFailed,
            Self::TableNotFound(_) => ErrorKind::NotFound,
            Self::TransactionConflict(_) => ErrorKind::TransactionConflict,
            Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<StorageError> for ManagerError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TableNotFound(id) => Self::TableNotFound(id),
            StorageError::TableOccupied(name) => Self::TableOccupied(name),
            StorageError::Conflict { table_id, .. } => Self::TransactionConflict(table_id),
            StorageError::TableExists(id) => Self::Internal(format!("duplicate table id: {}", id)),
            other => Self::StoreUnavailable(other),
        }
    }
}

/// Map a storage failure to an error code (the UI localizes by code)
fn classify_storage_error(e: &StorageError) -> ErrorCode {
    if matches!(e, StorageError::Serialization(_)) {
        return ErrorCode::StorageCorrupted;
    }

    // redb errors are classified by message
    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
    {
        return ErrorCode::StorageFull;
    }

    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }

    ErrorCode::StorageUnavailable
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        let message = err.to_string();
        match &err {
            ManagerError::EmptyTableName => {
                AppError::with_message(ErrorCode::TableNameRequired, message)
            }
            ManagerError::PriceRequired(id) => {
                AppError::with_message(ErrorCode::PriceRequired, message)
                    .with_detail("menu_item_id", id.clone())
            }
            ManagerError::InvalidPrice(_) => {
                AppError::with_message(ErrorCode::MenuItemInvalidPrice, message)
            }
            ManagerError::TableOccupied(_) => {
                AppError::with_message(ErrorCode::TableOccupied, message)
            }
            ManagerError::TableNotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, message)
                    .with_detail("table_id", id.clone())
            }
            ManagerError::TransactionConflict(id) => {
                AppError::with_message(ErrorCode::OrderConflict, message)
                    .with_detail("table_id", id.clone())
            }
            ManagerError::StoreUnavailable(e) => {
                let code = classify_storage_error(e);
                tracing::error!(error = %e, error_code = %code, "Storage error occurred");
                AppError::with_message(code, message)
            }
            ManagerError::Internal(_) => AppError::internal(message),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
