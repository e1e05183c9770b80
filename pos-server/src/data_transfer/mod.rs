//! Delimited-text import and export
//!
//! - **menu_csv**: `id;name;category;price` menu import (replaces the menu)
//! - **sales_csv**: sales archive export, whole history or one day

pub mod menu_csv;
pub mod sales_csv;

pub use menu_csv::{import_menu_file, parse_menu_csv, replace_menu};
pub use sales_csv::{EXPORT_HEADER, ExportScope, export_sales, render_sales_csv, select_sales};

use crate::db::StorageError;
use crate::orders::ManagerError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Menu import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// No usable rows; the menu is left as it was
    #[error("invalid CSV: no menu items found")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Sales export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing in the selected scope (a notice, not a failure)
    #[error("no sales to export")]
    NothingToExport,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Empty => AppError::with_message(ErrorCode::MenuImportInvalid, "invalid CSV"),
            ImportError::Io(e) => AppError::internal(e.to_string()),
            ImportError::Storage(e) => ManagerError::from(e).into(),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::NothingToExport => {
                AppError::with_message(ErrorCode::NotFound, "no sales to export")
            }
            ExportError::Storage(e) => ManagerError::from(e).into(),
            other => AppError::internal(other.to_string()),
        }
    }
}
