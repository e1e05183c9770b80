//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 6xxx: Menu errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as `u16` on the wire so the presentation layer can map codes
/// without sharing Rust types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Resource not found
    NotFound = 3,

    // ==================== 4xxx: Order ====================
    /// Concurrent write detected while closing an order
    OrderConflict = 4008,
    /// Variable-price item added without a resolved price
    PriceRequired = 4009,

    // ==================== 6xxx: Menu ====================
    /// Menu item has an invalid price
    MenuItemInvalidPrice = 6002,
    /// Menu import file could not be used
    MenuImportInvalid = 6010,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table still holds an open order
    TableOccupied = 7002,
    /// Table name is empty
    TableNameRequired = 7005,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,

    // ==================== 94xx: Storage ====================
    /// Storage is full
    StorageFull = 9401,
    /// Storage is corrupted
    StorageCorrupted = 9403,
    /// Storage is busy or unreachable
    StorageUnavailable = 9404,
}

impl ErrorCode {
    /// Numeric value of the code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::NotFound => "Resource not found",

            // Order
            ErrorCode::OrderConflict => "Order was modified concurrently",
            ErrorCode::PriceRequired => "A price is required for this item",

            // Menu
            ErrorCode::MenuItemInvalidPrice => "Menu item has invalid price",
            ErrorCode::MenuImportInvalid => "Invalid menu CSV",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table has an open order",
            ErrorCode::TableNameRequired => "Table name is required",

            // System
            ErrorCode::InternalError => "Internal error",

            // Storage
            ErrorCode::StorageFull => "Storage is full",
            ErrorCode::StorageCorrupted => "Storage is corrupted",
            ErrorCode::StorageUnavailable => "Storage is unavailable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            3 => Ok(ErrorCode::NotFound),

            // Order
            4008 => Ok(ErrorCode::OrderConflict),
            4009 => Ok(ErrorCode::PriceRequired),

            // Menu
            6002 => Ok(ErrorCode::MenuItemInvalidPrice),
            6010 => Ok(ErrorCode::MenuImportInvalid),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableOccupied),
            7005 => Ok(ErrorCode::TableNameRequired),

            // System
            9001 => Ok(ErrorCode::InternalError),

            // Storage
            9401 => Ok(ErrorCode::StorageFull),
            9403 => Ok(ErrorCode::StorageCorrupted),
            9404 => Ok(ErrorCode::StorageUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_roundtrip_through_u16() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::OrderConflict,
            ErrorCode::TableOccupied,
            ErrorCode::StorageUnavailable,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code_rejected() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(ErrorCode::try_from(0), Err(InvalidErrorCode(0)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::TableOccupied).unwrap();
        assert_eq!(json, "7002");
        let code: ErrorCode = serde_json::from_str("4008").unwrap();
        assert_eq!(code, ErrorCode::OrderConflict);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");
        assert_eq!(ErrorCode::TableOccupied.to_string(), "E7002");
    }
}
