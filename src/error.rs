//! Error types for GardenSync
//!
//! Provides a unified error type for all operations.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Result type alias using GardenError
pub type Result<T> = std::result::Result<T, GardenError>;

/// Unified error type for GardenSync operations
#[derive(Debug, Error)]
pub enum GardenError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    /// The database or a transaction on it could not be established
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A table constraint rejected a write; the enclosing transaction is aborted
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// No record with the requested id (engine and protocol surface only)
    #[error("Record not found")]
    NotFound,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<rusqlite::Error> for GardenError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => GardenError::ConstraintViolation(err.to_string()),
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::NotADatabase
                | ErrorCode::PermissionDenied,
            ) => GardenError::StorageUnavailable(err.to_string()),
            _ => GardenError::Storage(err.to_string()),
        }
    }
}

impl From<bincode::Error> for GardenError {
    fn from(err: bincode::Error) -> Self {
        GardenError::Serialization(err.to_string())
    }
}
