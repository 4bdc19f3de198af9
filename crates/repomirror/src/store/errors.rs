use std::time::Duration;

use sea_orm::DbErr;
use thiserror::Error;

/// Errors that can occur while applying records to a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (connection or ping failure).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Dropping or creating the table failed.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A single-row insert affected an unexpected number of rows.
    #[error("Write integrity error for {name}: expected 1 row, affected {affected}")]
    WriteIntegrity { name: String, affected: u64 },

    /// Encoding a key-value payload failed.
    #[error("Serialization error for {key}: {message}")]
    Serialization { key: String, message: String },

    /// A store operation exceeded its deadline.
    #[error("Store operation '{operation}' timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// A record cannot be represented in the store.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_integrity_message() {
        let err = StoreError::WriteIntegrity {
            name: "utility".to_string(),
            affected: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("utility"));
        assert!(msg.contains("expected 1 row"));
        assert!(msg.contains("affected 2"));
    }

    #[test]
    fn test_timeout_message() {
        let err = StoreError::Timeout {
            operation: "insert",
            after: Duration::from_secs(5),
        };
        let msg = err.to_string();
        assert!(msg.contains("insert"));
        assert!(msg.contains("5s"));
    }

    #[test]
    fn test_database_from_db_err() {
        let err: StoreError = DbErr::RecordNotFound("gone".to_string()).into();
        assert!(err.to_string().contains("Database error"));
    }
}
