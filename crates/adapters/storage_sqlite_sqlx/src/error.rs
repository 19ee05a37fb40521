//! Storage-specific error type wrapping sqlx errors.

use inventory_domain::error::InventoryError;

/// Errors originating from the `SQLite` storage layer.
///
/// The message of the underlying failure is part of the `Display` output,
/// since it is reported to API clients as-is.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failed to encode or decode a stored JSON value.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to run migrations.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for InventoryError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
