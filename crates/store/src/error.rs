use thiserror::Error;

/// Errors that can occur when interacting with the stores.
///
/// Domain-level outcomes (missing rows, insufficient stock, lost
/// conditional updates) are reported through the outcome enums on the
/// store traits, not through this type; `StoreError` is reserved for
/// backend failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored value could not be mapped back to its domain type.
    #[error("failed to decode stored value: {0}")]
    Decode(String),

    /// The backend reported a failure that is not a database error.
    ///
    /// The in-memory store uses this for injected test failures.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
