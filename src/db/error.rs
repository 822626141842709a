//! Storage error type shared by the local and remote backends.

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Record or document does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller supplied an unusable value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Remote client absent, unreachable, or failing
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Stored JSON could not be decoded
    #[error("Malformed stored data: {0}")]
    MalformedData(String),

    /// Local SQLite error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// File IO during export/import
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
