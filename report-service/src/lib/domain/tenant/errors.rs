use thiserror::Error;

/// Error for TenantId validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenantError {
    #[error("tenant not found")]
    Missing,
}

/// Error shared by every tenant-scoped repository.
///
/// A row owned by another tenant is reported as `NotFound`, exactly like a
/// row that does not exist.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Entity already exists: {0}")]
    Conflict(String),

    #[error("Stored document is invalid: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),
}
