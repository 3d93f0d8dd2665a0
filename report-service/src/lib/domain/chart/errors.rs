use thiserror::Error;

use crate::dataset::errors::QueryError;
use crate::tenant::errors::RepositoryError;

/// Top-level error for chart operations.
#[derive(Debug, Clone, Error)]
pub enum ChartError {
    #[error("chart not found")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid chart config: {0}")]
    InvalidConfig(String),

    #[error("Query failed: {0}")]
    Query(#[from] QueryError),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ChartError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ChartError::NotFound(id),
            other => ChartError::Repository(other),
        }
    }
}
