use thiserror::Error;

use crate::tenant::errors::RepositoryError;

/// Error raised by a query executor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Dataset id is required")]
    MissingDataset,

    #[error("Invalid dataset id: {0}")]
    InvalidDataset(String),

    #[error("Query executor unavailable: {0}")]
    Unavailable(String),

    #[error("Query rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid query response: {0}")]
    InvalidResponse(String),
}

/// Top-level error for dataset operations.
#[derive(Debug, Clone, Error)]
pub enum DatasetError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("unsupported dataset type: {0}")]
    UnsupportedType(String),

    #[error("datasource not found")]
    DataSourceNotFound(String),

    #[error("dataset not found")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for DatasetError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => DatasetError::NotFound(id),
            other => DatasetError::Repository(other),
        }
    }
}
