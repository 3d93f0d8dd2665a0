use thiserror::Error;

use crate::tenant::errors::RepositoryError;

/// Top-level error for datasource operations.
#[derive(Debug, Clone, Error)]
pub enum DataSourceError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("unsupported datasource type: {0}")]
    UnsupportedType(String),

    #[error("datasource not found")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for DataSourceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => DataSourceError::NotFound(id),
            other => DataSourceError::Repository(other),
        }
    }
}
