use thiserror::Error;

use crate::tenant::errors::RepositoryError;

/// Top-level error for dashboard operations.
#[derive(Debug, Clone, Error)]
pub enum DashboardError {
    #[error("name is required")]
    NameRequired,

    #[error("dashboard not found")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for DashboardError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => DashboardError::NotFound(id),
            other => DashboardError::Repository(other),
        }
    }
}
