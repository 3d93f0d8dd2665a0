use thiserror::Error;

use crate::tenant::errors::RepositoryError;

/// Top-level error for user lookups and credential checks.
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Username is required")]
    MissingUsername,

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Password task failed: {0}")]
    PasswordTask(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
