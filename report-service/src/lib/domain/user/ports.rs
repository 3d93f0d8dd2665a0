use async_trait::async_trait;

use super::errors::UserError;
use super::models::CreateUserCommand;
use super::models::User;
use crate::tenant::errors::RepositoryError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Authenticate a login attempt.
    ///
    /// # Arguments
    /// * `username` - Login name
    /// * `password` - Plaintext password to check against the stored digest
    ///
    /// # Returns
    /// The matching user
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this username
    /// * `InvalidPassword` - The password does not match
    /// * `Password` - The stored digest is unreadable
    /// * `Repository` - Database operation failed
    async fn verify_credentials(&self, username: &str, password: &str) -> Result<User, UserError>;

    /// Hash the password and persist a new user.
    ///
    /// # Errors
    /// * `MissingUsername` - Username is empty
    /// * `Repository` - Username already taken or database failure
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;
}

/// Persistence operations for users.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// # Errors
    /// * `Conflict` - Username is already taken
    /// * `Database` - Database operation failed
    async fn create(&self, user: User) -> Result<User, RepositoryError>;

    /// Retrieve a live user by username (None if not found).
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
}
