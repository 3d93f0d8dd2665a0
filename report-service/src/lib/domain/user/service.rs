use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::errors::UserError;
use super::models::CreateUserCommand;
use super::models::User;
use super::models::UserId;
use super::ports::UserRepository;
use super::ports::UserServicePort;

/// Credential verifier: user lookup plus password check.
///
/// Hashing runs on the blocking pool. The unknown-user and wrong-password
/// paths do not take uniform time.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self::with_hasher(repository, auth::PasswordHasher::new())
    }

    pub fn with_hasher(repository: Arc<UR>, password_hasher: auth::PasswordHasher) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }
}

/// Run a password KDF call on the blocking pool.
async fn off_worker<T, F>(task: F) -> Result<T, UserError>
where
    F: FnOnce() -> Result<T, auth::PasswordError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| UserError::PasswordTask(e.to_string()))?
        .map_err(UserError::from)
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn verify_credentials(&self, username: &str, password: &str) -> Result<User, UserError> {
        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| UserError::UserNotFound(username.to_string()))?;

        let hasher = self.password_hasher.clone();
        let plaintext = password.to_string();
        let digest = user.password_hash.clone();
        if !off_worker(move || hasher.verify(&plaintext, &digest)).await? {
            tracing::debug!(username = %username, "Password mismatch");
            return Err(UserError::InvalidPassword);
        }

        Ok(user)
    }

    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        if command.username.trim().is_empty() {
            return Err(UserError::MissingUsername);
        }

        let hasher = self.password_hasher.clone();
        let plaintext = command.password;
        let password_hash = off_worker(move || hasher.hash(&plaintext)).await?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username: command.username,
            password_hash,
            role: command.role,
            tenant_id: command.tenant_id,
            created_at: now,
            updated_at: now,
        };

        let user = self.repository.create(user).await?;
        tracing::info!(user_id = %user.id, tenant_id = %user.tenant_id, "User created");

        Ok(user)
    }
}
