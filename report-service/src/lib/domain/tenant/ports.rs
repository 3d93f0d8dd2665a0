use std::fmt::Display;
use std::hash::Hash;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use super::errors::RepositoryError;
use super::models::TenantId;

/// An entity addressed by the pair `(id, tenant_id)`.
pub trait TenantScoped: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + Display + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    fn tenant_id(&self) -> &TenantId;

    /// Ordering key for `list`, most recent first.
    fn updated_at(&self) -> DateTime<Utc>;
}

/// Persistence contract shared by every tenant-scoped entity.
///
/// Every operation is filtered by both identifier and tenant. A request with the
/// right id and the wrong tenant is indistinguishable from an unknown id and
/// never mutates anything. Deletion is soft: deleted entities disappear from
/// `get` and `list`.
#[async_trait]
pub trait TenantScopedRepository<E: TenantScoped>: Send + Sync + 'static {
    /// Insert a new entity owned by `entity.tenant_id()`.
    ///
    /// # Errors
    /// * `Conflict` - An entity with the same id already exists
    /// * `Database` - Database operation failed
    async fn create(&self, entity: &E) -> Result<(), RepositoryError>;

    /// Overwrite the entity matching both `entity.id()` and `entity.tenant_id()`.
    ///
    /// # Errors
    /// * `NotFound` - No live entity matches the pair
    /// * `Database` - Database operation failed
    async fn update(&self, entity: &E) -> Result<(), RepositoryError>;

    /// Soft-delete the entity matching both `id` and `tenant_id`.
    ///
    /// # Errors
    /// * `NotFound` - No live entity matches the pair
    /// * `Database` - Database operation failed
    async fn delete(&self, id: &E::Id, tenant_id: &TenantId) -> Result<(), RepositoryError>;

    /// # Errors
    /// * `NotFound` - No live entity matches the pair
    /// * `Serialization` - The stored row could not be decoded
    /// * `Database` - Database operation failed
    async fn get(&self, id: &E::Id, tenant_id: &TenantId) -> Result<E, RepositoryError>;

    /// Every live entity of `tenant_id`, most recently updated first.
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn list(&self, tenant_id: &TenantId) -> Result<Vec<E>, RepositoryError>;
}
