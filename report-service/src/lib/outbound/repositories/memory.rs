use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use parking_lot::RwLock;

use crate::tenant::errors::RepositoryError;
use crate::tenant::models::TenantId;
use crate::tenant::ports::TenantScoped;
use crate::tenant::ports::TenantScopedRepository;
use crate::user::models::User;
use crate::user::ports::UserRepository;

#[derive(Debug, Clone)]
struct Slot<E> {
    entity: E,
    deleted_at: Option<DateTime<Utc>>,
}

impl<E: TenantScoped> Slot<E> {
    fn is_visible_to(&self, tenant_id: &TenantId) -> bool {
        self.deleted_at.is_none() && self.entity.tenant_id() == tenant_id
    }
}

/// Process-local backing for any tenant-scoped entity.
///
/// Used when no database is configured and by the integration tests.
/// Soft-deleted entities are kept with their delete marker.
pub struct InMemoryRepository<E: TenantScoped> {
    slots: RwLock<HashMap<E::Id, Slot<E>>>,
}

impl<E: TenantScoped> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }
}

impl<E: TenantScoped> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: TenantScoped> TenantScopedRepository<E> for InMemoryRepository<E> {
    async fn create(&self, entity: &E) -> Result<(), RepositoryError> {
        let mut slots = self.slots.write();
        if slots.contains_key(entity.id()) {
            return Err(RepositoryError::Conflict(entity.id().to_string()));
        }

        slots.insert(
            entity.id().clone(),
            Slot {
                entity: entity.clone(),
                deleted_at: None,
            },
        );
        Ok(())
    }

    async fn update(&self, entity: &E) -> Result<(), RepositoryError> {
        let mut slots = self.slots.write();
        match slots.get_mut(entity.id()) {
            Some(slot) if slot.is_visible_to(entity.tenant_id()) => {
                slot.entity = entity.clone();
                Ok(())
            }
            _ => Err(RepositoryError::NotFound(entity.id().to_string())),
        }
    }

    async fn delete(&self, id: &E::Id, tenant_id: &TenantId) -> Result<(), RepositoryError> {
        let mut slots = self.slots.write();
        match slots.get_mut(id) {
            Some(slot) if slot.is_visible_to(tenant_id) => {
                slot.deleted_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(RepositoryError::NotFound(id.to_string())),
        }
    }

    async fn get(&self, id: &E::Id, tenant_id: &TenantId) -> Result<E, RepositoryError> {
        self.slots
            .read()
            .get(id)
            .filter(|slot| slot.is_visible_to(tenant_id))
            .map(|slot| slot.entity.clone())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn list(&self, tenant_id: &TenantId) -> Result<Vec<E>, RepositoryError> {
        let mut entities: Vec<E> = self
            .slots
            .read()
            .values()
            .filter(|slot| slot.is_visible_to(tenant_id))
            .map(|slot| slot.entity.clone())
            .collect();

        entities.sort_by_key(|entity| std::cmp::Reverse(entity.updated_at()));
        Ok(entities)
    }
}

/// Process-local user store keyed by username.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write();
        if users.contains_key(&user.username) {
            return Err(RepositoryError::Conflict(user.username));
        }

        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().get(username).cloned())
    }
}
