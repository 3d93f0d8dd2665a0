use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use super::database_error;
use crate::dashboard::models::Dashboard;
use crate::dashboard::models::DashboardComponent;
use crate::dashboard::models::DashboardConfig;
use crate::dashboard::models::DashboardId;
use crate::tenant::errors::RepositoryError;
use crate::tenant::models::TenantId;
use crate::tenant::ports::TenantScopedRepository;

/// Dashboards with config and components stored as JSON text.
pub struct PostgresDashboardRepository {
    pool: PgPool,
}

impl PostgresDashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DashboardRow {
    id: String,
    tenant_id: String,
    name: String,
    code: String,
    config: String,
    components: String,
    thumbnail: String,
    status: i32,
    view_count: i64,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DashboardRow> for Dashboard {
    type Error = RepositoryError;

    fn try_from(row: DashboardRow) -> Result<Self, Self::Error> {
        Ok(Dashboard {
            id: DashboardId::from(row.id),
            tenant_id: TenantId::new(row.tenant_id)
                .map_err(|e| RepositoryError::Serialization(e.to_string()))?,
            name: row.name,
            code: row.code,
            config: DashboardConfig::from_document(&row.config),
            components: DashboardComponent::list_from_document(&row.components),
            thumbnail: row.thumbnail,
            status: row.status,
            view_count: row.view_count,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn documents(dashboard: &Dashboard) -> Result<(String, String), RepositoryError> {
    let config = serde_json::to_string(&dashboard.config)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    let components = serde_json::to_string(&dashboard.components)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    Ok((config, components))
}

#[async_trait]
impl TenantScopedRepository<Dashboard> for PostgresDashboardRepository {
    async fn create(&self, dashboard: &Dashboard) -> Result<(), RepositoryError> {
        let (config, components) = documents(dashboard)?;

        sqlx::query(
            r#"
            INSERT INTO dashboards (id, tenant_id, name, code, config, components, thumbnail,
                                    status, view_count, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(dashboard.id.as_str())
        .bind(dashboard.tenant_id.as_str())
        .bind(&dashboard.name)
        .bind(&dashboard.code)
        .bind(config)
        .bind(components)
        .bind(&dashboard.thumbnail)
        .bind(dashboard.status)
        .bind(dashboard.view_count)
        .bind(&dashboard.created_by)
        .bind(dashboard.created_at)
        .bind(dashboard.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn update(&self, dashboard: &Dashboard) -> Result<(), RepositoryError> {
        let (config, components) = documents(dashboard)?;

        let result = sqlx::query(
            r#"
            UPDATE dashboards
            SET name = $3, code = $4, config = $5, components = $6, thumbnail = $7,
                status = $8, view_count = $9, updated_at = $10
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(dashboard.id.as_str())
        .bind(dashboard.tenant_id.as_str())
        .bind(&dashboard.name)
        .bind(&dashboard.code)
        .bind(config)
        .bind(components)
        .bind(&dashboard.thumbnail)
        .bind(dashboard.status)
        .bind(dashboard.view_count)
        .bind(dashboard.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(dashboard.id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &DashboardId, tenant_id: &TenantId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE dashboards
            SET deleted_at = NOW()
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id.as_str())
        .bind(tenant_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn get(&self, id: &DashboardId, tenant_id: &TenantId) -> Result<Dashboard, RepositoryError> {
        let row: Option<DashboardRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, name, code, config, components, thumbnail,
                   status, view_count, created_by, created_at, updated_at
            FROM dashboards
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id.as_str())
        .bind(tenant_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.ok_or_else(|| RepositoryError::NotFound(id.to_string()))?
            .try_into()
    }

    async fn list(&self, tenant_id: &TenantId) -> Result<Vec<Dashboard>, RepositoryError> {
        let rows: Vec<DashboardRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, name, code, config, components, thumbnail,
                   status, view_count, created_by, created_at, updated_at
            FROM dashboards
            WHERE tenant_id = $1 AND deleted_at IS NULL
            ORDER BY updated_at DESC
            "#,
        )
        .bind(tenant_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(Dashboard::try_from).collect()
    }
}
