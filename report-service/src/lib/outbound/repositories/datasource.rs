use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use super::database_error;
use crate::datasource::models::DataSource;
use crate::datasource::models::DataSourceId;
use crate::tenant::errors::RepositoryError;
use crate::tenant::models::TenantId;
use crate::tenant::ports::TenantScopedRepository;

pub struct PostgresDataSourceRepository {
    pool: PgPool,
}

impl PostgresDataSourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DataSourceRow {
    id: String,
    tenant_id: String,
    name: String,
    source_type: String,
    host: String,
    port: i32,
    database_name: String,
    username: String,
    password: String,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DataSourceRow> for DataSource {
    type Error = RepositoryError;

    fn try_from(row: DataSourceRow) -> Result<Self, Self::Error> {
        Ok(DataSource {
            id: DataSourceId::from(row.id),
            tenant_id: TenantId::new(row.tenant_id)
                .map_err(|e| RepositoryError::Serialization(e.to_string()))?,
            name: row.name,
            source_type: row.source_type,
            host: row.host,
            port: u16::try_from(row.port)
                .map_err(|_| RepositoryError::Serialization(format!("port {}", row.port)))?,
            database: row.database_name,
            username: row.username,
            password: row.password,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TenantScopedRepository<DataSource> for PostgresDataSourceRepository {
    async fn create(&self, source: &DataSource) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO datasources (id, tenant_id, name, source_type, host, port, database_name,
                                     username, password, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(source.id.as_str())
        .bind(source.tenant_id.as_str())
        .bind(&source.name)
        .bind(&source.source_type)
        .bind(&source.host)
        .bind(i32::from(source.port))
        .bind(&source.database)
        .bind(&source.username)
        .bind(&source.password)
        .bind(&source.created_by)
        .bind(source.created_at)
        .bind(source.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn update(&self, source: &DataSource) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE datasources
            SET name = $3, source_type = $4, host = $5, port = $6, database_name = $7,
                username = $8, password = $9, updated_at = $10
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(source.id.as_str())
        .bind(source.tenant_id.as_str())
        .bind(&source.name)
        .bind(&source.source_type)
        .bind(&source.host)
        .bind(i32::from(source.port))
        .bind(&source.database)
        .bind(&source.username)
        .bind(&source.password)
        .bind(source.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(source.id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &DataSourceId, tenant_id: &TenantId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE datasources
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

    async fn get(&self, id: &DataSourceId, tenant_id: &TenantId) -> Result<DataSource, RepositoryError> {
        let row: Option<DataSourceRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, name, source_type, host, port, database_name,
                   username, password, created_by, created_at, updated_at
            FROM datasources
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

    async fn list(&self, tenant_id: &TenantId) -> Result<Vec<DataSource>, RepositoryError> {
        let rows: Vec<DataSourceRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, name, source_type, host, port, database_name,
                   username, password, created_by, created_at, updated_at
            FROM datasources
            WHERE tenant_id = $1 AND deleted_at IS NULL
            ORDER BY updated_at DESC
            "#,
        )
        .bind(tenant_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(DataSource::try_from).collect()
    }
}
