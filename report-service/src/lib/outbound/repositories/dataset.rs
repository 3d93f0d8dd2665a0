use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::PgPool;

use super::database_error;
use crate::dataset::models::Dataset;
use crate::dataset::models::DatasetId;
use crate::datasource::models::DataSourceId;
use crate::tenant::errors::RepositoryError;
use crate::tenant::models::TenantId;
use crate::tenant::ports::TenantScopedRepository;

/// Datasets with config, fields and sources stored as JSON text.
///
/// An unreadable stored document is a `Serialization` error, never a default.
pub struct PostgresDatasetRepository {
    pool: PgPool,
}

impl PostgresDatasetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DatasetRow {
    id: String,
    tenant_id: String,
    datasource_id: Option<String>,
    name: String,
    dataset_type: String,
    config: String,
    action: String,
    status: i32,
    fields: String,
    sources: String,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn decode<T: DeserializeOwned>(column: &str, document: &str) -> Result<T, RepositoryError> {
    serde_json::from_str(document)
        .map_err(|e| RepositoryError::Serialization(format!("{}: {}", column, e)))
}

fn encode<T: Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

impl TryFrom<DatasetRow> for Dataset {
    type Error = RepositoryError;

    fn try_from(row: DatasetRow) -> Result<Self, Self::Error> {
        Ok(Dataset {
            id: DatasetId::from(row.id),
            tenant_id: TenantId::new(row.tenant_id)
                .map_err(|e| RepositoryError::Serialization(e.to_string()))?,
            datasource_id: row.datasource_id.map(DataSourceId::from),
            name: row.name,
            dataset_type: row.dataset_type,
            config: decode("config", &row.config)?,
            action: row.action,
            status: row.status,
            fields: decode("fields", &row.fields)?,
            sources: decode("sources", &row.sources)?,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TenantScopedRepository<Dataset> for PostgresDatasetRepository {
    async fn create(&self, dataset: &Dataset) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO datasets (id, tenant_id, datasource_id, name, dataset_type, config, action,
                                  status, fields, sources, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(dataset.id.as_str())
        .bind(dataset.tenant_id.as_str())
        .bind(dataset.datasource_id.as_ref().map(DataSourceId::as_str))
        .bind(&dataset.name)
        .bind(&dataset.dataset_type)
        .bind(encode(&dataset.config)?)
        .bind(&dataset.action)
        .bind(dataset.status)
        .bind(encode(&dataset.fields)?)
        .bind(encode(&dataset.sources)?)
        .bind(&dataset.created_by)
        .bind(dataset.created_at)
        .bind(dataset.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn update(&self, dataset: &Dataset) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE datasets
            SET datasource_id = $3, name = $4, config = $5, action = $6, status = $7,
                fields = $8, sources = $9, updated_at = $10
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(dataset.id.as_str())
        .bind(dataset.tenant_id.as_str())
        .bind(dataset.datasource_id.as_ref().map(DataSourceId::as_str))
        .bind(&dataset.name)
        .bind(encode(&dataset.config)?)
        .bind(&dataset.action)
        .bind(dataset.status)
        .bind(encode(&dataset.fields)?)
        .bind(encode(&dataset.sources)?)
        .bind(dataset.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(dataset.id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &DatasetId, tenant_id: &TenantId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE datasets
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

    async fn get(&self, id: &DatasetId, tenant_id: &TenantId) -> Result<Dataset, RepositoryError> {
        let row: Option<DatasetRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, datasource_id, name, dataset_type, config, action,
                   status, fields, sources, created_by, created_at, updated_at
            FROM datasets
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

    async fn list(&self, tenant_id: &TenantId) -> Result<Vec<Dataset>, RepositoryError> {
        let rows: Vec<DatasetRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, datasource_id, name, dataset_type, config, action,
                   status, fields, sources, created_by, created_at, updated_at
            FROM datasets
            WHERE tenant_id = $1 AND deleted_at IS NULL
            ORDER BY updated_at DESC
            "#,
        )
        .bind(tenant_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(Dataset::try_from).collect()
    }
}
