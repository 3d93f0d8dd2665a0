use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use super::database_error;
use crate::chart::models::Chart;
use crate::chart::models::ChartId;
use crate::tenant::errors::RepositoryError;
use crate::tenant::models::TenantId;
use crate::tenant::ports::TenantScopedRepository;

pub struct PostgresChartRepository {
    pool: PgPool,
}

impl PostgresChartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ChartRow {
    id: String,
    tenant_id: String,
    name: String,
    code: String,
    chart_type: String,
    config: String,
    status: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ChartRow> for Chart {
    type Error = RepositoryError;

    fn try_from(row: ChartRow) -> Result<Self, Self::Error> {
        Ok(Chart {
            id: ChartId::from(row.id),
            tenant_id: TenantId::new(row.tenant_id)
                .map_err(|e| RepositoryError::Serialization(e.to_string()))?,
            name: row.name,
            code: row.code,
            chart_type: row.chart_type,
            config: row.config,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TenantScopedRepository<Chart> for PostgresChartRepository {
    async fn create(&self, chart: &Chart) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO charts (id, tenant_id, name, code, chart_type, config, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(chart.id.as_str())
        .bind(chart.tenant_id.as_str())
        .bind(&chart.name)
        .bind(&chart.code)
        .bind(&chart.chart_type)
        .bind(&chart.config)
        .bind(chart.status)
        .bind(chart.created_at)
        .bind(chart.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn update(&self, chart: &Chart) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE charts
            SET name = $3, code = $4, chart_type = $5, config = $6, status = $7, updated_at = $8
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(chart.id.as_str())
        .bind(chart.tenant_id.as_str())
        .bind(&chart.name)
        .bind(&chart.code)
        .bind(&chart.chart_type)
        .bind(&chart.config)
        .bind(chart.status)
        .bind(chart.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(chart.id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &ChartId, tenant_id: &TenantId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE charts
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

    async fn get(&self, id: &ChartId, tenant_id: &TenantId) -> Result<Chart, RepositoryError> {
        let row: Option<ChartRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, name, code, chart_type, config, status, created_at, updated_at
            FROM charts
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

    async fn list(&self, tenant_id: &TenantId) -> Result<Vec<Chart>, RepositoryError> {
        let rows: Vec<ChartRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, name, code, chart_type, config, status, created_at, updated_at
            FROM charts
            WHERE tenant_id = $1 AND deleted_at IS NULL
            ORDER BY updated_at DESC
            "#,
        )
        .bind(tenant_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(Chart::try_from).collect()
    }
}
