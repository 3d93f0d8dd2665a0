use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::errors::ChartError;
use super::models::Chart;
use super::models::ChartConfig;
use super::models::ChartId;
use super::models::CreateChartCommand;
use super::models::SeriesSource;
use super::models::UpdateChartCommand;
use super::models::STATUS_ACTIVE;
use super::ports::ChartServicePort;
use crate::dataset::models::QueryContext;
use crate::dataset::ports::QueryExecutor;
use crate::tenant::models::TenantId;
use crate::tenant::ports::TenantScopedRepository;

/// Domain service implementation for chart operations.
///
/// Owns chart entities; the query executor is only ever read from.
pub struct ChartService<CR, QE>
where
    CR: TenantScopedRepository<Chart>,
    QE: QueryExecutor,
{
    repository: Arc<CR>,
    query_executor: Arc<QE>,
}

impl<CR, QE> ChartService<CR, QE>
where
    CR: TenantScopedRepository<Chart>,
    QE: QueryExecutor,
{
    /// Create a new chart service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Tenant-scoped chart persistence
    /// * `query_executor` - Dataset query collaborator used by render
    pub fn new(repository: Arc<CR>, query_executor: Arc<QE>) -> Self {
        Self {
            repository,
            query_executor,
        }
    }

    /// Fill every dataset-bound series of `config` in index order, querying on
    /// behalf of `ctx`.
    ///
    /// Stops at the first executor failure. A response without rows leaves the
    /// series data untouched.
    async fn bind_series(
        &self,
        ctx: &QueryContext,
        config: &mut ChartConfig,
    ) -> Result<(), ChartError> {
        for (index, series) in config.series.iter_mut().enumerate() {
            let SeriesSource::Dataset(binding) = &series.source else {
                continue;
            };

            let request = binding.request();
            let response = self.query_executor.query(ctx, &request).await.map_err(|e| {
                tracing::warn!(
                    series = index,
                    dataset_id = %request.dataset_id,
                    tenant_id = %ctx.tenant_id,
                    error = %e,
                    "Dataset query failed"
                );
                e
            })?;

            if !response.data.is_empty() {
                series.data = response.column(&series.name);
            }
        }

        Ok(())
    }
}

fn non_empty(field: &str, value: &str) -> Result<(), ChartError> {
    if value.trim().is_empty() {
        return Err(ChartError::InvalidRequest(format!("{} is required", field)));
    }
    Ok(())
}

#[async_trait]
impl<CR, QE> ChartServicePort for ChartService<CR, QE>
where
    CR: TenantScopedRepository<Chart>,
    QE: QueryExecutor,
{
    async fn create_chart(&self, command: CreateChartCommand) -> Result<Chart, ChartError> {
        non_empty("name", &command.name)?;
        non_empty("type", &command.chart_type)?;

        let now = Utc::now();
        let chart = Chart {
            id: ChartId::new(),
            tenant_id: command.tenant_id,
            name: command.name,
            code: command.code,
            chart_type: command.chart_type,
            config: command.config.to_document()?,
            status: STATUS_ACTIVE,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(&chart).await?;
        tracing::info!(chart_id = %chart.id, tenant_id = %chart.tenant_id, "Chart created");

        Ok(chart)
    }

    async fn update_chart(&self, command: UpdateChartCommand) -> Result<Chart, ChartError> {
        let mut chart = self
            .repository
            .get(&command.id, &command.tenant_id)
            .await?;

        if let Some(name) = command.name {
            chart.name = name;
        }
        if let Some(code) = command.code {
            chart.code = code;
        }
        if let Some(chart_type) = command.chart_type {
            chart.chart_type = chart_type;
        }
        if let Some(config) = command.config.filter(|config| !config.series.is_empty()) {
            chart.config = config.to_document()?;
        }
        chart.updated_at = Utc::now();

        self.repository.update(&chart).await?;
        tracing::info!(chart_id = %chart.id, tenant_id = %chart.tenant_id, "Chart updated");

        Ok(chart)
    }

    async fn delete_chart(&self, id: &ChartId, tenant_id: &TenantId) -> Result<(), ChartError> {
        self.repository.delete(id, tenant_id).await?;
        tracing::info!(chart_id = %id, tenant_id = %tenant_id, "Chart deleted");
        Ok(())
    }

    async fn get_chart(&self, id: &ChartId, tenant_id: &TenantId) -> Result<Chart, ChartError> {
        Ok(self.repository.get(id, tenant_id).await?)
    }

    async fn list_charts(&self, tenant_id: &TenantId) -> Result<Vec<Chart>, ChartError> {
        Ok(self.repository.list(tenant_id).await?)
    }

    async fn render_chart(&self, id: &ChartId, ctx: &QueryContext) -> Result<String, ChartError> {
        let chart = self.repository.get(id, &ctx.tenant_id).await?;
        let mut config = ChartConfig::parse(&chart.config)?;

        tracing::debug!(chart_id = %id, series = config.series.len(), "Render started");
        self.bind_series(ctx, &mut config).await?;
        let document = config.to_document()?;
        tracing::debug!(chart_id = %id, bytes = document.len(), "Render finished");

        Ok(document)
    }
}
