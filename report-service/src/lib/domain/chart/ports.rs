use async_trait::async_trait;

use super::errors::ChartError;
use super::models::Chart;
use super::models::ChartId;
use super::models::CreateChartCommand;
use super::models::UpdateChartCommand;
use crate::dataset::models::QueryContext;
use crate::tenant::models::TenantId;

/// Port for chart domain service operations.
///
/// Every operation is scoped to the caller's tenant.
#[async_trait]
pub trait ChartServicePort: Send + Sync + 'static {
    /// Create a chart with a fresh id and active status.
    ///
    /// # Errors
    /// * `InvalidRequest` - Name or type is missing
    /// * `Repository` - Database operation failed
    async fn create_chart(&self, command: CreateChartCommand) -> Result<Chart, ChartError>;

    /// Overwrite the provided fields of a chart.
    ///
    /// # Errors
    /// * `NotFound` - No chart with this id for this tenant
    /// * `Repository` - Database operation failed
    async fn update_chart(&self, command: UpdateChartCommand) -> Result<Chart, ChartError>;

    /// Soft-delete a chart.
    ///
    /// # Errors
    /// * `NotFound` - No chart with this id for this tenant
    /// * `Repository` - Database operation failed
    async fn delete_chart(&self, id: &ChartId, tenant_id: &TenantId) -> Result<(), ChartError>;

    /// # Errors
    /// * `NotFound` - No chart with this id for this tenant
    /// * `Repository` - Database operation failed
    async fn get_chart(&self, id: &ChartId, tenant_id: &TenantId) -> Result<Chart, ChartError>;

    /// Charts of a tenant, most recently updated first.
    async fn list_charts(&self, tenant_id: &TenantId) -> Result<Vec<Chart>, ChartError>;

    /// Serialized config with every dataset-bound series filled from its
    /// dataset. Nothing is persisted.
    ///
    /// The chart is looked up in `ctx.tenant_id` and every query runs on
    /// behalf of `ctx`.
    ///
    /// # Errors
    /// * `NotFound` - No chart with this id for the context's tenant
    /// * `InvalidConfig` - The stored config cannot be parsed
    /// * `Query` - A dataset query failed; no partial output is produced
    async fn render_chart(&self, id: &ChartId, ctx: &QueryContext) -> Result<String, ChartError>;
}
