use async_trait::async_trait;

use super::errors::DataSourceError;
use super::models::CreateDataSourceCommand;
use super::models::DataSource;
use super::models::DataSourceId;
use super::models::UpdateDataSourceCommand;
use crate::tenant::models::TenantId;

/// Port for datasource domain service operations.
#[async_trait]
pub trait DataSourceServicePort: Send + Sync + 'static {
    /// # Errors
    /// * `InvalidRequest` - Name, type or host missing, or port outside `1..=65535`
    /// * `UnsupportedType` - Type is not one of [`super::models::SUPPORTED_TYPES`]
    /// * `Repository` - Database operation failed
    async fn create_datasource(
        &self,
        command: CreateDataSourceCommand,
    ) -> Result<DataSource, DataSourceError>;

    /// # Errors
    /// * `NotFound` - No datasource with this id for this tenant
    /// * `InvalidRequest` - Port outside `1..=65535`
    /// * `UnsupportedType` - New type is not supported
    /// * `Repository` - Database operation failed
    async fn update_datasource(
        &self,
        command: UpdateDataSourceCommand,
    ) -> Result<DataSource, DataSourceError>;

    async fn delete_datasource(
        &self,
        id: &DataSourceId,
        tenant_id: &TenantId,
    ) -> Result<(), DataSourceError>;

    async fn get_datasource(
        &self,
        id: &DataSourceId,
        tenant_id: &TenantId,
    ) -> Result<DataSource, DataSourceError>;

    async fn list_datasources(&self, tenant_id: &TenantId)
        -> Result<Vec<DataSource>, DataSourceError>;
}
