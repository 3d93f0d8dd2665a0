use async_trait::async_trait;

use super::errors::DatasetError;
use super::errors::QueryError;
use super::models::CreateDatasetCommand;
use super::models::Dataset;
use super::models::DatasetId;
use super::models::QueryContext;
use super::models::QueryRequest;
use super::models::QueryResponse;
use super::models::UpdateDatasetCommand;
use crate::tenant::models::TenantId;

/// Resolves a dataset-bound query to its rows.
///
/// Shared read-only by every render. Cancellation is carried by the caller
/// dropping the returned future.
#[async_trait]
pub trait QueryExecutor: Send + Sync + 'static {
    /// # Errors
    /// * `MissingDataset` - `request.dataset_id` is empty
    /// * `InvalidDataset` - `request.dataset_id` is not a plain identifier
    /// * `Unavailable` - The executor could not be reached
    /// * `Rejected` - The executor refused the query
    /// * `InvalidResponse` - The executor answered with an unreadable payload
    async fn query(
        &self,
        ctx: &QueryContext,
        request: &QueryRequest,
    ) -> Result<QueryResponse, QueryError>;
}

/// Port for dataset domain service operations.
#[async_trait]
pub trait DatasetServicePort: Send + Sync + 'static {
    /// # Errors
    /// * `InvalidRequest` - Name or type missing, a `sql` dataset without a
    ///   datasource, or fields with blank or repeated names
    /// * `UnsupportedType` - Type is not one of [`super::models::DATASET_TYPES`]
    /// * `DataSourceNotFound` - The datasource does not exist for this tenant
    /// * `Repository` - Database operation failed
    async fn create_dataset(&self, command: CreateDatasetCommand) -> Result<Dataset, DatasetError>;

    /// # Errors
    /// * `NotFound` - No dataset with this id for this tenant
    /// * `InvalidRequest` - Replacement fields with blank or repeated names
    /// * `Repository` - Database operation failed
    async fn update_dataset(&self, command: UpdateDatasetCommand) -> Result<Dataset, DatasetError>;

    async fn delete_dataset(&self, id: &DatasetId, tenant_id: &TenantId) -> Result<(), DatasetError>;

    async fn get_dataset(&self, id: &DatasetId, tenant_id: &TenantId) -> Result<Dataset, DatasetError>;

    async fn list_datasets(&self, tenant_id: &TenantId) -> Result<Vec<Dataset>, DatasetError>;
}
