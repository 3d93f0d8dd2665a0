use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::errors::DatasetError;
use super::models::CreateDatasetCommand;
use super::models::Dataset;
use super::models::DatasetField;
use super::models::DatasetId;
use super::models::DatasetSource;
use super::models::UpdateDatasetCommand;
use super::models::DATASET_TYPES;
use super::models::STATUS_ACTIVE;
use super::ports::DatasetServicePort;
use crate::datasource::models::DataSource;
use crate::datasource::models::DataSourceId;
use crate::tenant::errors::RepositoryError;
use crate::tenant::models::TenantId;
use crate::tenant::ports::TenantScopedRepository;

/// Domain service for datasets.
///
/// A dataset may only reference a datasource of its own tenant.
pub struct DatasetService<DR, SR>
where
    DR: TenantScopedRepository<Dataset>,
    SR: TenantScopedRepository<DataSource>,
{
    repository: Arc<DR>,
    datasources: Arc<SR>,
}

impl<DR, SR> DatasetService<DR, SR>
where
    DR: TenantScopedRepository<Dataset>,
    SR: TenantScopedRepository<DataSource>,
{
    pub fn new(repository: Arc<DR>, datasources: Arc<SR>) -> Self {
        Self {
            repository,
            datasources,
        }
    }

    async fn ensure_datasource(
        &self,
        id: &DataSourceId,
        tenant_id: &TenantId,
    ) -> Result<(), DatasetError> {
        match self.datasources.get(id, tenant_id).await {
            Ok(_) => Ok(()),
            Err(RepositoryError::NotFound(id)) => Err(DatasetError::DataSourceNotFound(id)),
            Err(e) => Err(DatasetError::Repository(e)),
        }
    }
}

/// Check field names and give unsaved fields an id.
fn prepare_fields(fields: Vec<DatasetField>) -> Result<Vec<DatasetField>, DatasetError> {
    let mut seen = HashSet::new();
    fields
        .into_iter()
        .map(|mut field| {
            if field.name.trim().is_empty() {
                return Err(DatasetError::InvalidRequest("field name is required".to_string()));
            }
            if !seen.insert(field.name.clone()) {
                return Err(DatasetError::InvalidRequest(format!(
                    "duplicate field: {}",
                    field.name
                )));
            }
            if field.id.is_empty() {
                field.id = Uuid::new_v4().to_string();
            }
            Ok(field)
        })
        .collect()
}

fn prepare_sources(sources: Vec<DatasetSource>) -> Vec<DatasetSource> {
    sources
        .into_iter()
        .map(|mut source| {
            if source.id.is_empty() {
                source.id = Uuid::new_v4().to_string();
            }
            source
        })
        .collect()
}

#[async_trait]
impl<DR, SR> DatasetServicePort for DatasetService<DR, SR>
where
    DR: TenantScopedRepository<Dataset>,
    SR: TenantScopedRepository<DataSource>,
{
    async fn create_dataset(&self, command: CreateDatasetCommand) -> Result<Dataset, DatasetError> {
        if command.name.trim().is_empty() {
            return Err(DatasetError::InvalidRequest("name is required".to_string()));
        }
        if command.dataset_type.trim().is_empty() {
            return Err(DatasetError::InvalidRequest("type is required".to_string()));
        }
        if !DATASET_TYPES.contains(&command.dataset_type.as_str()) {
            return Err(DatasetError::UnsupportedType(command.dataset_type));
        }

        match &command.datasource_id {
            Some(id) => self.ensure_datasource(id, &command.tenant_id).await?,
            None if Dataset::requires_datasource(&command.dataset_type) => {
                return Err(DatasetError::InvalidRequest(
                    "datasourceId is required for sql datasets".to_string(),
                ));
            }
            None => {}
        }

        let now = Utc::now();
        let dataset = Dataset {
            id: DatasetId::new(),
            tenant_id: command.tenant_id,
            datasource_id: command.datasource_id,
            name: command.name,
            dataset_type: command.dataset_type,
            config: command.config,
            action: command.action,
            status: STATUS_ACTIVE,
            fields: prepare_fields(command.fields)?,
            sources: prepare_sources(command.sources),
            created_by: command.created_by,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(&dataset).await?;
        tracing::info!(
            dataset_id = %dataset.id,
            tenant_id = %dataset.tenant_id,
            fields = dataset.fields.len(),
            "Dataset created"
        );

        Ok(dataset)
    }

    async fn update_dataset(&self, command: UpdateDatasetCommand) -> Result<Dataset, DatasetError> {
        let mut dataset = self
            .repository
            .get(&command.id, &command.tenant_id)
            .await?;

        if let Some(name) = command.name {
            dataset.name = name;
        }
        if let Some(config) = command.config {
            dataset.config = config;
        }
        if let Some(action) = command.action {
            dataset.action = action;
        }
        if let Some(status) = command.status {
            dataset.status = status;
        }
        if let Some(fields) = command.fields {
            dataset.fields = prepare_fields(fields)?;
        }
        if let Some(sources) = command.sources {
            dataset.sources = prepare_sources(sources);
        }
        dataset.updated_at = Utc::now();

        self.repository.update(&dataset).await?;
        tracing::info!(dataset_id = %dataset.id, "Dataset updated");

        Ok(dataset)
    }

    async fn delete_dataset(&self, id: &DatasetId, tenant_id: &TenantId) -> Result<(), DatasetError> {
        self.repository.delete(id, tenant_id).await?;
        tracing::info!(dataset_id = %id, tenant_id = %tenant_id, "Dataset deleted");
        Ok(())
    }

    async fn get_dataset(&self, id: &DatasetId, tenant_id: &TenantId) -> Result<Dataset, DatasetError> {
        Ok(self.repository.get(id, tenant_id).await?)
    }

    async fn list_datasets(&self, tenant_id: &TenantId) -> Result<Vec<Dataset>, DatasetError> {
        Ok(self.repository.list(tenant_id).await?)
    }
}
