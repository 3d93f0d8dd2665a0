use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::errors::DataSourceError;
use super::models::CreateDataSourceCommand;
use super::models::DataSource;
use super::models::DataSourceId;
use super::models::UpdateDataSourceCommand;
use super::models::SUPPORTED_TYPES;
use super::ports::DataSourceServicePort;
use crate::tenant::models::TenantId;
use crate::tenant::ports::TenantScopedRepository;

pub struct DataSourceService<SR>
where
    SR: TenantScopedRepository<DataSource>,
{
    repository: Arc<SR>,
}

impl<SR> DataSourceService<SR>
where
    SR: TenantScopedRepository<DataSource>,
{
    pub fn new(repository: Arc<SR>) -> Self {
        Self { repository }
    }
}

fn required(field: &str, value: &str) -> Result<(), DataSourceError> {
    if value.trim().is_empty() {
        return Err(DataSourceError::InvalidRequest(format!("{} is required", field)));
    }
    Ok(())
}

fn supported(source_type: &str) -> Result<(), DataSourceError> {
    if !SUPPORTED_TYPES.contains(&source_type) {
        return Err(DataSourceError::UnsupportedType(source_type.to_string()));
    }
    Ok(())
}

fn valid_port(port: i64) -> Result<u16, DataSourceError> {
    u16::try_from(port)
        .ok()
        .filter(|port| *port != 0)
        .ok_or_else(|| DataSourceError::InvalidRequest("port must be between 1 and 65535".to_string()))
}

#[async_trait]
impl<SR> DataSourceServicePort for DataSourceService<SR>
where
    SR: TenantScopedRepository<DataSource>,
{
    async fn create_datasource(
        &self,
        command: CreateDataSourceCommand,
    ) -> Result<DataSource, DataSourceError> {
        required("name", &command.name)?;
        required("type", &command.source_type)?;
        supported(&command.source_type)?;
        required("host", &command.host)?;
        let port = valid_port(command.port)?;

        let now = Utc::now();
        let source = DataSource {
            id: DataSourceId::new(),
            tenant_id: command.tenant_id,
            name: command.name,
            source_type: command.source_type,
            host: command.host,
            port,
            database: command.database,
            username: command.username,
            password: command.password,
            created_by: command.created_by,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(&source).await?;
        tracing::info!(
            datasource_id = %source.id,
            tenant_id = %source.tenant_id,
            source_type = %source.source_type,
            "Datasource created"
        );

        Ok(source)
    }

    async fn update_datasource(
        &self,
        command: UpdateDataSourceCommand,
    ) -> Result<DataSource, DataSourceError> {
        let mut source = self
            .repository
            .get(&command.id, &command.tenant_id)
            .await?;

        if let Some(name) = command.name {
            source.name = name;
        }
        if let Some(source_type) = command.source_type {
            supported(&source_type)?;
            source.source_type = source_type;
        }
        if let Some(host) = command.host {
            source.host = host;
        }
        if let Some(port) = command.port {
            source.port = valid_port(port)?;
        }
        if let Some(database) = command.database {
            source.database = database;
        }
        if let Some(username) = command.username {
            source.username = username;
        }
        if let Some(password) = command.password {
            source.password = password;
        }
        source.updated_at = Utc::now();

        self.repository.update(&source).await?;
        tracing::info!(datasource_id = %source.id, "Datasource updated");

        Ok(source)
    }

    async fn delete_datasource(
        &self,
        id: &DataSourceId,
        tenant_id: &TenantId,
    ) -> Result<(), DataSourceError> {
        self.repository.delete(id, tenant_id).await?;
        tracing::info!(datasource_id = %id, tenant_id = %tenant_id, "Datasource deleted");
        Ok(())
    }

    async fn get_datasource(
        &self,
        id: &DataSourceId,
        tenant_id: &TenantId,
    ) -> Result<DataSource, DataSourceError> {
        Ok(self.repository.get(id, tenant_id).await?)
    }

    async fn list_datasources(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<DataSource>, DataSourceError> {
        Ok(self.repository.list(tenant_id).await?)
    }
}
