use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::errors::DashboardError;
use super::models::CreateDashboardCommand;
use super::models::Dashboard;
use super::models::DashboardId;
use super::models::UpdateDashboardCommand;
use super::models::STATUS_ACTIVE;
use super::ports::DashboardServicePort;
use crate::tenant::models::TenantId;
use crate::tenant::ports::TenantScopedRepository;

pub struct DashboardService<DR>
where
    DR: TenantScopedRepository<Dashboard>,
{
    repository: Arc<DR>,
}

impl<DR> DashboardService<DR>
where
    DR: TenantScopedRepository<Dashboard>,
{
    pub fn new(repository: Arc<DR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<DR> DashboardServicePort for DashboardService<DR>
where
    DR: TenantScopedRepository<Dashboard>,
{
    async fn create_dashboard(
        &self,
        command: CreateDashboardCommand,
    ) -> Result<Dashboard, DashboardError> {
        if command.name.trim().is_empty() {
            return Err(DashboardError::NameRequired);
        }

        let now = Utc::now();
        let dashboard = Dashboard {
            id: DashboardId::new(),
            tenant_id: command.tenant_id,
            name: command.name,
            code: command.code,
            config: command.config.or_defaults(),
            components: command.components,
            thumbnail: command.thumbnail,
            status: STATUS_ACTIVE,
            view_count: 0,
            created_by: command.created_by,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(&dashboard).await?;
        tracing::info!(
            dashboard_id = %dashboard.id,
            tenant_id = %dashboard.tenant_id,
            "Dashboard created"
        );

        Ok(dashboard)
    }

    async fn update_dashboard(
        &self,
        command: UpdateDashboardCommand,
    ) -> Result<Dashboard, DashboardError> {
        let mut dashboard = self
            .repository
            .get(&command.id, &command.tenant_id)
            .await?;

        if let Some(name) = command.name {
            dashboard.name = name;
        }
        if let Some(code) = command.code {
            dashboard.code = code;
        }
        if let Some(config) = command.config {
            dashboard.config = config;
        }
        if let Some(components) = command.components {
            dashboard.components = components;
        }
        if let Some(thumbnail) = command.thumbnail {
            dashboard.thumbnail = thumbnail;
        }
        if let Some(status) = command.status {
            dashboard.status = status;
        }
        dashboard.updated_at = Utc::now();

        self.repository.update(&dashboard).await?;
        tracing::info!(dashboard_id = %dashboard.id, "Dashboard updated");

        Ok(dashboard)
    }

    async fn delete_dashboard(
        &self,
        id: &DashboardId,
        tenant_id: &TenantId,
    ) -> Result<(), DashboardError> {
        self.repository.delete(id, tenant_id).await?;
        tracing::info!(dashboard_id = %id, tenant_id = %tenant_id, "Dashboard deleted");
        Ok(())
    }

    async fn get_dashboard(
        &self,
        id: &DashboardId,
        tenant_id: &TenantId,
    ) -> Result<Dashboard, DashboardError> {
        Ok(self.repository.get(id, tenant_id).await?)
    }

    async fn list_dashboards(&self, tenant_id: &TenantId) -> Result<Vec<Dashboard>, DashboardError> {
        Ok(self.repository.list(tenant_id).await?)
    }
}
