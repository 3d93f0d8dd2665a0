use async_trait::async_trait;

use super::errors::DashboardError;
use super::models::CreateDashboardCommand;
use super::models::Dashboard;
use super::models::DashboardId;
use super::models::UpdateDashboardCommand;
use crate::tenant::models::TenantId;

/// Port for dashboard domain service operations.
#[async_trait]
pub trait DashboardServicePort: Send + Sync + 'static {
    /// # Errors
    /// * `NameRequired` - Name is empty
    /// * `Repository` - Database operation failed
    async fn create_dashboard(
        &self,
        command: CreateDashboardCommand,
    ) -> Result<Dashboard, DashboardError>;

    /// # Errors
    /// * `NotFound` - No dashboard with this id for this tenant
    /// * `Repository` - Database operation failed
    async fn update_dashboard(
        &self,
        command: UpdateDashboardCommand,
    ) -> Result<Dashboard, DashboardError>;

    async fn delete_dashboard(
        &self,
        id: &DashboardId,
        tenant_id: &TenantId,
    ) -> Result<(), DashboardError>;

    async fn get_dashboard(
        &self,
        id: &DashboardId,
        tenant_id: &TenantId,
    ) -> Result<Dashboard, DashboardError>;

    async fn list_dashboards(&self, tenant_id: &TenantId) -> Result<Vec<Dashboard>, DashboardError>;
}
