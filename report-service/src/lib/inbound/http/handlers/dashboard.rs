use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::provided;
use super::ApiError;
use super::ApiSuccess;
use crate::dashboard::models::CreateDashboardCommand;
use crate::dashboard::models::Dashboard;
use crate::dashboard::models::DashboardComponent;
use crate::dashboard::models::DashboardConfig;
use crate::dashboard::models::DashboardId;
use crate::dashboard::models::UpdateDashboardCommand;
use crate::inbound::http::middleware::TenantContext;
use crate::inbound::http::router::AppState;

pub async fn list_dashboards(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<ApiSuccess<Vec<DashboardData>>, ApiError> {
    state
        .dashboard_service
        .list_dashboards(&tenant.tenant_id)
        .await
        .map_err(ApiError::from)
        .map(|dashboards| {
            ApiSuccess::new(
                StatusCode::OK,
                "success",
                dashboards.iter().map(DashboardData::from).collect(),
            )
        })
}

pub async fn create_dashboard(
    State(state): State<AppState>,
    tenant: TenantContext,
    payload: Result<Json<CreateDashboardRequest>, JsonRejection>,
) -> Result<ApiSuccess<DashboardData>, ApiError> {
    let Json(body) = payload?;

    let command = CreateDashboardCommand {
        tenant_id: tenant.tenant_id,
        name: body.name,
        code: body.code,
        config: body.config,
        components: body.components,
        thumbnail: body.thumbnail,
        created_by: tenant.user_id,
    };

    state
        .dashboard_service
        .create_dashboard(command)
        .await
        .map_err(ApiError::from)
        .map(|ref dashboard| ApiSuccess::new(StatusCode::OK, "dashboard created", dashboard.into()))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> Result<ApiSuccess<DashboardData>, ApiError> {
    state
        .dashboard_service
        .get_dashboard(&DashboardId::from(id), &tenant.tenant_id)
        .await
        .map_err(ApiError::from)
        .map(|ref dashboard| ApiSuccess::new(StatusCode::OK, "success", dashboard.into()))
}

pub async fn update_dashboard(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDashboardRequest>, JsonRejection>,
) -> Result<ApiSuccess<DashboardData>, ApiError> {
    let Json(body) = payload?;

    let command = UpdateDashboardCommand {
        id: DashboardId::from(id),
        tenant_id: tenant.tenant_id,
        name: provided(body.name),
        code: provided(body.code),
        config: body.config.filter(DashboardConfig::is_sized),
        components: Some(body.components).filter(|components| !components.is_empty()),
        thumbnail: provided(body.thumbnail),
        status: Some(body.status).filter(|status| *status != 0),
    };

    state
        .dashboard_service
        .update_dashboard(command)
        .await
        .map_err(ApiError::from)
        .map(|ref dashboard| ApiSuccess::new(StatusCode::OK, "dashboard updated", dashboard.into()))
}

pub async fn delete_dashboard(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .dashboard_service
        .delete_dashboard(&DashboardId::from(id), &tenant.tenant_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::message(StatusCode::OK, "dashboard deleted"))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateDashboardRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    config: DashboardConfig,
    #[serde(default)]
    components: Vec<DashboardComponent>,
    #[serde(default)]
    thumbnail: String,
}

/// Empty or zero fields leave the stored value unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateDashboardRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    config: Option<DashboardConfig>,
    #[serde(default)]
    components: Vec<DashboardComponent>,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    status: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub code: String,
    pub config: DashboardConfig,
    pub components: Vec<DashboardComponent>,
    pub thumbnail: String,
    pub status: i32,
    pub view_count: i64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Dashboard> for DashboardData {
    fn from(dashboard: &Dashboard) -> Self {
        Self {
            id: dashboard.id.to_string(),
            tenant_id: dashboard.tenant_id.to_string(),
            name: dashboard.name.clone(),
            code: dashboard.code.clone(),
            config: dashboard.config.clone(),
            components: dashboard.components.clone(),
            thumbnail: dashboard.thumbnail.clone(),
            status: dashboard.status,
            view_count: dashboard.view_count,
            created_by: dashboard.created_by.clone(),
            created_at: dashboard.created_at,
            updated_at: dashboard.updated_at,
        }
    }
}
