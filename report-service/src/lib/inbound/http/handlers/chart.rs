use axum::extract::rejection::JsonRejection;
use axum::extract::Query;
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
use super::IdQuery;
use crate::chart::models::Chart;
use crate::chart::models::ChartConfig;
use crate::chart::models::ChartId;
use crate::chart::models::CreateChartCommand;
use crate::chart::models::UpdateChartCommand;
use crate::dataset::models::QueryContext;
use crate::inbound::http::middleware::BearerToken;
use crate::inbound::http::middleware::TenantContext;
use crate::inbound::http::router::AppState;

pub async fn create_chart(
    State(state): State<AppState>,
    tenant: TenantContext,
    payload: Result<Json<CreateChartRequest>, JsonRejection>,
) -> Result<ApiSuccess<ChartData>, ApiError> {
    let Json(body) = payload?;

    state
        .chart_service
        .create_chart(body.into_command(tenant))
        .await
        .map_err(ApiError::from)
        .map(|ref chart| ApiSuccess::new(StatusCode::OK, "chart created", chart.into()))
}

pub async fn update_chart(
    State(state): State<AppState>,
    tenant: TenantContext,
    payload: Result<Json<UpdateChartRequest>, JsonRejection>,
) -> Result<ApiSuccess<ChartData>, ApiError> {
    let Json(body) = payload?;

    state
        .chart_service
        .update_chart(body.try_into_command(tenant)?)
        .await
        .map_err(ApiError::from)
        .map(|ref chart| ApiSuccess::new(StatusCode::OK, "chart updated", chart.into()))
}

pub async fn delete_chart(
    State(state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<IdQuery>,
) -> Result<ApiSuccess<()>, ApiError> {
    let id = ChartId::from(query.required()?);

    state
        .chart_service
        .delete_chart(&id, &tenant.tenant_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::message(StatusCode::OK, "chart deleted"))
}

pub async fn get_chart(
    State(state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<IdQuery>,
) -> Result<ApiSuccess<ChartData>, ApiError> {
    let id = ChartId::from(query.required()?);

    state
        .chart_service
        .get_chart(&id, &tenant.tenant_id)
        .await
        .map_err(ApiError::from)
        .map(|ref chart| ApiSuccess::new(StatusCode::OK, "success", chart.into()))
}

pub async fn list_charts(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<ApiSuccess<Vec<ChartData>>, ApiError> {
    state
        .chart_service
        .list_charts(&tenant.tenant_id)
        .await
        .map_err(ApiError::from)
        .map(|charts| {
            ApiSuccess::new(
                StatusCode::OK,
                "success",
                charts.iter().map(ChartData::from).collect(),
            )
        })
}

/// Render failures never echo the chart id.
///
/// Dataset queries run with the caller's own token.
pub async fn render_chart(
    State(state): State<AppState>,
    tenant: TenantContext,
    BearerToken(token): BearerToken,
    Query(query): Query<IdQuery>,
) -> Result<ApiSuccess<RenderData>, ApiError> {
    let id = ChartId::from(query.required()?);
    let ctx = QueryContext::new(tenant.tenant_id, Some(token));

    state
        .chart_service
        .render_chart(&id, &ctx)
        .await
        .map_err(ApiError::from)
        .map(|config| ApiSuccess::new(StatusCode::OK, "success", RenderData { config }))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateChartRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    code: String,
    #[serde(rename = "type", default)]
    chart_type: String,
    #[serde(default)]
    config: ChartConfig,
}

impl CreateChartRequest {
    fn into_command(self, tenant: TenantContext) -> CreateChartCommand {
        CreateChartCommand {
            tenant_id: tenant.tenant_id,
            name: self.name,
            code: self.code,
            chart_type: self.chart_type,
            config: self.config,
        }
    }
}

/// Empty strings leave the stored value unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateChartRequest {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    code: String,
    #[serde(rename = "type", default)]
    chart_type: String,
    #[serde(default)]
    config: Option<ChartConfig>,
}

impl UpdateChartRequest {
    fn try_into_command(self, tenant: TenantContext) -> Result<UpdateChartCommand, ApiError> {
        let id = provided(self.id).ok_or_else(|| ApiError::BadRequest("invalid request".to_string()))?;

        Ok(UpdateChartCommand {
            id: ChartId::from(id),
            tenant_id: tenant.tenant_id,
            name: provided(self.name),
            code: provided(self.code),
            chart_type: provided(self.chart_type),
            config: self.config,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub chart_type: String,
    pub config: String,
    pub status: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Chart> for ChartData {
    fn from(chart: &Chart) -> Self {
        Self {
            id: chart.id.to_string(),
            tenant_id: chart.tenant_id.to_string(),
            name: chart.name.clone(),
            code: chart.code.clone(),
            chart_type: chart.chart_type.clone(),
            config: chart.config.clone(),
            status: chart.status,
            created_at: chart.created_at,
            updated_at: chart.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderData {
    pub config: String,
}
