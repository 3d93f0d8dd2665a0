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
use crate::datasource::models::CreateDataSourceCommand;
use crate::datasource::models::DataSource;
use crate::datasource::models::DataSourceId;
use crate::datasource::models::UpdateDataSourceCommand;
use crate::inbound::http::middleware::TenantContext;
use crate::inbound::http::router::AppState;

pub async fn list_datasources(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<ApiSuccess<Vec<DataSourceData>>, ApiError> {
    state
        .datasource_service
        .list_datasources(&tenant.tenant_id)
        .await
        .map_err(ApiError::from)
        .map(|sources| {
            ApiSuccess::new(
                StatusCode::OK,
                "success",
                sources.iter().map(DataSourceData::from).collect(),
            )
        })
}

pub async fn create_datasource(
    State(state): State<AppState>,
    tenant: TenantContext,
    payload: Result<Json<CreateDataSourceRequest>, JsonRejection>,
) -> Result<ApiSuccess<DataSourceData>, ApiError> {
    let Json(body) = payload?;

    let command = CreateDataSourceCommand {
        tenant_id: tenant.tenant_id,
        name: body.name,
        source_type: body.source_type,
        host: body.host,
        port: body.port,
        database: body.database,
        username: body.username,
        password: body.password,
        created_by: tenant.user_id,
    };

    state
        .datasource_service
        .create_datasource(command)
        .await
        .map_err(ApiError::from)
        .map(|ref source| ApiSuccess::new(StatusCode::CREATED, "datasource created", source.into()))
}

pub async fn get_datasource(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> Result<ApiSuccess<DataSourceData>, ApiError> {
    state
        .datasource_service
        .get_datasource(&DataSourceId::from(id), &tenant.tenant_id)
        .await
        .map_err(ApiError::from)
        .map(|ref source| ApiSuccess::new(StatusCode::OK, "success", source.into()))
}

pub async fn update_datasource(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDataSourceRequest>, JsonRejection>,
) -> Result<ApiSuccess<DataSourceData>, ApiError> {
    let Json(body) = payload?;

    let command = UpdateDataSourceCommand {
        id: DataSourceId::from(id),
        tenant_id: tenant.tenant_id,
        name: provided(body.name),
        source_type: provided(body.source_type),
        host: provided(body.host),
        port: Some(body.port).filter(|port| *port != 0),
        database: provided(body.database),
        username: provided(body.username),
        password: provided(body.password),
    };

    state
        .datasource_service
        .update_datasource(command)
        .await
        .map_err(ApiError::from)
        .map(|ref source| ApiSuccess::new(StatusCode::OK, "datasource updated", source.into()))
}

pub async fn delete_datasource(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .datasource_service
        .delete_datasource(&DataSourceId::from(id), &tenant.tenant_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::message(StatusCode::OK, "datasource deleted"))
}

#[derive(Clone, Deserialize)]
pub struct CreateDataSourceRequest {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    source_type: String,
    #[serde(default)]
    host: String,
    #[serde(default)]
    port: i64,
    #[serde(default)]
    database: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Empty or zero fields leave the stored value unchanged.
#[derive(Clone, Deserialize)]
pub struct UpdateDataSourceRequest {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    source_type: String,
    #[serde(default)]
    host: String,
    #[serde(default)]
    port: i64,
    #[serde(default)]
    database: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Response shape. Carries no password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceData {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DataSource> for DataSourceData {
    fn from(source: &DataSource) -> Self {
        Self {
            id: source.id.to_string(),
            tenant_id: source.tenant_id.to_string(),
            name: source.name.clone(),
            source_type: source.source_type.clone(),
            host: source.host.clone(),
            port: source.port,
            database: source.database.clone(),
            username: source.username.clone(),
            created_by: source.created_by.clone(),
            created_at: source.created_at,
            updated_at: source.updated_at,
        }
    }
}
