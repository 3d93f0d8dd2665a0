use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use super::provided;
use super::ApiError;
use super::ApiSuccess;
use crate::dataset::models::CreateDatasetCommand;
use crate::dataset::models::Dataset;
use crate::dataset::models::DatasetField;
use crate::dataset::models::DatasetId;
use crate::dataset::models::DatasetSource;
use crate::dataset::models::UpdateDatasetCommand;
use crate::datasource::models::DataSourceId;
use crate::inbound::http::middleware::TenantContext;
use crate::inbound::http::router::AppState;

pub async fn list_datasets(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<ApiSuccess<Vec<DatasetData>>, ApiError> {
    state
        .dataset_service
        .list_datasets(&tenant.tenant_id)
        .await
        .map_err(ApiError::from)
        .map(|datasets| {
            ApiSuccess::new(
                StatusCode::OK,
                "success",
                datasets.iter().map(DatasetData::from).collect(),
            )
        })
}

pub async fn create_dataset(
    State(state): State<AppState>,
    tenant: TenantContext,
    payload: Result<Json<CreateDatasetRequest>, JsonRejection>,
) -> Result<ApiSuccess<DatasetData>, ApiError> {
    let Json(body) = payload?;

    let command = CreateDatasetCommand {
        tenant_id: tenant.tenant_id,
        datasource_id: provided(body.datasource_id).map(DataSourceId::from),
        name: body.name,
        dataset_type: body.dataset_type,
        config: body.config,
        action: body.action,
        fields: body.fields,
        sources: body.sources,
        created_by: tenant.user_id,
    };

    state
        .dataset_service
        .create_dataset(command)
        .await
        .map_err(ApiError::from)
        .map(|ref dataset| ApiSuccess::new(StatusCode::CREATED, "dataset created", dataset.into()))
}

pub async fn get_dataset(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> Result<ApiSuccess<DatasetData>, ApiError> {
    state
        .dataset_service
        .get_dataset(&DatasetId::from(id), &tenant.tenant_id)
        .await
        .map_err(ApiError::from)
        .map(|ref dataset| ApiSuccess::new(StatusCode::OK, "success", dataset.into()))
}

pub async fn update_dataset(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDatasetRequest>, JsonRejection>,
) -> Result<ApiSuccess<DatasetData>, ApiError> {
    let Json(body) = payload?;

    let command = UpdateDatasetCommand {
        id: DatasetId::from(id),
        tenant_id: tenant.tenant_id,
        name: provided(body.name),
        config: body.config,
        action: provided(body.action),
        status: Some(body.status).filter(|status| *status != 0),
        fields: body.fields,
        sources: body.sources,
    };

    state
        .dataset_service
        .update_dataset(command)
        .await
        .map_err(ApiError::from)
        .map(|ref dataset| ApiSuccess::new(StatusCode::OK, "dataset updated", dataset.into()))
}

pub async fn delete_dataset(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .dataset_service
        .delete_dataset(&DatasetId::from(id), &tenant.tenant_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::message(StatusCode::OK, "dataset deleted"))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatasetRequest {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    dataset_type: String,
    #[serde(default)]
    datasource_id: String,
    #[serde(default)]
    config: Map<String, Value>,
    #[serde(default)]
    action: String,
    #[serde(default)]
    fields: Vec<DatasetField>,
    #[serde(default)]
    sources: Vec<DatasetSource>,
}

/// Empty or zero scalars leave the stored value unchanged; a present
/// `fields` or `sources` array replaces the stored one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateDatasetRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    config: Option<Map<String, Value>>,
    #[serde(default)]
    action: String,
    #[serde(default)]
    status: i32,
    #[serde(default)]
    fields: Option<Vec<DatasetField>>,
    #[serde(default)]
    sources: Option<Vec<DatasetSource>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetData {
    pub id: String,
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub dataset_type: String,
    pub config: Map<String, Value>,
    pub action: String,
    pub status: i32,
    pub fields: Vec<DatasetField>,
    pub sources: Vec<DatasetSource>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Dataset> for DatasetData {
    fn from(dataset: &Dataset) -> Self {
        Self {
            id: dataset.id.to_string(),
            tenant_id: dataset.tenant_id.to_string(),
            datasource_id: dataset.datasource_id.as_ref().map(ToString::to_string),
            name: dataset.name.clone(),
            dataset_type: dataset.dataset_type.clone(),
            config: dataset.config.clone(),
            action: dataset.action.clone(),
            status: dataset.status,
            fields: dataset.fields.clone(),
            sources: dataset.sources.clone(),
            created_by: dataset.created_by.clone(),
            created_at: dataset.created_at,
            updated_at: dataset.updated_at,
        }
    }
}
