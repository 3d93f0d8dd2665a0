use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::chart::errors::ChartError;
use crate::dashboard::errors::DashboardError;
use crate::dataset::errors::DatasetError;
use crate::datasource::errors::DataSourceError;
use crate::tenant::errors::TenantError;
use crate::user::errors::UserError;

pub mod chart;
pub mod current_user;
pub mod dashboard;
pub mod dataset;
pub mod datasource;
pub mod health;
pub mod login;
pub mod logout;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(message, Some(data))))
    }
}

impl ApiSuccess<()> {
    /// Success envelope without a `result` member.
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(message, None)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Failure envelope. Messages are short and never echo internal details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        (status, Json(ApiResponseBody::<()>::error(message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Request body rejected");
        ApiError::BadRequest("invalid request".to_string())
    }
}

impl From<TenantError> for ApiError {
    fn from(_: TenantError) -> Self {
        ApiError::Forbidden("tenant not found".to_string())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::UserNotFound(_) | UserError::InvalidPassword => {
                ApiError::Unauthorized("invalid credentials".to_string())
            }
            UserError::MissingUsername => ApiError::BadRequest("invalid request".to_string()),
            UserError::Password(_) | UserError::PasswordTask(_) | UserError::Repository(_) => {
                tracing::error!(error = %err, "Credential verification failed");
                ApiError::InternalServerError("failed to verify credentials".to_string())
            }
        }
    }
}

impl From<ChartError> for ApiError {
    fn from(err: ChartError) -> Self {
        match err {
            ChartError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ChartError::InvalidRequest(_) => ApiError::BadRequest("invalid request".to_string()),
            ChartError::Query(_) | ChartError::InvalidConfig(_) => {
                tracing::error!(error = %err, "Chart render failed");
                ApiError::InternalServerError("failed to render chart".to_string())
            }
            ChartError::Repository(_) => {
                tracing::error!(error = %err, "Chart persistence failed");
                ApiError::InternalServerError("failed to process chart".to_string())
            }
        }
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::NameRequired => ApiError::BadRequest(err.to_string()),
            DashboardError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DashboardError::Repository(_) => {
                tracing::error!(error = %err, "Dashboard persistence failed");
                ApiError::InternalServerError("failed to process dashboard".to_string())
            }
        }
    }
}

impl From<DatasetError> for ApiError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::InvalidRequest(_)
            | DatasetError::UnsupportedType(_)
            | DatasetError::DataSourceNotFound(_) => ApiError::BadRequest(err.to_string()),
            DatasetError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DatasetError::Repository(_) => {
                tracing::error!(error = %err, "Dataset persistence failed");
                ApiError::InternalServerError("failed to process dataset".to_string())
            }
        }
    }
}

impl From<DataSourceError> for ApiError {
    fn from(err: DataSourceError) -> Self {
        match err {
            DataSourceError::InvalidRequest(_) | DataSourceError::UnsupportedType(_) => {
                ApiError::BadRequest(err.to_string())
            }
            DataSourceError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DataSourceError::Repository(_) => {
                tracing::error!(error = %err, "Datasource persistence failed");
                ApiError::InternalServerError("failed to process datasource".to_string())
            }
        }
    }
}

/// `{success, message, result?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(message: impl Into<String>, result: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            result,
        }
    }
}

impl ApiResponseBody<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message,
            result: None,
        }
    }
}

/// `?id=` query parameter shared by the chart endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    /// # Errors
    /// * `BadRequest` - The parameter is absent or empty
    pub fn required(self) -> Result<String, ApiError> {
        self.id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("id is required".to_string()))
    }
}

/// `Some` only for non-blank strings.
pub(crate) fn provided(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}
