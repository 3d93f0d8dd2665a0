use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = payload?;
    if body.username.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest("invalid request".to_string()));
    }

    let user = state
        .user_service
        .verify_credentials(&body.username, &body.password)
        .await
        .map_err(|e| {
            tracing::warn!(username = %body.username, error = %e, "Login failed");
            ApiError::from(e)
        })?;

    let issued = state
        .authenticator
        .issue(&user.identity(), Utc::now())
        .map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Token issuance failed");
            ApiError::InternalServerError("failed to generate token".to_string())
        })?;

    tracing::info!(user_id = %user.id, tenant_id = %user.tenant_id, "User logged in");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "login success",
        LoginResponseData {
            token: issued.token,
            expires_at: issued.expires_at,
            user: (&user).into(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseData {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub role: String,
    pub tenant_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            tenant_id: user.tenant_id.to_string(),
            created_at: user.created_at,
        }
    }
}
