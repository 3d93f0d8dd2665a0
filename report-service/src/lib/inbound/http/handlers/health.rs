use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn health(State(state): State<AppState>) -> ApiSuccess<HealthData> {
    let database = match &state.database {
        None => "memory",
        Some(pool) => match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => "connected",
            Err(e) => {
                tracing::warn!(error = %e, "Database ping failed");
                "disconnected"
            }
        },
    };

    ApiSuccess::new(
        StatusCode::OK,
        "success",
        HealthData {
            status: "ok".to_string(),
            database: database.to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthData {
    pub status: String,
    pub database: String,
}
