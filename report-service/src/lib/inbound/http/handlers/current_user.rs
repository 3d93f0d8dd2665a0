use auth::Principal;
use axum::http::StatusCode;

use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentPrincipal;

pub async fn current_user(CurrentPrincipal(principal): CurrentPrincipal) -> ApiSuccess<Principal> {
    ApiSuccess::new(StatusCode::OK, "success", principal)
}
