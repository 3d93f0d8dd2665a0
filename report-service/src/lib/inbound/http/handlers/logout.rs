use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;

use super::ApiSuccess;
use crate::inbound::http::middleware::BearerToken;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;

/// Revoke the caller's own token until it would have expired.
pub async fn logout(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    BearerToken(token): BearerToken,
) -> ApiSuccess<()> {
    state.authenticator.revoke(&token, &principal, Utc::now());
    tracing::info!(
        user_id = %principal.user_id,
        expires_at = %principal.expires_at,
        "Token revoked on logout"
    );

    ApiSuccess::message(StatusCode::OK, "logout success")
}
