use std::collections::HashSet;

use auth::AuthorizationError;
use auth::Principal;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use serde::Deserialize;

use super::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::tenant::models::TenantId;

const BEARER_PREFIX: &str = "Bearer ";

/// Paths served without a token, matched exactly.
#[derive(Debug, Clone, Default)]
pub struct PublicPaths(HashSet<String>);

impl PublicPaths {
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }
}

impl<S: Into<String>> FromIterator<S> for PublicPaths {
    fn from_iter<I: IntoIterator<Item = S>>(paths: I) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

/// Raw bearer token of an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Request gate chained before every handler.
///
/// Public paths pass through untouched. Anything else needs a bearer token
/// that is neither revoked nor invalid; the resulting principal and the raw
/// token are published as request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.public_paths.contains(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let token = bearer_token(&req).ok_or_else(|| {
        tracing::warn!(path = %req.uri().path(), "Missing authorization token");
        ApiError::Unauthorized("missing authorization token".to_string())
    })?;

    let principal = state
        .authenticator
        .authorize(&token, Utc::now())
        .map_err(|e| {
            tracing::warn!(path = %req.uri().path(), error = %e, "Bearer token rejected");
            match e {
                AuthorizationError::TokenRevoked => {
                    ApiError::Unauthorized("token revoked".to_string())
                }
                AuthorizationError::Invalid(_) => {
                    ApiError::Unauthorized("invalid or expired token".to_string())
                }
            }
        })?;

    tracing::debug!(
        user_id = %principal.user_id,
        tenant_id = %principal.tenant_id,
        "Request authenticated"
    );

    req.extensions_mut().insert(BearerToken(token));
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Token from the `Authorization` header, else from the `token` query parameter.
fn bearer_token(req: &Request) -> Option<String> {
    let from_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(strip_bearer)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    from_header.or_else(|| {
        Query::<TokenQuery>::try_from_uri(req.uri())
            .ok()
            .and_then(|Query(query)| query.token)
            .map(|token| strip_bearer(&token).to_string())
            .filter(|token| !token.is_empty())
    })
}

fn strip_bearer(value: &str) -> &str {
    value.strip_prefix(BEARER_PREFIX).unwrap_or(value).trim()
}

/// Principal set by the gate. Rejects with 401 when absent.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or_else(|| ApiError::Unauthorized("missing authorization token".to_string()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<BearerToken>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("missing authorization token".to_string()))
    }
}

/// Caller's tenant, the scope of every repository call.
///
/// Rejects with 403 when the request carries no principal or the principal
/// has no tenant.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: TenantId,
    pub user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<Principal>()
            .ok_or_else(|| ApiError::Forbidden("tenant not found".to_string()))?;

        Ok(Self {
            tenant_id: TenantId::new(principal.tenant_id.clone())?,
            user_id: principal.user_id.clone(),
        })
    }
}
