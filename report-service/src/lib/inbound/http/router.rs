use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::chart::create_chart;
use super::handlers::chart::delete_chart;
use super::handlers::chart::get_chart;
use super::handlers::chart::list_charts;
use super::handlers::chart::render_chart;
use super::handlers::chart::update_chart;
use super::handlers::current_user::current_user;
use super::handlers::dashboard::create_dashboard;
use super::handlers::dashboard::delete_dashboard;
use super::handlers::dashboard::get_dashboard;
use super::handlers::dashboard::list_dashboards;
use super::handlers::dashboard::update_dashboard;
use super::handlers::dataset::create_dataset;
use super::handlers::dataset::delete_dataset;
use super::handlers::dataset::get_dataset;
use super::handlers::dataset::list_datasets;
use super::handlers::dataset::update_dataset;
use super::handlers::datasource::create_datasource;
use super::handlers::datasource::delete_datasource;
use super::handlers::datasource::get_datasource;
use super::handlers::datasource::list_datasources;
use super::handlers::datasource::update_datasource;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::middleware::authenticate;
use super::middleware::PublicPaths;
use crate::chart::ports::ChartServicePort;
use crate::dashboard::ports::DashboardServicePort;
use crate::dataset::ports::DatasetServicePort;
use crate::datasource::ports::DataSourceServicePort;
use crate::user::ports::UserServicePort;

/// Shared handler state. Services are held behind their ports so either
/// repository backing can be plugged in.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub chart_service: Arc<dyn ChartServicePort>,
    pub dashboard_service: Arc<dyn DashboardServicePort>,
    pub dataset_service: Arc<dyn DatasetServicePort>,
    pub datasource_service: Arc<dyn DataSourceServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub public_paths: Arc<PublicPaths>,
    /// `None` when running on in-memory repositories.
    pub database: Option<PgPool>,
}

pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/users/me", get(current_user))
        .route("/api/v1/chart/create", post(create_chart))
        .route("/api/v1/chart/update", post(update_chart))
        .route("/api/v1/chart/delete", delete(delete_chart))
        .route("/api/v1/chart/get", get(get_chart))
        .route("/api/v1/chart/list", get(list_charts))
        .route("/api/v1/chart/render", get(render_chart))
        .route("/api/v1/dashboard/list", get(list_dashboards))
        .route("/api/v1/dashboard/create", post(create_dashboard))
        .route(
            "/api/v1/dashboard/:id",
            get(get_dashboard)
                .put(update_dashboard)
                .delete(delete_dashboard),
        )
        .route("/api/v1/datasets", get(list_datasets).post(create_dataset))
        .route(
            "/api/v1/datasets/:id",
            get(get_dataset).put(update_dataset).delete(delete_dataset),
        )
        .route(
            "/api/v1/datasources",
            get(list_datasources).post(create_datasource),
        )
        .route(
            "/api/v1/datasources/:id",
            get(get_datasource)
                .put(update_datasource)
                .delete(delete_datasource),
        );

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    // The gate wraps every route, public ones included; it bypasses them by path.
    routes
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
