use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::InMemoryRevocationStore;
use auth::TokenCodec;
use report_service::chart::models::Chart;
use report_service::chart::service::ChartService;
use report_service::config::Config;
use report_service::dashboard::models::Dashboard;
use report_service::dashboard::service::DashboardService;
use report_service::dataset::models::Dataset;
use report_service::dataset::service::DatasetService;
use report_service::datasource::models::DataSource;
use report_service::datasource::service::DataSourceService;
use report_service::inbound::http::middleware::PublicPaths;
use report_service::inbound::http::router::create_router;
use report_service::inbound::http::router::AppState;
use report_service::outbound::query::HttpQueryExecutor;
use report_service::repositories::InMemoryRepository;
use report_service::repositories::InMemoryUserRepository;
use report_service::repositories::PostgresChartRepository;
use report_service::repositories::PostgresDashboardRepository;
use report_service::repositories::PostgresDataSourceRepository;
use report_service::repositories::PostgresDatasetRepository;
use report_service::repositories::PostgresUserRepository;
use report_service::user::service::UserService;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "report_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "report-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database = config.database.is_some(),
        query_executor = %config.query_executor.base_url,
        public_paths = ?config.auth.public_paths,
        "Configuration loaded"
    );

    let codec = Arc::new(TokenCodec::new());
    codec.init(config.jwt.token_settings()?)?;
    let authenticator = Arc::new(Authenticator::new(
        codec,
        Arc::new(InMemoryRevocationStore::new()),
    ));

    let query_executor = Arc::new(HttpQueryExecutor::new(
        config.query_executor.base_url.clone(),
        Duration::from_secs(config.query_executor.timeout_seconds),
    )?);

    let public_paths = Arc::new(config.auth.public_paths.iter().cloned().collect::<PublicPaths>());

    let state = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let datasources = Arc::new(PostgresDataSourceRepository::new(pg_pool.clone()));

            AppState {
                user_service: Arc::new(UserService::new(Arc::new(PostgresUserRepository::new(
                    pg_pool.clone(),
                )))),
                chart_service: Arc::new(ChartService::new(
                    Arc::new(PostgresChartRepository::new(pg_pool.clone())),
                    query_executor,
                )),
                dashboard_service: Arc::new(DashboardService::new(Arc::new(
                    PostgresDashboardRepository::new(pg_pool.clone()),
                ))),
                dataset_service: Arc::new(DatasetService::new(
                    Arc::new(PostgresDatasetRepository::new(pg_pool.clone())),
                    datasources.clone(),
                )),
                datasource_service: Arc::new(DataSourceService::new(datasources)),
                authenticator,
                public_paths,
                database: Some(pg_pool),
            }
        }
        None => {
            tracing::warn!("No database configured, using in-memory repositories");

            let datasources = Arc::new(InMemoryRepository::<DataSource>::new());

            AppState {
                user_service: Arc::new(UserService::new(Arc::new(InMemoryUserRepository::new()))),
                chart_service: Arc::new(ChartService::new(
                    Arc::new(InMemoryRepository::<Chart>::new()),
                    query_executor,
                )),
                dashboard_service: Arc::new(DashboardService::new(Arc::new(
                    InMemoryRepository::<Dashboard>::new(),
                ))),
                dataset_service: Arc::new(DatasetService::new(
                    Arc::new(InMemoryRepository::<Dataset>::new()),
                    datasources.clone(),
                )),
                datasource_service: Arc::new(DataSourceService::new(datasources)),
                authenticator,
                public_paths,
                database: None,
            }
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
