#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::InMemoryRevocationStore;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth::TokenSettings;
use chrono::Utc;
use parking_lot::Mutex;
use report_service::chart::models::Chart;
use report_service::chart::models::ChartId;
use report_service::chart::models::STATUS_ACTIVE;
use report_service::chart::service::ChartService;
use report_service::config::default_public_paths;
use report_service::dashboard::models::Dashboard;
use report_service::dashboard::service::DashboardService;
use report_service::dataset::models::Dataset;
use report_service::dataset::service::DatasetService;
use report_service::datasource::models::DataSource;
use report_service::datasource::service::DataSourceService;
use report_service::dataset::errors::QueryError;
use report_service::dataset::models::QueryContext;
use report_service::dataset::models::QueryRequest;
use report_service::dataset::models::QueryResponse;
use report_service::dataset::ports::QueryExecutor;
use report_service::inbound::http::middleware::PublicPaths;
use report_service::inbound::http::router::create_router;
use report_service::inbound::http::router::AppState;
use report_service::repositories::InMemoryRepository;
use report_service::repositories::InMemoryUserRepository;
use report_service::tenant::models::TenantId;
use report_service::tenant::ports::TenantScopedRepository;
use report_service::user::models::CreateUserCommand;
use report_service::user::ports::UserServicePort;
use report_service::user::service::UserService;
use serde_json::Value;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Query executor answering from canned responses, keyed by dataset id.
#[derive(Default)]
pub struct StubQueryExecutor {
    responses: Mutex<HashMap<String, Result<QueryResponse, QueryError>>>,
    requests: Mutex<Vec<QueryRequest>>,
    contexts: Mutex<Vec<QueryContext>>,
    calls: AtomicUsize,
}

impl StubQueryExecutor {
    pub fn respond(&self, dataset_id: &str, response: Result<QueryResponse, QueryError>) {
        self.responses.lock().insert(dataset_id.to_string(), response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().clone()
    }

    pub fn contexts(&self) -> Vec<QueryContext> {
        self.contexts.lock().clone()
    }
}

#[async_trait]
impl QueryExecutor for StubQueryExecutor {
    async fn query(
        &self,
        ctx: &QueryContext,
        request: &QueryRequest,
    ) -> Result<QueryResponse, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        self.contexts.lock().push(ctx.clone());

        self.responses
            .lock()
            .get(&request.dataset_id)
            .cloned()
            .unwrap_or_else(|| Ok(QueryResponse::default()))
    }
}

/// Test application that spawns a real server on in-memory repositories
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub revocations: Arc<InMemoryRevocationStore>,
    pub charts: Arc<InMemoryRepository<Chart>>,
    pub dashboards: Arc<InMemoryRepository<Dashboard>>,
    pub datasets: Arc<InMemoryRepository<Dataset>>,
    pub datasources: Arc<InMemoryRepository<DataSource>>,
    pub users: Arc<UserService<InMemoryUserRepository>>,
    pub query_executor: Arc<StubQueryExecutor>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let codec = TokenCodec::with_settings(TokenSettings::new(
            JWT_SECRET,
            "goreport",
            "goreport-web",
        ))
        .expect("Failed to build token codec");
        let revocations = Arc::new(InMemoryRevocationStore::new());
        let authenticator = Arc::new(Authenticator::new(Arc::new(codec), revocations.clone()));

        let charts = Arc::new(InMemoryRepository::<Chart>::new());
        let dashboards = Arc::new(InMemoryRepository::<Dashboard>::new());
        let datasets = Arc::new(InMemoryRepository::<Dataset>::new());
        let datasources = Arc::new(InMemoryRepository::<DataSource>::new());
        let query_executor = Arc::new(StubQueryExecutor::default());

        // Cheap argon2 parameters keep the suite fast
        let hasher = PasswordHasher::with_params(
            argon2::Params::new(1024, 1, 1, None).expect("Failed to build argon2 params"),
        );
        let users = Arc::new(UserService::with_hasher(
            Arc::new(InMemoryUserRepository::new()),
            hasher,
        ));

        let state = AppState {
            user_service: users.clone(),
            chart_service: Arc::new(ChartService::new(charts.clone(), query_executor.clone())),
            dashboard_service: Arc::new(DashboardService::new(dashboards.clone())),
            dataset_service: Arc::new(DatasetService::new(datasets.clone(), datasources.clone())),
            datasource_service: Arc::new(DataSourceService::new(datasources.clone())),
            authenticator: authenticator.clone(),
            public_paths: Arc::new(default_public_paths().into_iter().collect::<PublicPaths>()),
            database: None,
        };

        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
            revocations,
            charts,
            dashboards,
            datasets,
            datasources,
            users,
            query_executor,
        }
    }

    pub async fn seed_user(&self, username: &str, password: &str, tenant_id: &str) {
        self.users
            .create_user(CreateUserCommand {
                username: username.to_string(),
                password: password.to_string(),
                role: "admin".to_string(),
                tenant_id: TenantId::new(tenant_id).expect("Invalid tenant id"),
            })
            .await
            .expect("Failed to seed user");
    }

    /// Store a chart directly, bypassing the service.
    pub async fn seed_chart(&self, id: &str, tenant_id: &str, config: &Value) {
        let now = Utc::now();
        let chart = Chart {
            id: ChartId::from(id),
            tenant_id: TenantId::new(tenant_id).expect("Invalid tenant id"),
            name: format!("chart {}", id),
            code: id.to_string(),
            chart_type: "bar".to_string(),
            config: config.to_string(),
            status: STATUS_ACTIVE,
            created_at: now,
            updated_at: now,
        };

        self.charts.create(&chart).await.expect("Failed to seed chart");
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/v1/auth/login")
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["result"]["token"]
            .as_str()
            .expect("Login response carries no token")
            .to_string()
    }

    /// Seed a user and log in as them.
    pub async fn login_as(&self, username: &str, tenant_id: &str) -> String {
        self.seed_user(username, "secret123", tenant_id).await;
        self.login(username, "secret123").await
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }
}

/// Send a request and return its status with the parsed envelope.
pub async fn send(request: reqwest::RequestBuilder) -> (reqwest::StatusCode, Value) {
    let response = request.send().await.expect("Failed to execute request");
    let status = response.status();
    let body = response.json().await.expect("Failed to parse response");
    (status, body)
}
