//! Repository contract against a real Postgres.
//!
//! Each test creates a throwaway database. Skipped when `DATABASE_URL` is unset.

use chrono::SubsecRound;
use chrono::Utc;
use report_service::chart::models::Chart;
use report_service::chart::models::ChartId;
use report_service::chart::models::STATUS_ACTIVE;
use report_service::dashboard::models::Dashboard;
use report_service::dashboard::models::DashboardComponent;
use report_service::dashboard::models::DashboardConfig;
use report_service::dashboard::models::DashboardId;
use report_service::dataset::models::Dataset;
use report_service::dataset::models::DatasetField;
use report_service::dataset::models::DatasetId;
use report_service::dataset::models::DatasetSource;
use report_service::dataset::models::FieldKind;
use report_service::dataset::models::JoinType;
use report_service::datasource::models::DataSource;
use report_service::datasource::models::DataSourceId;
use report_service::repositories::PostgresChartRepository;
use report_service::repositories::PostgresDashboardRepository;
use report_service::repositories::PostgresDataSourceRepository;
use report_service::repositories::PostgresDatasetRepository;
use report_service::repositories::PostgresUserRepository;
use report_service::tenant::errors::RepositoryError;
use report_service::tenant::models::TenantId;
use report_service::tenant::ports::TenantScopedRepository;
use report_service::user::models::User;
use report_service::user::models::UserId;
use report_service::user::ports::UserRepository;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

/// Test database helper
struct TestDb {
    pool: PgPool,
    db_name: String,
    postgres_url: String,
}

impl TestDb {
    /// Create a new test database with a unique name, or `None` without `DATABASE_URL`
    async fn new() -> Option<Self> {
        let Ok(postgres_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping");
            return None;
        };

        let db_name = format!(
            "test_report_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&postgres_url)
            .await
            .expect("Failed to connect to Postgres");
        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = postgres_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            postgres_url,
        })
    }

    async fn drop_database(self) {
        self.pool.close().await;

        if let Ok(mut conn) = PgConnection::connect(&self.postgres_url).await {
            let _ = conn
                .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, self.db_name).as_str())
                .await;
        }
    }
}

fn tenant(id: &str) -> TenantId {
    TenantId::new(id).unwrap()
}

fn chart(id: &str, tenant_id: &str) -> Chart {
    // Postgres keeps microseconds
    let now = Utc::now().trunc_subsecs(6);
    Chart {
        id: ChartId::from(id),
        tenant_id: tenant(tenant_id),
        name: format!("chart {}", id),
        code: id.to_string(),
        chart_type: "bar".to_string(),
        config: r#"{"title":"t","series":[]}"#.to_string(),
        status: STATUS_ACTIVE,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_chart_repository_roundtrip() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresChartRepository::new(db.pool.clone());
    let stored = chart("chart-1", "tenant-1");

    repository.create(&stored).await.unwrap();
    let loaded = repository.get(&stored.id, &stored.tenant_id).await.unwrap();
    assert_eq!(loaded, stored);

    let mut updated = loaded.clone();
    updated.name = "renamed".to_string();
    updated.updated_at = Utc::now().trunc_subsecs(6);
    repository.update(&updated).await.unwrap();
    assert_eq!(
        repository.get(&stored.id, &stored.tenant_id).await.unwrap().name,
        "renamed"
    );

    repository.delete(&stored.id, &stored.tenant_id).await.unwrap();
    assert!(matches!(
        repository.get(&stored.id, &stored.tenant_id).await,
        Err(RepositoryError::NotFound(_))
    ));
    assert!(repository.list(&stored.tenant_id).await.unwrap().is_empty());
    assert!(matches!(
        repository.delete(&stored.id, &stored.tenant_id).await,
        Err(RepositoryError::NotFound(_))
    ));

    db.drop_database().await;
}

#[tokio::test]
async fn test_chart_repository_cross_tenant_access() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresChartRepository::new(db.pool.clone());
    let stored = chart("chart-1", "tenant-1");
    repository.create(&stored).await.unwrap();

    let intruder = tenant("tenant-2");
    assert!(matches!(
        repository.get(&stored.id, &intruder).await,
        Err(RepositoryError::NotFound(_))
    ));
    assert!(matches!(
        repository.delete(&stored.id, &intruder).await,
        Err(RepositoryError::NotFound(_))
    ));

    let mut hijacked = stored.clone();
    hijacked.tenant_id = intruder.clone();
    hijacked.name = "hijacked".to_string();
    assert!(matches!(
        repository.update(&hijacked).await,
        Err(RepositoryError::NotFound(_))
    ));
    assert!(repository.list(&intruder).await.unwrap().is_empty());

    assert_eq!(
        repository.get(&stored.id, &stored.tenant_id).await.unwrap(),
        stored
    );

    db.drop_database().await;
}

#[tokio::test]
async fn test_chart_repository_list_order() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresChartRepository::new(db.pool.clone());

    let mut old = chart("old", "tenant-1");
    old.updated_at = old.updated_at - chrono::Duration::minutes(5);
    repository.create(&old).await.unwrap();
    repository.create(&chart("new", "tenant-1")).await.unwrap();
    repository.create(&chart("other", "tenant-2")).await.unwrap();

    let ids: Vec<String> = repository
        .list(&tenant("tenant-1"))
        .await
        .unwrap()
        .into_iter()
        .map(|chart| chart.id.to_string())
        .collect();
    assert_eq!(ids, vec!["new".to_string(), "old".to_string()]);

    db.drop_database().await;
}

#[tokio::test]
async fn test_dashboard_repository_roundtrip() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresDashboardRepository::new(db.pool.clone());
    let now = Utc::now().trunc_subsecs(6);
    let stored = Dashboard {
        id: DashboardId::new(),
        tenant_id: tenant("tenant-1"),
        name: "Ops".to_string(),
        code: "ops".to_string(),
        config: DashboardConfig::default(),
        components: vec![DashboardComponent {
            id: "c-1".to_string(),
            component_type: "chart".to_string(),
            x: 10,
            visible: true,
            ..DashboardComponent::default()
        }],
        thumbnail: String::new(),
        status: 1,
        view_count: 0,
        created_by: "user-1".to_string(),
        created_at: now,
        updated_at: now,
    };

    repository.create(&stored).await.unwrap();
    assert_eq!(
        repository.get(&stored.id, &stored.tenant_id).await.unwrap(),
        stored
    );
    assert!(matches!(
        repository.get(&stored.id, &tenant("tenant-2")).await,
        Err(RepositoryError::NotFound(_))
    ));

    repository.delete(&stored.id, &stored.tenant_id).await.unwrap();
    assert!(repository.list(&stored.tenant_id).await.unwrap().is_empty());

    db.drop_database().await;
}

#[tokio::test]
async fn test_user_repository_unique_username() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresUserRepository::new(db.pool.clone());
    let now = Utc::now().trunc_subsecs(6);
    let user = User {
        id: UserId::new(),
        username: "alice".to_string(),
        password_hash: "$argon2id$stub".to_string(),
        role: "admin".to_string(),
        tenant_id: tenant("tenant-1"),
        created_at: now,
        updated_at: now,
    };

    repository.create(user.clone()).await.unwrap();
    assert_eq!(
        repository.find_by_username("alice").await.unwrap(),
        Some(user.clone())
    );
    assert_eq!(repository.find_by_username("bob").await.unwrap(), None);

    let duplicate = User {
        id: UserId::new(),
        ..user
    };
    assert!(matches!(
        repository.create(duplicate).await,
        Err(RepositoryError::Conflict(_))
    ));

    db.drop_database().await;
}

fn datasource(id: &str, tenant_id: &str) -> DataSource {
    let now = Utc::now().trunc_subsecs(6);
    DataSource {
        id: DataSourceId::from(id),
        tenant_id: tenant(tenant_id),
        name: "warehouse".to_string(),
        source_type: "postgres".to_string(),
        host: "db.internal".to_string(),
        port: 65535,
        database: "sales".to_string(),
        username: "report".to_string(),
        password: "hunter2".to_string(),
        created_by: "u-1".to_string(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_datasource_repository_roundtrip() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresDataSourceRepository::new(db.pool.clone());
    let stored = datasource("src-1", "tenant-1");

    repository.create(&stored).await.unwrap();

    assert_eq!(repository.get(&stored.id, &stored.tenant_id).await.unwrap(), stored);
    assert_eq!(
        repository.get(&stored.id, &tenant("tenant-2")).await,
        Err(RepositoryError::NotFound("src-1".to_string()))
    );
    assert_eq!(
        repository.delete(&stored.id, &tenant("tenant-2")).await,
        Err(RepositoryError::NotFound("src-1".to_string()))
    );

    db.drop_database().await;
}

#[tokio::test]
async fn test_dataset_repository_roundtrip() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresDatasetRepository::new(db.pool.clone());
    let now = Utc::now().trunc_subsecs(6);
    let mut config = serde_json::Map::new();
    config.insert("sql".to_string(), serde_json::json!("select 1"));
    let stored = Dataset {
        id: DatasetId::from("set-1"),
        tenant_id: tenant("tenant-1"),
        datasource_id: Some(DataSourceId::from("src-1")),
        name: "Sales".to_string(),
        dataset_type: "sql".to_string(),
        config,
        action: String::new(),
        status: 1,
        fields: vec![DatasetField {
            id: "f-1".to_string(),
            name: "revenue".to_string(),
            kind: FieldKind::Measure,
            ..DatasetField::default()
        }],
        sources: vec![DatasetSource {
            id: "s-1".to_string(),
            source_type: "datasource".to_string(),
            source_id: "src-1".to_string(),
            join_type: JoinType::Left,
            ..DatasetSource::default()
        }],
        created_by: "u-1".to_string(),
        created_at: now,
        updated_at: now,
    };

    repository.create(&stored).await.unwrap();
    assert_eq!(repository.get(&stored.id, &stored.tenant_id).await.unwrap(), stored);

    let mut hijacked = stored.clone();
    hijacked.tenant_id = tenant("tenant-2");
    hijacked.name = "hijacked".to_string();
    assert_eq!(
        repository.update(&hijacked).await,
        Err(RepositoryError::NotFound("set-1".to_string()))
    );
    assert!(repository.list(&tenant("tenant-2")).await.unwrap().is_empty());

    repository.delete(&stored.id, &stored.tenant_id).await.unwrap();
    assert!(repository.list(&stored.tenant_id).await.unwrap().is_empty());

    db.drop_database().await;
}
