pub mod chart;
pub mod dashboard;
pub mod dataset;
pub mod datasource;
pub mod memory;
pub mod user;

pub use chart::PostgresChartRepository;
pub use dashboard::PostgresDashboardRepository;
pub use dataset::PostgresDatasetRepository;
pub use datasource::PostgresDataSourceRepository;
pub use memory::InMemoryRepository;
pub use memory::InMemoryUserRepository;
pub use user::PostgresUserRepository;

use crate::tenant::errors::RepositoryError;

/// Map a driver error, reporting unique violations as conflicts.
pub(crate) fn database_error(err: sqlx::Error) -> RepositoryError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(db_err.message().to_string());
        }
    }
    RepositoryError::Database(err.to_string())
}
