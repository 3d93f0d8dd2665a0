use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::tenant::models::TenantId;
use crate::tenant::ports::TenantScoped;

/// Connection kinds a datasource may describe.
pub const SUPPORTED_TYPES: [&str; 6] = ["mysql", "postgres", "mongodb", "excel", "csv", "api"];

/// Connection profile a dataset reads from.
///
/// `password` is stored as given and never leaves the service; `Debug` masks it.
#[derive(Clone, PartialEq)]
pub struct DataSource {
    pub id: DataSourceId,
    pub tenant_id: TenantId,
    pub name: String,
    pub source_type: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("id", &self.id)
            .field("tenant_id", &self.tenant_id)
            .field("name", &self.name)
            .field("source_type", &self.source_type)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl TenantScoped for DataSource {
    type Id = DataSourceId;

    fn id(&self) -> &DataSourceId {
        &self.id
    }

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataSourceId(String);

impl DataSourceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DataSourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for DataSourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DataSourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for DataSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a datasource for a tenant.
///
/// `port` is kept wide so out-of-range input reaches validation.
#[derive(Clone)]
pub struct CreateDataSourceCommand {
    pub tenant_id: TenantId,
    pub name: String,
    pub source_type: String,
    pub host: String,
    pub port: i64,
    pub database: String,
    pub username: String,
    pub password: String,
    pub created_by: String,
}

/// Command to update a datasource. `None` leaves a field unchanged.
#[derive(Clone)]
pub struct UpdateDataSourceCommand {
    pub id: DataSourceId,
    pub tenant_id: TenantId,
    pub name: Option<String>,
    pub source_type: Option<String>,
    pub host: Option<String>,
    pub port: Option<i64>,
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}
