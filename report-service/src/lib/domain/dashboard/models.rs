use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use uuid::Uuid;

use crate::tenant::models::TenantId;
use crate::tenant::ports::TenantScoped;

pub const STATUS_ACTIVE: i32 = 1;

const DEFAULT_WIDTH: i32 = 1920;
const DEFAULT_HEIGHT: i32 = 1080;
const DEFAULT_BACKGROUND: &str = "#0a0e27";

/// Canvas composed of positioned components.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub id: DashboardId,
    pub tenant_id: TenantId,
    pub name: String,
    pub code: String,
    pub config: DashboardConfig,
    pub components: Vec<DashboardComponent>,
    pub thumbnail: String,
    pub status: i32,
    pub view_count: i64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantScoped for Dashboard {
    type Id = DashboardId;

    fn id(&self) -> &DashboardId {
        &self.id
    }

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Dashboard unique identifier type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DashboardId(String);

impl DashboardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DashboardId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for DashboardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DashboardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for DashboardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Canvas settings. Missing fields decode as zero or empty; see `or_defaults`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
    #[serde(default)]
    pub background_color: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background_color: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Replace zero or empty fields by the defaults.
    pub fn or_defaults(self) -> Self {
        let defaults = Self::default();
        Self {
            width: if self.width == 0 { defaults.width } else { self.width },
            height: if self.height == 0 { defaults.height } else { self.height },
            background_color: if self.background_color.is_empty() {
                defaults.background_color
            } else {
                self.background_color
            },
        }
    }

    /// Whether the config carries a size, the signal that an update means it.
    pub fn is_sized(&self) -> bool {
        self.width != 0 || self.height != 0
    }

    /// Decode a stored document, falling back to the defaults.
    pub fn from_document(document: &str) -> Self {
        serde_json::from_str(document).unwrap_or_else(|e| {
            if !document.is_empty() {
                tracing::warn!(error = %e, "Stored dashboard config unreadable, using defaults");
            }
            Self::default()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardComponent {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub width: i32,
    pub height: i32,
    pub x: i32,
    pub y: i32,
    pub visible: bool,
    pub locked: bool,
    pub style: Map<String, Value>,
    pub data: Map<String, Value>,
    pub interaction: Map<String, Value>,
}

impl DashboardComponent {
    /// Decode stored components, falling back to none.
    pub fn list_from_document(document: &str) -> Vec<Self> {
        serde_json::from_str(document).unwrap_or_else(|e| {
            if !document.is_empty() {
                tracing::warn!(error = %e, "Stored dashboard components unreadable, using none");
            }
            Vec::new()
        })
    }
}

/// Command to create a dashboard.
#[derive(Debug, Clone)]
pub struct CreateDashboardCommand {
    pub tenant_id: TenantId,
    pub name: String,
    pub code: String,
    pub config: DashboardConfig,
    pub components: Vec<DashboardComponent>,
    pub thumbnail: String,
    pub created_by: String,
}

/// Command to update a dashboard. `None` leaves a field unchanged.
#[derive(Debug, Clone)]
pub struct UpdateDashboardCommand {
    pub id: DashboardId,
    pub tenant_id: TenantId,
    pub name: Option<String>,
    pub code: Option<String>,
    pub config: Option<DashboardConfig>,
    pub components: Option<Vec<DashboardComponent>>,
    pub thumbnail: Option<String>,
    pub status: Option<i32>,
}
