use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use uuid::Uuid;

use super::errors::ChartError;
use crate::dataset::models::QueryRequest;
use crate::tenant::models::TenantId;
use crate::tenant::ports::TenantScoped;

/// Status assigned to every newly created chart.
pub const STATUS_ACTIVE: i32 = 1;

/// Persisted chart definition.
///
/// `config` holds the serialized [`ChartConfig`] exactly as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub id: ChartId,
    pub tenant_id: TenantId,
    pub name: String,
    pub code: String,
    pub chart_type: String,
    pub config: String,
    pub status: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantScoped for Chart {
    type Id = ChartId;

    fn id(&self) -> &ChartId {
        &self.id
    }

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Chart unique identifier type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartId(String);

impl ChartId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ChartId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for ChartId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ChartId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Declarative chart document: title, axes, series and free-form params.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<AxisConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<AxisConfig>,
    #[serde(default)]
    pub series: Vec<Series>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl ChartConfig {
    /// # Errors
    /// * `InvalidConfig` - The document does not match the chart config schema
    pub fn parse(document: &str) -> Result<Self, ChartError> {
        serde_json::from_str(document).map_err(|e| ChartError::InvalidConfig(e.to_string()))
    }

    pub fn to_document(&self) -> Result<String, ChartError> {
        serde_json::to_string(self).map_err(|e| ChartError::InvalidConfig(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    #[serde(rename = "type")]
    pub axis_type: String,
    pub data: Vec<Value>,
    pub name: String,
}

/// One series of a chart.
///
/// On the wire a series is `{name, type, data, datasetId?, query?}`; a
/// `datasetId` makes it dataset-bound. An empty `datasetId`, or a `query`
/// without a `datasetId`, is rejected rather than read as a literal series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesRecord", into = "SeriesRecord")]
pub struct Series {
    pub name: String,
    pub series_type: String,
    pub data: Vec<Value>,
    pub source: SeriesSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesSource {
    /// `data` is authored and never rewritten.
    Literal,
    /// `data` is filled from the dataset at render time.
    Dataset(DatasetBinding),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBinding {
    pub dataset_id: String,
    pub query: QueryRequest,
}

impl DatasetBinding {
    /// The embedded query, addressed to the bound dataset.
    pub fn request(&self) -> QueryRequest {
        QueryRequest {
            dataset_id: self.dataset_id.clone(),
            ..self.query.clone()
        }
    }
}

impl Series {
    pub fn literal(name: impl Into<String>, series_type: impl Into<String>, data: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            series_type: series_type.into(),
            data,
            source: SeriesSource::Literal,
        }
    }

    pub fn bound(
        name: impl Into<String>,
        series_type: impl Into<String>,
        dataset_id: impl Into<String>,
        query: QueryRequest,
    ) -> Self {
        Self {
            name: name.into(),
            series_type: series_type.into(),
            data: Vec::new(),
            source: SeriesSource::Dataset(DatasetBinding {
                dataset_id: dataset_id.into(),
                query,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesRecord {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    series_type: String,
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dataset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query: Option<QueryRequest>,
}

impl TryFrom<SeriesRecord> for Series {
    type Error = String;

    fn try_from(record: SeriesRecord) -> Result<Self, Self::Error> {
        let source = match (record.dataset_id, record.query) {
            (Some(dataset_id), _) if dataset_id.trim().is_empty() => {
                return Err(format!("series {:?}: datasetId must not be empty", record.name));
            }
            (Some(dataset_id), query) => SeriesSource::Dataset(DatasetBinding {
                dataset_id,
                query: query.unwrap_or_default(),
            }),
            (None, Some(_)) => {
                return Err(format!("series {:?}: query requires a datasetId", record.name));
            }
            (None, None) => SeriesSource::Literal,
        };

        Ok(Self {
            name: record.name,
            series_type: record.series_type,
            data: record.data,
            source,
        })
    }
}

impl From<Series> for SeriesRecord {
    fn from(series: Series) -> Self {
        let (dataset_id, query) = match series.source {
            SeriesSource::Literal => (None, None),
            SeriesSource::Dataset(binding) => (Some(binding.dataset_id), Some(binding.query)),
        };

        Self {
            name: series.name,
            series_type: series.series_type,
            data: series.data,
            dataset_id,
            query,
        }
    }
}

/// Command to create a chart for a tenant.
#[derive(Debug, Clone)]
pub struct CreateChartCommand {
    pub tenant_id: TenantId,
    pub name: String,
    pub code: String,
    pub chart_type: String,
    pub config: ChartConfig,
}

/// Command to update a chart. `None` leaves a field unchanged.
///
/// `config` replaces the stored document only when it carries series.
#[derive(Debug, Clone)]
pub struct UpdateChartCommand {
    pub id: ChartId,
    pub tenant_id: TenantId,
    pub name: Option<String>,
    pub code: Option<String>,
    pub chart_type: Option<String>,
    pub config: Option<ChartConfig>,
}
