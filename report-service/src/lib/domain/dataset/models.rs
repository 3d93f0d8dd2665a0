use std::collections::BTreeMap;
use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use uuid::Uuid;

use crate::datasource::models::DataSourceId;
use crate::tenant::models::TenantId;
use crate::tenant::ports::TenantScoped;

pub const STATUS_ACTIVE: i32 = 1;

/// Dataset kinds. `sql` datasets read through a datasource.
pub const DATASET_TYPES: [&str; 3] = ["sql", "api", "file"];

/// One result row, keyed by field name.
pub type Row = Map<String, Value>;

/// Caller on whose behalf a query runs.
///
/// Executors that leave the process forward `bearer` so the dataset service
/// applies the caller's own tenant scoping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    pub tenant_id: TenantId,
    pub bearer: Option<String>,
}

impl QueryContext {
    pub fn new(tenant_id: TenantId, bearer: Option<String>) -> Self {
        Self { tenant_id, bearer }
    }
}

/// Query against a dataset, as understood by the dataset service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryRequest {
    pub dataset_id: String,
    pub fields: Vec<String>,
    pub filters: Vec<Filter>,
    pub sort_by: String,
    pub sort_order: String,
    pub page: i64,
    pub page_size: i64,
    pub group_by: Vec<String>,
    pub aggregations: BTreeMap<String, Aggregation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    pub field: String,
    pub operator: String,
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aggregation {
    pub function: String,
    pub field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryResponse {
    pub data: Vec<Row>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    /// Milliseconds spent by the executor.
    pub execution_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<Map<String, Value>>,
}

impl QueryResponse {
    /// Response carrying `rows` and nothing else.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            total: rows.len() as i64,
            data: rows,
            ..Self::default()
        }
    }

    /// Values of `field` in row order, skipping rows that lack it.
    pub fn column(&self, field: &str) -> Vec<Value> {
        self.data
            .iter()
            .filter_map(|row| row.get(field).cloned())
            .collect()
    }
}

/// Named, typed view over one or more sources that charts query by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub id: DatasetId,
    pub tenant_id: TenantId,
    pub datasource_id: Option<DataSourceId>,
    pub name: String,
    pub dataset_type: String,
    pub config: Map<String, Value>,
    pub action: String,
    pub status: i32,
    pub fields: Vec<DatasetField>,
    pub sources: Vec<DatasetSource>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dataset {
    pub fn requires_datasource(dataset_type: &str) -> bool {
        dataset_type == "sql"
    }
}

impl TenantScoped for Dataset {
    type Id = DatasetId;

    fn id(&self) -> &DatasetId {
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
pub struct DatasetId(String);

impl DatasetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for DatasetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DatasetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Dimension,
    Measure,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldDataType {
    #[default]
    String,
    Number,
    Date,
    Boolean,
}

/// Column exposed by a dataset. Computed fields carry an `expression`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetField {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub data_type: FieldDataType,
    pub is_computed: bool,
    pub expression: String,
    pub is_sortable: bool,
    pub is_groupable: bool,
    pub default_sort_order: String,
    pub sort_index: i32,
    pub config: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

/// Input joined into a dataset, in `sort_index` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetSource {
    pub id: String,
    pub source_type: String,
    pub source_id: String,
    pub source_config: Map<String, Value>,
    pub join_type: JoinType,
    pub join_condition: String,
    pub sort_index: i32,
}

/// Command to create a dataset for a tenant.
#[derive(Debug, Clone)]
pub struct CreateDatasetCommand {
    pub tenant_id: TenantId,
    pub datasource_id: Option<DataSourceId>,
    pub name: String,
    pub dataset_type: String,
    pub config: Map<String, Value>,
    pub action: String,
    pub fields: Vec<DatasetField>,
    pub sources: Vec<DatasetSource>,
    pub created_by: String,
}

/// Command to update a dataset. `None` leaves a field unchanged.
#[derive(Debug, Clone)]
pub struct UpdateDatasetCommand {
    pub id: DatasetId,
    pub tenant_id: TenantId,
    pub name: Option<String>,
    pub config: Option<Map<String, Value>>,
    pub action: Option<String>,
    pub status: Option<i32>,
    pub fields: Option<Vec<DatasetField>>,
    pub sources: Option<Vec<DatasetSource>>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_query_request_accepts_partial_document() {
        let request: QueryRequest =
            serde_json::from_value(json!({ "fields": ["revenue"], "pageSize": 50 })).unwrap();

        assert_eq!(request.dataset_id, "");
        assert_eq!(request.fields, vec!["revenue".to_string()]);
        assert_eq!(request.page_size, 50);
        assert!(request.aggregations.is_empty());
    }

    #[test]
    fn test_column_skips_rows_without_field() {
        let response = QueryResponse::from_rows(vec![
            row(json!({ "revenue": 10, "month": "jan" })),
            row(json!({ "month": "feb" })),
            row(json!({ "revenue": 30 })),
        ]);

        assert_eq!(response.column("revenue"), vec![json!(10), json!(30)]);
        assert_eq!(response.total, 3);
    }

    #[test]
    fn test_field_decodes_kind_and_data_type() {
        let field: DatasetField = serde_json::from_value(json!({
            "name": "revenue",
            "type": "measure",
            "dataType": "number",
            "isSortable": true
        }))
        .unwrap();

        assert_eq!(field.kind, FieldKind::Measure);
        assert_eq!(field.data_type, FieldDataType::Number);
        assert!(field.is_sortable);
        assert!(!field.is_computed);
    }

    #[test]
    fn test_field_rejects_unknown_kind() {
        let result = serde_json::from_value::<DatasetField>(json!({ "name": "a", "type": "metric" }));

        assert!(result.is_err());
    }

    #[test]
    fn test_source_defaults_to_inner_join() {
        let source: DatasetSource =
            serde_json::from_value(json!({ "sourceType": "datasource", "sourceId": "src-1" })).unwrap();

        assert_eq!(source.join_type, JoinType::Inner);
        assert_eq!(source.source_id, "src-1");
    }
}
