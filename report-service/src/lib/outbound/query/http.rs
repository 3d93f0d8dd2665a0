use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use crate::dataset::errors::QueryError;
use crate::dataset::models::QueryContext;
use crate::dataset::models::QueryRequest;
use crate::dataset::models::QueryResponse;
use crate::dataset::ports::QueryExecutor;

/// Query executor backed by the dataset service's HTTP API.
///
/// Posts the request to `{base_url}/api/v1/datasets/{datasetId}/data` with the
/// caller's bearer token and reads the `{success, message, result}` envelope.
#[derive(Debug, Clone)]
pub struct HttpQueryExecutor {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    success: bool,
    #[serde(default)]
    message: String,
    result: Option<QueryResponse>,
}

impl HttpQueryExecutor {
    /// # Errors
    /// * `Unavailable` - The base URL is unusable or the HTTP client could not be built
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, QueryError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| QueryError::Unavailable(format!("invalid base url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(QueryError::Unavailable(format!(
                "invalid base url: {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QueryError::Unavailable(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, dataset_id: &str) -> Result<Url, QueryError> {
        if !is_plain_identifier(dataset_id) {
            return Err(QueryError::InvalidDataset(dataset_id.to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| QueryError::Unavailable(format!("invalid base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "v1", "datasets", dataset_id, "data"]);
        url.set_query(None);
        url.set_fragment(None);

        Ok(url)
    }
}

/// A dataset id must stay a single path segment.
fn is_plain_identifier(id: &str) -> bool {
    id != "."
        && id != ".."
        && !id.chars().any(|c| {
            matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_control() || c.is_whitespace()
        })
}

#[async_trait]
impl QueryExecutor for HttpQueryExecutor {
    async fn query(
        &self,
        ctx: &QueryContext,
        request: &QueryRequest,
    ) -> Result<QueryResponse, QueryError> {
        if request.dataset_id.is_empty() {
            return Err(QueryError::MissingDataset);
        }

        let url = self.endpoint(&request.dataset_id)?;
        tracing::debug!(
            url = %url,
            dataset_id = %request.dataset_id,
            tenant_id = %ctx.tenant_id,
            "Executing dataset query"
        );

        let mut builder = self.client.post(url).json(request);
        if let Some(token) = &ctx.bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| QueryError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(QueryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: QueryEnvelope = response
            .json()
            .await
            .map_err(|e| QueryError::InvalidResponse(e.to_string()))?;

        if !envelope.success {
            return Err(QueryError::Rejected {
                status: status.as_u16(),
                message: envelope.message,
            });
        }

        envelope
            .result
            .ok_or_else(|| QueryError::InvalidResponse("missing result".to_string()))
    }
}
