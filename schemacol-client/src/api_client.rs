//! REST client for the schema columns resource.

use crate::config::{base_url_for_origin, validate_url, ClientConfig};
use crate::filter::ColumnFilter;
use async_trait::async_trait;
use schemacol_core::{
    from_backend_traced, to_backend, to_backend_update, ColumnId, CreateSchemaColumn, Normalized,
    SchemaColumn, WireRevision, WireSchema,
};
use serde_json::Value;
use std::time::Duration;

const COLUMNS_PATH: &str = "/schema/columns";

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// The request never got a response.
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("HTTP error! status: {status}{}", body_suffix(.body))]
    Status { status: u16, body: Option<String> },
    /// A success response whose body is not the JSON we expect.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// The client was handed an unusable URL or setting.
    #[error("Config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ApiClientError {
    fn from(err: reqwest::Error) -> Self {
        // Builder errors come from a bad URL before anything is sent.
        if err.is_builder() {
            ApiClientError::Config(err.to_string())
        } else {
            ApiClientError::Transport(err)
        }
    }
}

impl ApiClientError {
    /// HTTP status for protocol errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiClientError::Transport(_))
    }
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref().map(|b| format!(": {}", b)).unwrap_or_default()
}

/// The four operations the admin flow needs from the backend.
#[async_trait]
pub trait ColumnApi: Send + Sync {
    async fn list(&self, filter: &ColumnFilter) -> Result<Vec<SchemaColumn>, ApiClientError>;
    async fn create(&self, data: &CreateSchemaColumn) -> Result<SchemaColumn, ApiClientError>;
    async fn update(
        &self,
        id: ColumnId,
        data: &CreateSchemaColumn,
    ) -> Result<SchemaColumn, ApiClientError>;
    async fn remove(&self, id: ColumnId) -> Result<(), ApiClientError>;
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    schema: &'static WireSchema,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            schema: config.wire_revision.schema(),
        })
    }

    /// Client for an explicit base URL with no timeout.
    pub fn with_base_url(
        base_url: impl Into<String>,
        revision: WireRevision,
    ) -> Result<Self, ApiClientError> {
        let base_url = base_url.into();
        validate_url("base_url", &base_url).map_err(|e| ApiClientError::Config(e.to_string()))?;
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            schema: revision.schema(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn schema(&self) -> &WireSchema {
        self.schema
    }

    /// Point every later call at `origin`, with the fixed API path appended.
    /// A rejected origin leaves the current base URL in place.
    pub fn set_origin(&mut self, origin: &str) -> Result<(), ApiClientError> {
        validate_url("origin", origin).map_err(|e| ApiClientError::Config(e.to_string()))?;
        self.base_url = base_url_for_origin(origin);
        tracing::info!(base_url = %self.base_url, "API base URL changed");
        Ok(())
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, COLUMNS_PATH)
    }

    fn item_url(&self, id: ColumnId) -> String {
        format!("{}{}/{}", self.base_url, COLUMNS_PATH, id)
    }

    pub async fn list(&self, filter: &ColumnFilter) -> Result<Vec<SchemaColumn>, ApiClientError> {
        let url = self.collection_url();
        let pairs = filter.query_pairs(self.schema);
        let mut request = self.client.get(&url);
        if !pairs.is_empty() {
            request = request.query(&pairs);
        }
        tracing::debug!(method = "GET", %url, ?filter, "Listing schema columns");

        let response = request.send().await?;
        let text = self.success_body("GET", &url, response).await?;
        let items: Vec<Value> = serde_json::from_str(&text)?;
        Ok(items.iter().map(|item| self.read_record(item)).collect())
    }

    pub async fn create(&self, data: &CreateSchemaColumn) -> Result<SchemaColumn, ApiClientError> {
        let url = self.collection_url();
        let body = to_backend(self.schema, data);
        tracing::debug!(method = "POST", %url, field = %data.field, "Creating schema column");

        let response = self.client.post(&url).json(&body).send().await?;
        self.parse_record("POST", &url, response).await
    }

    /// Replace the whole record. Optional fields left out of `data` are
    /// cleared on the backend.
    pub async fn update(
        &self,
        id: ColumnId,
        data: &CreateSchemaColumn,
    ) -> Result<SchemaColumn, ApiClientError> {
        let url = self.item_url(id);
        let body = to_backend_update(self.schema, id, data);
        tracing::debug!(method = "PUT", %url, column_id = id, "Updating schema column");

        let response = self.client.put(&url).json(&body).send().await?;
        self.parse_record("PUT", &url, response).await
    }

    pub async fn remove(&self, id: ColumnId) -> Result<(), ApiClientError> {
        let url = self.item_url(id);
        tracing::debug!(method = "DELETE", %url, column_id = id, "Deleting schema column");

        let response = self.client.delete(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!(method = "DELETE", %url, status = status.as_u16(), "Request succeeded");
            return Ok(());
        }
        Err(self.status_error("DELETE", &url, response).await)
    }

    async fn parse_record(
        &self,
        method: &'static str,
        url: &str,
        response: reqwest::Response,
    ) -> Result<SchemaColumn, ApiClientError> {
        let text = self.success_body(method, url, response).await?;
        let value: Value = serde_json::from_str(&text)?;
        Ok(self.read_record(&value))
    }

    /// Body text of a success response, or the status error.
    async fn success_body(
        &self,
        method: &'static str,
        url: &str,
        response: reqwest::Response,
    ) -> Result<String, ApiClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(self.status_error(method, url, response).await);
        }
        tracing::debug!(method, %url, status = status.as_u16(), "Request succeeded");
        Ok(response.text().await?)
    }

    async fn status_error(
        &self,
        method: &'static str,
        url: &str,
        response: reqwest::Response,
    ) -> ApiClientError {
        let status = response.status().as_u16();
        // The status is the error; a body we cannot read is just missing detail.
        let body = response.text().await.ok().filter(|text| !text.trim().is_empty());
        tracing::warn!(method, %url, status, body = ?body, "Request failed");
        ApiClientError::Status { status, body }
    }

    fn read_record(&self, value: &Value) -> SchemaColumn {
        let Normalized { record, anomalies } = from_backend_traced(self.schema, value);
        for anomaly in &anomalies {
            tracing::warn!(column_id = record.column_id, %anomaly, "Normalized backend field");
        }
        record
    }
}

#[async_trait]
impl ColumnApi for RestClient {
    async fn list(&self, filter: &ColumnFilter) -> Result<Vec<SchemaColumn>, ApiClientError> {
        RestClient::list(self, filter).await
    }

    async fn create(&self, data: &CreateSchemaColumn) -> Result<SchemaColumn, ApiClientError> {
        RestClient::create(self, data).await
    }

    async fn update(
        &self,
        id: ColumnId,
        data: &CreateSchemaColumn,
    ) -> Result<SchemaColumn, ApiClientError> {
        RestClient::update(self, id, data).await
    }

    async fn remove(&self, id: ColumnId) -> Result<(), ApiClientError> {
        RestClient::remove(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiClientError::Status {
            status: 404,
            body: Some("column not found".to_string()),
        };
        assert_eq!(err.to_string(), "HTTP error! status: 404: column not found");
        assert!(err.is_not_found());
        assert!(!err.is_transport());

        let err = ApiClientError::Status {
            status: 500,
            body: None,
        };
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn test_urls() {
        let client = RestClient::with_base_url("http://localhost:1/api/", WireRevision::Current).unwrap();
        assert_eq!(client.collection_url(), "http://localhost:1/api/schema/columns");
        assert_eq!(client.item_url(12), "http://localhost:1/api/schema/columns/12");
    }

    #[test]
    fn test_set_origin_appends_suffix() {
        let mut client = RestClient::new(&ClientConfig::default()).unwrap();
        assert_eq!(client.base_url(), crate::config::DEFAULT_BASE_URL);
        client.set_origin("http://127.0.0.1:4000").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:4000/erpapi/panel");
    }

    #[test]
    fn test_set_origin_rejects_bad_origin() {
        let mut client = RestClient::new(&ClientConfig::default()).unwrap();
        for origin in ["", "   ", "www.example.com", "ftp://files.example.com"] {
            let err = client.set_origin(origin).unwrap_err();
            assert!(matches!(err, ApiClientError::Config(_)), "{origin:?}: {err:?}");
            assert!(!err.is_transport());
        }
        assert_eq!(client.base_url(), crate::config::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_error_is_config_error() {
        let builder_err = reqwest::Client::new()
            .get("not a url/schema/columns")
            .build()
            .unwrap_err();
        assert!(builder_err.is_builder());
        let err = ApiClientError::from(builder_err);
        assert!(matches!(err, ApiClientError::Config(_)), "{err:?}");
    }

    #[test]
    fn test_schema_follows_revision() {
        let client = RestClient::with_base_url("http://localhost:1", WireRevision::Legacy).unwrap();
        assert_eq!(client.schema().column_id, "ColumnId");
        assert_eq!(client.schema().base_category_param, "baseId");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        assert!(matches!(
            RestClient::with_base_url("  ", WireRevision::Current),
            Err(ApiClientError::Config(_))
        ));
        assert!(matches!(
            RestClient::with_base_url("localhost:8080/api", WireRevision::Current),
            Err(ApiClientError::Config(_))
        ));
    }
}
