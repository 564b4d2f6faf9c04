//! PostgREST-style adapter for the hosted record store

use async_trait::async_trait;
use serde_json::Value;

use super::{Filter, RecordStore, StoreError};

/// Record store adapter speaking the hosted provider's REST API:
/// `GET/POST/PATCH {base}/rest/v1/{table}` with `col=eq.val` filters and an
/// api-key header pair.
pub struct RestStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn query_pairs(filters: &[Filter<'_>]) -> Vec<(String, String)> {
        filters
            .iter()
            .map(|(col, val)| ((*col).to_string(), format!("eq.{}", val)))
            .collect()
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected(format!("{}: {}", status, body)))
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn select(&self, table: &str, filters: &[Filter<'_>]) -> Result<Vec<Value>, StoreError> {
        let response = self
            .authed(self.http.get(self.table_url(table)))
            .query(&Self::query_pairs(filters))
            .send()
            .await?;
        let rows: Vec<Value> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(rows)
    }

    async fn insert(&self, table: &str, record: Value) -> Result<Value, StoreError> {
        let response = self
            .authed(self.http.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;
        let mut rows: Vec<Value> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        rows.pop()
            .ok_or_else(|| StoreError::Decode("insert returned no row".to_string()))
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter<'_>],
        patch: Value,
    ) -> Result<(), StoreError> {
        let response = self
            .authed(self.http.patch(self.table_url(table)))
            .query(&Self::query_pairs(filters))
            .json(&patch)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
