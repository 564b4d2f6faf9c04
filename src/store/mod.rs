//! Hosted record store collaborator
//!
//! Persistence is delegated to a hosted service that exposes generic
//! `select` / `insert` / `update` operations over JSON rows. The provider has
//! no typed error taxonomy, so `StoreError` carries message strings only.

mod object;
mod rest;

pub use object::{ObjectStore, RestObjectStore};
pub use rest::RestStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Record store errors. Message strings only; the hosted provider surfaces a
/// generic error message with no taxonomy of its own.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record store request failed: {0}")]
    Request(String),

    #[error("Record store rejected the operation: {0}")]
    Rejected(String),

    #[error("Record store returned an unreadable row: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Request(err.to_string())
    }
}

/// Equality filter on a table column
pub type Filter<'a> = (&'a str, &'a str);

/// Generic record store contract consumed by every service.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch rows matching all filters (conjunctive equality).
    async fn select(&self, table: &str, filters: &[Filter<'_>]) -> Result<Vec<Value>, StoreError>;

    /// Insert a record, returning the stored row.
    async fn insert(&self, table: &str, record: Value) -> Result<Value, StoreError>;

    /// Patch rows matching all filters.
    async fn update(
        &self,
        table: &str,
        filters: &[Filter<'_>],
        patch: Value,
    ) -> Result<(), StoreError>;
}

/// Select rows and deserialize them into a typed model.
pub async fn select_as<T: DeserializeOwned>(
    store: &dyn RecordStore,
    table: &str,
    filters: &[Filter<'_>],
) -> Result<Vec<T>, StoreError> {
    let rows = store.select(table, filters).await?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| StoreError::Decode(e.to_string())))
        .collect()
}

/// Select at most one row and deserialize it.
pub async fn select_one_as<T: DeserializeOwned>(
    store: &dyn RecordStore,
    table: &str,
    filters: &[Filter<'_>],
) -> Result<Option<T>, StoreError> {
    Ok(select_as(store, table, filters).await?.into_iter().next())
}
