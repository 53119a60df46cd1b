use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use tokio::time::timeout;

use super::{DirectoryStore, Pipeline, Reply, ScanPage, StoreError};
use crate::error::DirectoryError;

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// A store handle whose every call is bounded by a timeout.
///
/// Store failures are translated into [`DirectoryError`] here, so the rest of
/// the directory only ever deals with one error type. Nothing is retried.
#[derive(Clone)]
pub struct BoundedStore {
    inner: Arc<dyn DirectoryStore>,
    timeout: Duration,
}

impl std::fmt::Debug for BoundedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedStore")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl BoundedStore {
    pub fn new(inner: Arc<dyn DirectoryStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, DirectoryError> {
        match timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                tracing::warn!(operation, error = %err, "store call failed");
                Err(err.into())
            }
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "store call timed out"
                );
                Err(DirectoryError::StoreTimeout(self.timeout))
            }
        }
    }

    pub async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, DirectoryError> {
        self.bounded("get_field", self.inner.get_field(key, field))
            .await
    }

    pub async fn get_all_fields(&self, key: &str) -> Result<HashMap<String, String>, DirectoryError> {
        self.bounded("get_all_fields", self.inner.get_all_fields(key))
            .await
    }

    pub async fn set_fields(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> Result<(), DirectoryError> {
        self.bounded("set_fields", self.inner.set_fields(key, fields))
            .await
    }

    pub async fn range(&self, key: &str, start: isize, end: isize) -> Result<Vec<String>, DirectoryError> {
        self.bounded("range", self.inner.range(key, start, end))
            .await
    }

    pub async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<ScanPage, DirectoryError> {
        self.bounded("scan", self.inner.scan(cursor, pattern, count))
            .await
    }

    pub async fn execute(&self, pipeline: Pipeline) -> Result<Vec<Reply>, DirectoryError> {
        let queued = pipeline.len();
        let replies = self
            .bounded("execute", self.inner.execute(pipeline))
            .await?;

        if replies.len() != queued {
            return Err(DirectoryError::StoreUnavailable(format!(
                "pipeline returned {} replies for {} operations",
                replies.len(),
                queued
            )));
        }

        Ok(replies)
    }

    pub async fn set_scalar(&self, key: &str, value: &str) -> Result<(), DirectoryError> {
        self.bounded("set_scalar", self.inner.set_scalar(key, value))
            .await
    }

    pub async fn get_scalar(&self, key: &str) -> Result<Option<String>, DirectoryError> {
        self.bounded("get_scalar", self.inner.get_scalar(key))
            .await
    }
}
