use std::collections::BTreeMap;

use crate::{error::DirectoryError, keys, store::BoundedStore};

/// Server address -> bitrate table fed by the edge servers' load reports.
///
/// One process-wide hash with no versioning; concurrent reports for the same
/// server overwrite each other.
#[derive(Debug, Clone)]
pub struct BitrateTable {
    store: BoundedStore,
    key: String,
}

impl BitrateTable {
    pub fn new(store: BoundedStore) -> Self {
        Self::with_key(store, keys::BITRATE_TABLE_KEY)
    }

    pub fn with_key(store: BoundedStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn report(&self, address: &str, bitrate: &str) -> Result<(), DirectoryError> {
        if address.is_empty() {
            return Err(DirectoryError::validation("server address must not be empty"));
        }

        self.store
            .set_fields(&self.key, &[(address.to_string(), bitrate.to_string())])
            .await?;

        tracing::debug!(server = address, bitrate, "bitrate reported");

        Ok(())
    }

    pub async fn all(&self) -> Result<BTreeMap<String, String>, DirectoryError> {
        Ok(self
            .store
            .get_all_fields(&self.key)
            .await?
            .into_iter()
            .collect())
    }
}
