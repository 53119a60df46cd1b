use super::Directory;
use crate::{error::DirectoryError, keys, store::BoundedStore};

const RAISED: &str = "yes";
const CLEARED: &str = "no";

/// Polled "viewer set changed since last check" flag.
///
/// The check reads the flag and clears it with a second, separate store call.
/// Two pollers racing between those calls may both see the change, or one may
/// clear a change raised in between before anybody reads it. Only a single
/// poller sees each raise exactly once.
#[derive(Debug, Clone)]
pub struct ChangeFlag {
    store: BoundedStore,
    key: String,
}

impl ChangeFlag {
    pub fn new(store: BoundedStore) -> Self {
        Self::with_key(store, keys::VIEWER_CHANGE_FLAG_KEY)
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

    pub async fn mark(&self) -> Result<(), DirectoryError> {
        self.store.set_scalar(&self.key, RAISED).await
    }

    /// Returns whether the flag was raised, lowering it if so.
    pub async fn check_and_clear(&self) -> Result<bool, DirectoryError> {
        let raised = self.store.get_scalar(&self.key).await?.as_deref() == Some(RAISED);

        if raised {
            self.store.set_scalar(&self.key, CLEARED).await?;
        }

        Ok(raised)
    }
}

impl Directory {
    /// Whether any viewer was added or removed since the previous check.
    pub async fn check_viewer_change_flag(&self) -> Result<bool, DirectoryError> {
        let changed = self.change_flag.check_and_clear().await?;

        tracing::debug!(changed, "viewer change flag checked");

        Ok(changed)
    }
}
