use std::collections::HashSet;

use super::Directory;
use crate::{
    error::DirectoryError,
    keys::{self, EntityKind, KeyClass},
};

impl Directory {
    /// Ids of every viewer record, in scan order.
    pub async fn list_viewers(&self) -> Result<Vec<String>, DirectoryError> {
        self.list_records(EntityKind::Viewer, keys::VIEWER_PATTERN)
            .await
    }

    /// Ids of every uploader record, in scan order. Tag and server lists are
    /// not uploaders and are left out.
    pub async fn list_uploaders(&self) -> Result<Vec<String>, DirectoryError> {
        self.list_records(EntityKind::Uploader, keys::UPLOADER_PATTERN)
            .await
    }

    /// Ids owning a server list of the given kind, in scan order.
    pub(crate) async fn list_server_lists(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<String>, DirectoryError> {
        let keys = self.scan_all(kind.servers_pattern()).await?;
        let mut ids = Vec::with_capacity(keys.len());

        for key in keys {
            match classify_scanned(&key, kind)? {
                KeyClass::ViewerServers(id) | KeyClass::UploaderServers(id) => ids.push(id),
                _ => (),
            }
        }

        Ok(ids)
    }

    async fn list_records(
        &self,
        kind: EntityKind,
        pattern: &str,
    ) -> Result<Vec<String>, DirectoryError> {
        let keys = self.scan_all(pattern).await?;
        let mut ids = Vec::with_capacity(keys.len());

        for key in keys {
            let class = classify_scanned(&key, kind)?;

            if class.is_record() {
                ids.push(class.id().to_string());
            }
        }

        tracing::debug!(kind = %kind, count = ids.len(), "listed records");

        Ok(ids)
    }

    /// Drains a scan cursor.
    ///
    /// The batch size is only a hint to the store, so the loop runs until the
    /// cursor comes back to zero no matter how many keys a page carries. A key
    /// reported twice while the key space shifts underneath is kept once.
    pub(crate) async fn scan_all(&self, pattern: &str) -> Result<Vec<String>, DirectoryError> {
        let mut cursor = 0;
        let mut seen = HashSet::new();
        let mut keys = Vec::new();

        loop {
            let page = self.store.scan(cursor, pattern, self.scan_count).await?;

            tracing::debug!(
                pattern,
                cursor,
                next_cursor = page.cursor,
                matched = page.keys.len(),
                "scan page"
            );

            for key in page.keys {
                if seen.insert(key.clone()) {
                    keys.push(key);
                }
            }

            cursor = page.cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(keys)
    }
}

fn classify_scanned(key: &str, expected: EntityKind) -> Result<KeyClass, DirectoryError> {
    let class = match keys::classify(key) {
        Ok(class) if class.kind() == expected => class,
        Ok(_) => {
            tracing::warn!(key, expected = %expected, "scan returned a key of another kind");
            return Err(DirectoryError::MalformedKey(key.to_string()));
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "unclassifiable key in directory namespace");
            return Err(err.into());
        }
    };

    Ok(class)
}
