//! Load statistics computed for the replication decision-maker.
//!
//! Every aggregate has the same shape: enumerate the candidate keys, queue one
//! read per key, execute the batch once and fold the replies. The result is a
//! best-effort picture as of scan time, not a serializable snapshot. A failed
//! batch fails the whole aggregate; no partial result is returned.

use std::collections::BTreeMap;

use super::{
    sessions::{ID_UPLOADER_FIELD, PUBLISH_TIME_FIELD},
    Counts, Directory, Distribution,
};
use crate::{
    error::DirectoryError,
    keys::{self, EntityKind},
    store::Pipeline,
};

/// Server assignments of every viewer, with the bitrate each server reports.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ViewerServerOverview {
    pub servers: Distribution,
    pub bitrates: BTreeMap<String, String>,
}

impl Directory {
    /// Number of viewers currently watching each uploader. Viewers without an
    /// `id_uploader` field are not counted.
    pub async fn viewer_uploader_counts(&self) -> Result<Counts, DirectoryError> {
        let mut counts = Counts::new();

        for (_, uploader) in self.read_viewer_uploaders().await? {
            if let Some(uploader) = uploader {
                *counts.entry(uploader).or_insert(0) += 1;
            }
        }

        tracing::debug!(uploaders = counts.len(), "viewer counts computed");

        Ok(counts)
    }

    /// Viewer ids grouped by the uploader they watch.
    pub async fn viewers_by_uploader(&self) -> Result<Distribution, DirectoryError> {
        let mut lists = Distribution::new();

        for (viewer, uploader) in self.read_viewer_uploaders().await? {
            if let Some(uploader) = uploader {
                lists.entry(uploader).or_default().push(viewer);
            }
        }

        Ok(lists)
    }

    /// How many times each server appears across all viewer server lists.
    ///
    /// Counts occurrences, not distinct viewers: a server listed twice by the
    /// same viewer counts twice.
    pub async fn server_load_counts(&self) -> Result<Counts, DirectoryError> {
        let mut counts = Counts::new();

        for servers in self.read_server_lists(EntityKind::Viewer).await?.into_values() {
            for server in servers {
                *counts.entry(server).or_insert(0) += 1;
            }
        }

        tracing::debug!(servers = counts.len(), "server load computed");

        Ok(counts)
    }

    pub async fn bitrates(&self) -> Result<BTreeMap<String, String>, DirectoryError> {
        self.bitrates.all().await
    }

    /// Records the bitrate an edge server reports for itself.
    ///
    /// # Arguments
    ///
    /// * `address` - The reporting server, must not be empty
    /// * `bitrate` - Stored verbatim; a later report from the same server replaces it
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The bitrate table holds the new value
    /// * `Err(DirectoryError::Validation)` - If `address` is empty
    /// * `Err(DirectoryError::StoreUnavailable)` / `Err(DirectoryError::StoreTimeout)` -
    ///   If the store fails
    pub async fn report_server_load(
        &self,
        address: &str,
        bitrate: &str,
    ) -> Result<(), DirectoryError> {
        self.bitrates.report(address, bitrate).await
    }

    /// Publication time of every uploader that has one.
    pub async fn uploader_publish_times(
        &self,
    ) -> Result<BTreeMap<String, String>, DirectoryError> {
        let uploaders = self.list_uploaders().await?;
        if uploaders.is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut pipeline = Pipeline::new();
        for id in &uploaders {
            pipeline.get_field(keys::uploader_key(id)?, PUBLISH_TIME_FIELD);
        }

        let replies = self.store.execute(pipeline).await?;

        Ok(uploaders
            .into_iter()
            .zip(replies)
            .filter_map(|(id, reply)| reply.into_value().map(|time| (id, time)))
            .collect())
    }

    /// Each viewer's server list, read together with the bitrate table.
    pub async fn viewer_server_overview(&self) -> Result<ViewerServerOverview, DirectoryError> {
        let servers = self.read_server_lists(EntityKind::Viewer).await?;
        let bitrates = self.bitrates.all().await?;

        Ok(ViewerServerOverview { servers, bitrates })
    }

    /// Pairs every viewer id with the uploader it points at.
    async fn read_viewer_uploaders(
        &self,
    ) -> Result<Vec<(String, Option<String>)>, DirectoryError> {
        let viewers = self.list_viewers().await?;
        if viewers.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipeline = Pipeline::new();
        for id in &viewers {
            pipeline.get_field(keys::viewer_key(id)?, ID_UPLOADER_FIELD);
        }

        let replies = self.store.execute(pipeline).await?;

        Ok(viewers
            .into_iter()
            .zip(replies.into_iter().map(|reply| reply.into_value()))
            .collect())
    }
}
