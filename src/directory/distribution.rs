use super::{Directory, Distribution};
use crate::{error::DirectoryError, keys::EntityKind, store::Pipeline};

impl Directory {
    /// Replaces the server lists of every entity named in `assignments`.
    ///
    /// Each list is deleted and pushed again in full, so nothing of the old
    /// list survives; an empty list clears the entity's assignments. Servers
    /// are pushed to the head one by one, which stores `["a", "b"]` as
    /// `["b", "a"]`.
    ///
    /// All entities go to the store in one batch. The batch is not crash-safe:
    /// if the store fails part way through, some entities keep their old list
    /// while others already have the new one.
    pub async fn update_distribution(
        &self,
        kind: EntityKind,
        assignments: &Distribution,
    ) -> Result<(), DirectoryError> {
        let mut pipeline = Pipeline::new();

        for (id, servers) in assignments {
            if id.is_empty() {
                return Err(DirectoryError::validation(format!(
                    "{} distribution contains an empty id",
                    kind
                )));
            }

            let key = kind.servers_key(id)?;
            pipeline.delete_key(key.clone()).push_front(key, servers.clone());
        }

        if pipeline.is_empty() {
            return Ok(());
        }

        self.store.execute(pipeline).await?;

        tracing::info!(kind = %kind, entities = assignments.len(), "distribution updated");

        Ok(())
    }

    pub async fn update_uploader_servers(
        &self,
        assignments: &Distribution,
    ) -> Result<(), DirectoryError> {
        self.update_distribution(EntityKind::Uploader, assignments)
            .await
    }

    pub async fn update_viewer_servers(
        &self,
        assignments: &Distribution,
    ) -> Result<(), DirectoryError> {
        self.update_distribution(EntityKind::Viewer, assignments)
            .await
    }

    /// Current server list of every uploader that has one.
    pub async fn uploader_server_distribution(&self) -> Result<Distribution, DirectoryError> {
        self.read_server_lists(EntityKind::Uploader).await
    }

    /// Reads every server list of the given kind with a single batch.
    pub(crate) async fn read_server_lists(
        &self,
        kind: EntityKind,
    ) -> Result<Distribution, DirectoryError> {
        let ids = self.list_server_lists(kind).await?;
        if ids.is_empty() {
            return Ok(Distribution::new());
        }

        let mut pipeline = Pipeline::new();
        for id in &ids {
            pipeline.range_all(kind.servers_key(id)?);
        }

        let replies = self.store.execute(pipeline).await?;

        Ok(ids
            .into_iter()
            .zip(replies)
            .map(|(id, reply)| (id, reply.into_list()))
            .collect())
    }
}
