use super::Directory;
use crate::{
    error::DirectoryError,
    keys,
    store::{Pipeline, Reply},
};

pub(super) const ID_UPLOADER_FIELD: &str = "id_uploader";
pub(super) const DATE_STARTED_FIELD: &str = "date_started";
pub(super) const TITLE_FIELD: &str = "title";
pub(super) const PUBLISH_TIME_FIELD: &str = "publishTime";

#[derive(Debug, PartialEq, Clone)]
pub struct Viewer {
    pub id_uploader: Option<String>,
    pub date_started: Option<String>,
    pub servers: Vec<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Uploader {
    pub title: Option<String>,
    pub publish_time: Option<String>,
    pub tags: Vec<String>,
    pub servers: Vec<String>,
}

impl Directory {
    /// Registers a viewer watching `id_uploader` and raises the change flag.
    ///
    /// The uploader is not required to exist. Adding a viewer again rewrites
    /// its record and keeps its server list.
    ///
    /// # Arguments
    ///
    /// * `id_viewer` - Id of the viewer session, must not be negative
    /// * `id_uploader` - Id of the watched uploader, must not be negative
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The record is written and the flag raised
    /// * `Err(DirectoryError::Validation)` - If an id is negative; nothing is written
    /// * `Err(DirectoryError::StoreUnavailable)` / `Err(DirectoryError::StoreTimeout)` -
    ///   If the store fails. The record may already be written when the flag write fails
    ///
    /// # Examples
    ///
    /// ```ignore
    /// directory.add_viewer(7, 3).await?;
    /// // viewer:7 now holds id_uploader = "3" and a date_started timestamp
    /// ```
    pub async fn add_viewer(&self, id_viewer: i64, id_uploader: i64) -> Result<(), DirectoryError> {
        let id_viewer = validate_id("id_viewer", id_viewer)?;
        let id_uploader = validate_id("id_uploader", id_uploader)?;

        self.store
            .set_fields(
                &keys::viewer_key(&id_viewer)?,
                &[
                    (ID_UPLOADER_FIELD.to_string(), id_uploader.clone()),
                    (DATE_STARTED_FIELD.to_string(), timestamp()),
                ],
            )
            .await?;

        self.change_flag.mark().await?;

        tracing::info!(viewer = %id_viewer, uploader = %id_uploader, "viewer added");

        Ok(())
    }

    /// Removes a viewer record together with its server list.
    ///
    /// Deleting an unknown viewer succeeds and leaves the change flag alone.
    pub async fn delete_viewer(&self, id_viewer: i64) -> Result<(), DirectoryError> {
        let id_viewer = validate_id("id_viewer", id_viewer)?;

        let mut pipeline = Pipeline::new();
        pipeline
            .delete_key(keys::viewer_key(&id_viewer)?)
            .delete_key(keys::viewer_servers_key(&id_viewer)?);

        let replies = self.store.execute(pipeline).await?;
        if matches!(replies.first(), Some(Reply::Removed(true))) {
            self.change_flag.mark().await?;
            tracing::info!(viewer = %id_viewer, "viewer deleted");
        }

        Ok(())
    }

    /// Reads a viewer record with its server list, or `None` when no record
    /// exists. A server list alone does not make a viewer.
    pub async fn viewer(&self, id_viewer: i64) -> Result<Option<Viewer>, DirectoryError> {
        let id_viewer = validate_id("id_viewer", id_viewer)?;

        let mut pipeline = Pipeline::new();
        pipeline
            .get_all_fields(keys::viewer_key(&id_viewer)?)
            .range_all(keys::viewer_servers_key(&id_viewer)?);

        let mut replies = self.store.execute(pipeline).await?.into_iter();
        let mut fields = replies.next().map(|reply| reply.into_fields()).unwrap_or_default();
        let servers = replies.next().map(|reply| reply.into_list()).unwrap_or_default();

        if fields.is_empty() {
            return Ok(None);
        }

        Ok(Some(Viewer {
            id_uploader: fields.remove(ID_UPLOADER_FIELD),
            date_started: fields.remove(DATE_STARTED_FIELD),
            servers,
        }))
    }

    /// Registers an uploader with its title and tags. The tag list is
    /// replaced, not merged, when the uploader is added again.
    ///
    /// # Arguments
    ///
    /// * `id_uploader` - Id of the uploader session, must not be negative
    /// * `title` - Stream title, must not be empty
    /// * `tags` - Tags kept in the given order; may be empty
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Record, publish time and tags are written in one batch
    /// * `Err(DirectoryError::Validation)` - If the id is negative or the title empty
    /// * `Err(DirectoryError::StoreUnavailable)` / `Err(DirectoryError::StoreTimeout)` -
    ///   If the store fails
    pub async fn add_uploader(
        &self,
        id_uploader: i64,
        title: &str,
        tags: &[String],
    ) -> Result<(), DirectoryError> {
        let id_uploader = validate_id("id_uploader", id_uploader)?;

        if title.is_empty() {
            return Err(DirectoryError::validation("title must not be empty"));
        }

        let tags_key = keys::uploader_tags_key(&id_uploader)?;

        let mut pipeline = Pipeline::new();
        pipeline
            .set_fields(
                keys::uploader_key(&id_uploader)?,
                vec![
                    (TITLE_FIELD.to_string(), title.to_string()),
                    (PUBLISH_TIME_FIELD.to_string(), timestamp()),
                ],
            )
            .delete_key(tags_key.clone())
            // pushed back to front so the list reads in submission order
            .push_front(tags_key, tags.iter().rev().cloned().collect());

        self.store.execute(pipeline).await?;

        tracing::info!(uploader = %id_uploader, tags = tags.len(), "uploader added");

        Ok(())
    }

    /// Removes an uploader record along with its tag and server lists.
    pub async fn delete_uploader(&self, id_uploader: i64) -> Result<(), DirectoryError> {
        let id_uploader = validate_id("id_uploader", id_uploader)?;

        let mut pipeline = Pipeline::new();
        pipeline
            .delete_key(keys::uploader_key(&id_uploader)?)
            .delete_key(keys::uploader_tags_key(&id_uploader)?)
            .delete_key(keys::uploader_servers_key(&id_uploader)?);

        self.store.execute(pipeline).await?;

        tracing::info!(uploader = %id_uploader, "uploader deleted");

        Ok(())
    }

    /// Reads an uploader record with its tags and servers, or `None` when no
    /// record exists.
    pub async fn uploader(&self, id_uploader: i64) -> Result<Option<Uploader>, DirectoryError> {
        let id_uploader = validate_id("id_uploader", id_uploader)?;

        let mut pipeline = Pipeline::new();
        pipeline
            .get_all_fields(keys::uploader_key(&id_uploader)?)
            .range_all(keys::uploader_tags_key(&id_uploader)?)
            .range_all(keys::uploader_servers_key(&id_uploader)?);

        let mut replies = self.store.execute(pipeline).await?.into_iter();
        let mut fields = replies.next().map(|reply| reply.into_fields()).unwrap_or_default();
        let tags = replies.next().map(|reply| reply.into_list()).unwrap_or_default();
        let servers = replies.next().map(|reply| reply.into_list()).unwrap_or_default();

        if fields.is_empty() {
            return Ok(None);
        }

        Ok(Some(Uploader {
            title: fields.remove(TITLE_FIELD),
            publish_time: fields.remove(PUBLISH_TIME_FIELD),
            tags,
            servers,
        }))
    }
}

fn validate_id(name: &str, id: i64) -> Result<String, DirectoryError> {
    if id < 0 {
        return Err(DirectoryError::validation(format!(
            "{} must not be negative, got {}",
            name, id
        )));
    }

    Ok(id.to_string())
}

/// Local time in ISO-8601 with offset, e.g. `2016-08-02T15:44:09-05:00`.
fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%:z")
        .to_string()
}
