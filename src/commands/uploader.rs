use crate::{
    commands::{reply, viewer::optional, CommandError},
    directory::Directory,
    resp::RespValue,
};

/// Represents the parsed arguments for the UPLOADER ADD command
pub struct AddUploaderArguments {
    /// Id of the uploader session
    pub id_uploader: i64,
    /// Stream title, checked for emptiness by the directory
    pub title: String,
    /// Tags in request order
    pub tags: Vec<String>,
}

impl AddUploaderArguments {
    /// Parses command arguments into an AddUploaderArguments structure.
    ///
    /// # Arguments
    ///
    /// * `arguments` - `[id_uploader, title, tag...]`. Every word after the title
    ///   is a tag; there may be none
    ///
    /// # Returns
    ///
    /// * `Ok(AddUploaderArguments)` - The parsed id, title and tags
    /// * `Err(CommandError::WrongNumberOfArguments)` - If the id or the title is missing
    /// * `Err(CommandError::Directory(DirectoryError::Validation))` - If the id is not
    ///   an integer
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let result = AddUploaderArguments::parse(vec![
    ///     "4".to_string(),
    ///     "Morning show".to_string(),
    ///     "news".to_string(),
    /// ]);
    /// // Returns: Ok(AddUploaderArguments { id_uploader: 4, title: "Morning show", tags: ["news"] })
    /// ```
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() < 2 {
            return Err(CommandError::WrongNumberOfArguments(
                "UPLOADER ADD".to_string(),
            ));
        }

        let mut arguments = arguments.into_iter();
        let id_uploader = arguments.next().unwrap_or_default();
        let title = arguments.next().unwrap_or_default();

        Ok(Self {
            id_uploader: reply::parse_id("id_uploader", &id_uploader)?,
            title,
            tags: arguments.collect(),
        })
    }
}

/// `UPLOADER DEL` and `UPLOADER GET` both take a single uploader id.
pub struct UploaderIdArguments {
    pub id_uploader: i64,
}

impl UploaderIdArguments {
    pub fn parse(command: &str, arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 1 {
            return Err(CommandError::WrongNumberOfArguments(command.to_string()));
        }

        Ok(Self {
            id_uploader: reply::parse_id("id_uploader", &arguments[0])?,
        })
    }
}

/// Handles the UPLOADER ADD command.
///
/// Stores the uploader record with a fresh publish time and replaces its tag
/// list. Viewers are not notified.
///
/// # Arguments
///
/// * `directory` - The session directory
/// * `arguments` - `[id_uploader, title, tag...]`
///
/// # Returns
///
/// * `Ok(String)` - A RESP-encoded "OK" simple string on success
/// * `Err(CommandError::WrongNumberOfArguments)` - If fewer than 2 arguments are given
/// * `Err(CommandError::Directory)` - If the id or title is invalid, or the store fails
///
/// # Examples
///
/// ```ignore
/// // UPLOADER ADD 4 "Morning show" news live
/// let result = add_uploader(&directory, vec![
///     "4".to_string(),
///     "Morning show".to_string(),
///     "news".to_string(),
///     "live".to_string(),
/// ]).await;
/// // Returns: "+OK\r\n"
/// ```
pub async fn add_uploader(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    let add_uploader_arguments = AddUploaderArguments::parse(arguments)?;

    directory
        .add_uploader(
            add_uploader_arguments.id_uploader,
            &add_uploader_arguments.title,
            &add_uploader_arguments.tags,
        )
        .await?;

    Ok(RespValue::ok().encode())
}

/// Handles the UPLOADER DEL command, dropping the record with its tag and
/// server lists.
pub async fn delete_uploader(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    let uploader_arguments = UploaderIdArguments::parse("UPLOADER DEL", arguments)?;

    directory
        .delete_uploader(uploader_arguments.id_uploader)
        .await?;

    Ok(RespValue::ok().encode())
}

/// Handles the UPLOADER GET command.
///
/// # Returns
///
/// * `Ok(String)` - A flattened `title`, `publishTime`, `tags`, `servers` mapping,
///   or a null bulk string when the uploader is unknown
/// * `Err(CommandError::WrongNumberOfArguments)` - If there is not exactly 1 argument
/// * `Err(CommandError::Directory)` - If the id is invalid or the store fails
pub async fn get_uploader(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    let uploader_arguments = UploaderIdArguments::parse("UPLOADER GET", arguments)?;

    let Some(uploader) = directory.uploader(uploader_arguments.id_uploader).await? else {
        return Ok(RespValue::Null.encode());
    };

    Ok(RespValue::Array(vec![
        RespValue::BulkString("title".to_string()),
        optional(uploader.title),
        RespValue::BulkString("publishTime".to_string()),
        optional(uploader.publish_time),
        RespValue::BulkString("tags".to_string()),
        RespValue::bulk_string_array(uploader.tags),
        RespValue::BulkString("servers".to_string()),
        RespValue::bulk_string_array(uploader.servers),
    ])
    .encode())
}

pub async fn list_uploaders(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    if !arguments.is_empty() {
        return Err(CommandError::WrongNumberOfArguments(
            "UPLOADERS LIST".to_string(),
        ));
    }

    let uploaders = directory.list_uploaders().await?;

    Ok(RespValue::encode_array_from_strings(uploaders))
}

/// Handles the PUBLISHTIME GET command: uploader id to publish time.
pub async fn publish_times(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    if !arguments.is_empty() {
        return Err(CommandError::WrongNumberOfArguments(
            "PUBLISHTIME GET".to_string(),
        ));
    }

    let publish_times = directory.uploader_publish_times().await?;

    Ok(reply::fields(&publish_times).encode())
}
