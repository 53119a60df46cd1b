use crate::{
    commands::{reply, CommandError},
    directory::Directory,
    resp::RespValue,
};

/// Represents the parsed arguments for the VIEWER ADD command
pub struct AddViewerArguments {
    /// Id of the viewer session being opened
    pub id_viewer: i64,
    /// Id of the uploader whose stream the viewer watches
    pub id_uploader: i64,
}

impl AddViewerArguments {
    /// Parses command arguments into an AddViewerArguments structure.
    ///
    /// # Arguments
    ///
    /// * `arguments` - Exactly two strings: `[id_viewer, id_uploader]`
    ///
    /// # Returns
    ///
    /// * `Ok(AddViewerArguments)` - Both ids parsed as integers. Negative ids are
    ///   rejected later by the directory
    /// * `Err(CommandError::WrongNumberOfArguments)` - If there are not exactly 2 arguments
    /// * `Err(CommandError::Directory(DirectoryError::Validation))` - If an id is not an
    ///   integer
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let result = AddViewerArguments::parse(vec!["7".to_string(), "3".to_string()]);
    /// // Returns: Ok(AddViewerArguments { id_viewer: 7, id_uploader: 3 })
    ///
    /// let result = AddViewerArguments::parse(vec!["seven".to_string(), "3".to_string()]);
    /// // Returns: Err(CommandError::Directory(..)), "id_viewer must be an integer, got 'seven'"
    /// ```
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 2 {
            return Err(CommandError::WrongNumberOfArguments("VIEWER ADD".to_string()));
        }

        Ok(Self {
            id_viewer: reply::parse_id("id_viewer", &arguments[0])?,
            id_uploader: reply::parse_id("id_uploader", &arguments[1])?,
        })
    }
}

/// `VIEWER DEL` and `VIEWER GET` both take a single viewer id.
pub struct ViewerIdArguments {
    pub id_viewer: i64,
}

impl ViewerIdArguments {
    /// Parses the single viewer id. `command` names the request in the
    /// wrong-arity error.
    pub fn parse(command: &str, arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 1 {
            return Err(CommandError::WrongNumberOfArguments(command.to_string()));
        }

        Ok(Self {
            id_viewer: reply::parse_id("id_viewer", &arguments[0])?,
        })
    }
}

/// Handles the VIEWER ADD command.
///
/// Records a viewer session against an uploader and raises the viewer change
/// flag. The uploader does not need to exist.
///
/// # Arguments
///
/// * `directory` - The session directory
/// * `arguments` - `[id_viewer, id_uploader]`
///
/// # Returns
///
/// * `Ok(String)` - A RESP-encoded "OK" simple string on success
/// * `Err(CommandError::WrongNumberOfArguments)` - If there are not exactly 2 arguments
/// * `Err(CommandError::Directory)` - If an id is invalid or the store fails
///
/// # Examples
///
/// ```ignore
/// // VIEWER ADD 7 3
/// let result = add_viewer(&directory, vec!["7".to_string(), "3".to_string()]).await;
/// // Returns: "+OK\r\n"
/// ```
pub async fn add_viewer(directory: &Directory, arguments: Vec<String>) -> Result<String, CommandError> {
    let add_viewer_arguments = AddViewerArguments::parse(arguments)?;

    directory
        .add_viewer(
            add_viewer_arguments.id_viewer,
            add_viewer_arguments.id_uploader,
        )
        .await?;

    Ok(RespValue::ok().encode())
}

/// Handles the VIEWER DEL command. Deleting an unknown viewer still replies OK.
pub async fn delete_viewer(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    let viewer_arguments = ViewerIdArguments::parse("VIEWER DEL", arguments)?;

    directory.delete_viewer(viewer_arguments.id_viewer).await?;

    Ok(RespValue::ok().encode())
}

/// Handles the VIEWER GET command.
///
/// # Returns
///
/// * `Ok(String)` - A flattened `id_uploader`, `date_started`, `servers` mapping,
///   or a null bulk string when the viewer is unknown
/// * `Err(CommandError::WrongNumberOfArguments)` - If there is not exactly 1 argument
/// * `Err(CommandError::Directory)` - If the id is invalid or the store fails
pub async fn get_viewer(directory: &Directory, arguments: Vec<String>) -> Result<String, CommandError> {
    let viewer_arguments = ViewerIdArguments::parse("VIEWER GET", arguments)?;

    let Some(viewer) = directory.viewer(viewer_arguments.id_viewer).await? else {
        return Ok(RespValue::Null.encode());
    };

    Ok(RespValue::Array(vec![
        RespValue::BulkString("id_uploader".to_string()),
        optional(viewer.id_uploader),
        RespValue::BulkString("date_started".to_string()),
        optional(viewer.date_started),
        RespValue::BulkString("servers".to_string()),
        RespValue::bulk_string_array(viewer.servers),
    ])
    .encode())
}

pub(crate) fn optional(value: Option<String>) -> RespValue {
    match value {
        Some(value) => RespValue::BulkString(value),
        None => RespValue::Null,
    }
}
