use crate::{
    commands::{reply, CommandError},
    directory::Directory,
    resp::RespValue,
};

/// Aggregates take no arguments; only the command name is needed to report misuse.
pub struct NoArguments;

impl NoArguments {
    pub fn parse(command: &str, arguments: Vec<String>) -> Result<Self, CommandError> {
        if !arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments(command.to_string()));
        }

        Ok(Self)
    }
}

/// Represents the parsed arguments for the SERVERS LOAD command
pub struct ServerLoadArguments {
    /// Distribution server reporting its load
    pub address: String,
    /// Reported bitrate, stored as given
    pub bitrate: String,
}

impl ServerLoadArguments {
    /// Parses `[address, bitrate]`.
    ///
    /// # Returns
    ///
    /// * `Ok(ServerLoadArguments)` - The address and bitrate, unvalidated
    /// * `Err(CommandError::WrongNumberOfArguments)` - If there are not exactly 2 arguments
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        let [address, bitrate]: [String; 2] = arguments
            .try_into()
            .map_err(|_| CommandError::WrongNumberOfArguments("SERVERS LOAD".to_string()))?;

        Ok(Self { address, bitrate })
    }
}

/// Handles VIEWERS STATS: uploader id to its number of viewers.
pub async fn viewer_stats(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    NoArguments::parse("VIEWERS STATS", arguments)?;

    let counts = directory.viewer_uploader_counts().await?;

    Ok(reply::counts(&counts).encode())
}

/// Handles VIEWERS LIST: uploader id to the ids of its viewers.
pub async fn viewer_lists(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    NoArguments::parse("VIEWERS LIST", arguments)?;

    let lists = directory.viewers_by_uploader().await?;

    Ok(reply::lists(&lists).encode())
}

/// Handles VIEWERS GETSERVERS.
///
/// Replies with a two-element array: the viewer id to server list mapping,
/// followed by the server bitrate table.
pub async fn viewer_servers(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    NoArguments::parse("VIEWERS GETSERVERS", arguments)?;

    let overview = directory.viewer_server_overview().await?;

    Ok(RespValue::Array(vec![
        reply::lists(&overview.servers),
        reply::fields(&overview.bitrates),
    ])
    .encode())
}

/// Handles SERVERS STATS: server address to the number of viewer lists naming it.
pub async fn server_stats(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    NoArguments::parse("SERVERS STATS", arguments)?;

    let counts = directory.server_load_counts().await?;

    Ok(reply::counts(&counts).encode())
}

pub async fn server_bitrates(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    NoArguments::parse("SERVERS BITRATES", arguments)?;

    let bitrates = directory.bitrates().await?;

    Ok(reply::fields(&bitrates).encode())
}

/// Handles the SERVERS LOAD command.
///
/// # Arguments
///
/// * `directory` - The session directory
/// * `arguments` - `[address, bitrate]`
///
/// # Returns
///
/// * `Ok(String)` - A RESP-encoded "OK" simple string on success
/// * `Err(CommandError::WrongNumberOfArguments)` - If there are not exactly 2 arguments
/// * `Err(CommandError::Directory)` - If the address is empty or the store fails
///
/// # Examples
///
/// ```ignore
/// // SERVERS LOAD 10.0.0.1:8080 2500
/// let result = server_load(&directory, vec!["10.0.0.1:8080".to_string(), "2500".to_string()]).await;
/// // Returns: "+OK\r\n"
/// ```
pub async fn server_load(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    let server_load_arguments = ServerLoadArguments::parse(arguments)?;

    directory
        .report_server_load(
            &server_load_arguments.address,
            &server_load_arguments.bitrate,
        )
        .await?;

    Ok(RespValue::ok().encode())
}
