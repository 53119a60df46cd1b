use crate::{
    commands::{reply, stats::NoArguments, CommandError},
    directory::{Directory, Distribution},
    keys::EntityKind,
    resp::RespValue,
};

/// Server assignments sent as repeated `<id> <n> <server>{n}` groups.
#[derive(Debug, PartialEq)]
pub struct DistributionArguments {
    pub assignments: Distribution,
}

impl DistributionArguments {
    /// Parses command arguments into a DistributionArguments structure.
    ///
    /// # Arguments
    ///
    /// * `arguments` - One or more groups of an entity id, a server count `n`,
    ///   then exactly `n` server addresses. A count of 0 clears that entity's list
    ///
    /// # Returns
    ///
    /// * `Ok(DistributionArguments)` - The assignments keyed by entity id
    /// * `Err(CommandError::Directory(DirectoryError::Validation))` - If:
    ///   - no group is given
    ///   - a group ends before its count
    ///   - the count is not a non-negative integer
    ///   - fewer than `n` servers follow the count
    ///   - an id appears in two groups
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let result = DistributionArguments::parse(vec![
    ///     "1".to_string(), "2".to_string(), "s1".to_string(), "s2".to_string(),
    ///     "2".to_string(), "0".to_string(),
    /// ]);
    /// // Returns: Ok(DistributionArguments { assignments: {"1": ["s1", "s2"], "2": []} })
    ///
    /// let result = DistributionArguments::parse(vec!["1".to_string(), "3".to_string(), "s1".to_string()]);
    /// // Returns: Err(..), "expected 3 servers for '1', got 1"
    /// ```
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.is_empty() {
            return Err(CommandError::validation("assignments must be present"));
        }

        let mut assignments = Distribution::new();
        let mut arguments = arguments.into_iter();

        while let Some(id) = arguments.next() {
            let Some(count) = arguments.next() else {
                return Err(CommandError::validation(format!(
                    "missing server count for '{}'",
                    id
                )));
            };

            let count = count.parse::<usize>().map_err(|_| {
                CommandError::validation(format!(
                    "server count for '{}' must be a non-negative integer, got '{}'",
                    id, count
                ))
            })?;

            let servers: Vec<String> = arguments.by_ref().take(count).collect();
            if servers.len() != count {
                return Err(CommandError::validation(format!(
                    "expected {} servers for '{}', got {}",
                    count,
                    id,
                    servers.len()
                )));
            }

            if assignments.insert(id.clone(), servers).is_some() {
                return Err(CommandError::validation(format!(
                    "'{}' is assigned more than once",
                    id
                )));
            }
        }

        Ok(Self { assignments })
    }
}

/// Handles `VIEWER_SERVERS UPDATE` and `UPLOADER_SERVERS UPDATE`.
///
/// Every listed entity's server list is replaced in one store pipeline.
/// Entities not named in the request keep their lists.
///
/// # Arguments
///
/// * `kind` - Whether the ids name viewers or uploaders
/// * `directory` - The session directory
/// * `arguments` - The `<id> <n> <server>{n}` groups
///
/// # Returns
///
/// * `Ok(String)` - A RESP-encoded "OK" simple string on success
/// * `Err(CommandError::Directory)` - If the groups are malformed or the store fails
pub async fn update_servers(
    kind: EntityKind,
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    let distribution_arguments = DistributionArguments::parse(arguments)?;

    directory
        .update_distribution(kind, &distribution_arguments.assignments)
        .await?;

    Ok(RespValue::ok().encode())
}

/// Handles `UPLOADER_SERVERS GET`: uploader id to its server list.
pub async fn uploader_servers(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    NoArguments::parse("UPLOADER_SERVERS GET", arguments)?;

    let distribution = directory.uploader_server_distribution().await?;

    Ok(reply::lists(&distribution).encode())
}
