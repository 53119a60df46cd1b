use crate::{
    commands::{stats::NoArguments, CommandError},
    directory::Directory,
    resp::RespValue,
};

/// Answers whether the viewer population changed since the previous check,
/// clearing the flag when it did.
pub async fn check_viewer_changes(
    directory: &Directory,
    arguments: Vec<String>,
) -> Result<String, CommandError> {
    NoArguments::parse("MODIF VERIF", arguments)?;

    let changed = directory.check_viewer_change_flag().await?;
    let answer = if changed { "yes" } else { "no" };

    Ok(RespValue::BulkString(answer.to_string()).encode())
}
