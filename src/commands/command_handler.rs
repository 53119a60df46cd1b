use crate::{
    commands::{
        command_error::CommandError,
        distribution::{update_servers, uploader_servers},
        modification::check_viewer_changes,
        ping::ping,
        stats::{server_bitrates, server_load, server_stats, viewer_lists, viewer_servers, viewer_stats},
        uploader::{add_uploader, delete_uploader, get_uploader, list_uploaders, publish_times},
        viewer::{add_viewer, delete_viewer, get_viewer},
    },
    directory::Directory,
    keys::EntityKind,
    resp::RespValue,
};

/// Roles that are followed by a sub-command word, as in `VIEWER ADD`.
const ROLES: [&str; 8] = [
    "VIEWER",
    "VIEWERS",
    "UPLOADER",
    "UPLOADERS",
    "SERVERS",
    "UPLOADER_SERVERS",
    "VIEWER_SERVERS",
    "PUBLISHTIME",
];

#[derive(Debug, PartialEq, Clone)]
pub struct CommandHandler {
    pub name: String,
    pub arguments: Vec<String>,
}

impl CommandHandler {
    pub fn new(input: RespValue) -> Result<Self, CommandError> {
        let RespValue::Array(elements) = input else {
            return Err(CommandError::InvalidCommand);
        };

        let mut words = Vec::with_capacity(elements.len());
        for element in elements {
            match element {
                RespValue::BulkString(s) => words.push(s),
                _ => return Err(CommandError::InvalidCommandArgument),
            }
        }

        let mut words = words.into_iter();
        let Some(role) = words.next().map(|role| role.to_uppercase()) else {
            return Err(CommandError::InvalidCommand);
        };

        let name = if ROLES.contains(&role.as_str()) || role == "MODIF" {
            let Some(command) = words.next() else {
                return Err(CommandError::WrongNumberOfArguments(role));
            };

            format!("{} {}", role, command.to_uppercase())
        } else {
            role
        };

        Ok(Self {
            name,
            arguments: words.collect(),
        })
    }

    pub async fn handle(&self, directory: &Directory) -> Result<String, CommandError> {
        let arguments = self.arguments.clone();

        match self.name.as_str() {
            "PING" => ping(arguments),
            "VIEWER ADD" => add_viewer(directory, arguments).await,
            "VIEWER DEL" => delete_viewer(directory, arguments).await,
            "VIEWER GET" => get_viewer(directory, arguments).await,
            "UPLOADER ADD" => add_uploader(directory, arguments).await,
            "UPLOADER DEL" => delete_uploader(directory, arguments).await,
            "UPLOADER GET" => get_uploader(directory, arguments).await,
            "VIEWERS STATS" => viewer_stats(directory, arguments).await,
            "VIEWERS LIST" => viewer_lists(directory, arguments).await,
            "VIEWERS GETSERVERS" => viewer_servers(directory, arguments).await,
            "SERVERS STATS" => server_stats(directory, arguments).await,
            "SERVERS BITRATES" => server_bitrates(directory, arguments).await,
            "SERVERS LOAD" => server_load(directory, arguments).await,
            "UPLOADER_SERVERS UPDATE" => {
                update_servers(EntityKind::Uploader, directory, arguments).await
            }
            "VIEWER_SERVERS UPDATE" => {
                update_servers(EntityKind::Viewer, directory, arguments).await
            }
            "UPLOADER_SERVERS GET" => uploader_servers(directory, arguments).await,
            "UPLOADERS LIST" => list_uploaders(directory, arguments).await,
            "PUBLISHTIME GET" => publish_times(directory, arguments).await,
            "MODIF VERIF" => check_viewer_changes(directory, arguments).await,
            _ => Err(CommandError::UnknownCommand(self.name.clone())),
        }
    }
}
