use thiserror::Error;

use crate::{error::DirectoryError, resp::RespValue};

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("invalid command")]
    InvalidCommand,
    #[error("invalid command argument")]
    InvalidCommandArgument,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("wrong number of arguments for '{0}' command")]
    WrongNumberOfArguments(String),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl CommandError {
    pub fn as_string(&self) -> String {
        match self {
            CommandError::InvalidCommand => {
                RespValue::Error("ERR Invalid command".to_string()).encode()
            }
            CommandError::InvalidCommandArgument => {
                RespValue::Error("ERR Invalid command argument".to_string()).encode()
            }
            CommandError::UnknownCommand(name) => {
                RespValue::Error(format!("ERR unknown command '{}'", name)).encode()
            }
            CommandError::WrongNumberOfArguments(name) => RespValue::Error(format!(
                "ERR wrong number of arguments for '{}' command",
                name
            ))
            .encode(),
            CommandError::Directory(err) => err.as_string(),
        }
    }

    /// Shorthand for input that parses but is out of range for the directory.
    pub fn validation(message: impl Into<String>) -> Self {
        CommandError::Directory(DirectoryError::validation(message))
    }
}
