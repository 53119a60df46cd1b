use crate::{commands::CommandError, resp::RespValue};

pub struct PingArguments;

impl PingArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if !arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments("PING".to_string()));
        }

        Ok(Self)
    }
}

/// Handles the PING command.
///
/// # Returns
///
/// * `Ok(String)` - `+PONG\r\n`
/// * `Err(CommandError::WrongNumberOfArguments)` - If any argument is given
pub fn ping(arguments: Vec<String>) -> Result<String, CommandError> {
    PingArguments::parse(arguments)?;

    Ok(RespValue::SimpleString("PONG".to_string()).encode())
}
