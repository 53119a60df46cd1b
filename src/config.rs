use std::time::Duration;

use thiserror::Error;

use crate::{directory::DEFAULT_SCAN_COUNT, store::DEFAULT_STORE_TIMEOUT};

pub const DEFAULT_PORT: u16 = 10101;

#[derive(Error, Debug, PartialEq)]
pub enum CliError {
    #[error("Invalid command line flag '{0}'")]
    InvalidCommandLineFlag(String),
    #[error("Invalid value for command line flag '{0}'")]
    InvalidCommandLineFlagValue(String),
}

#[derive(Debug, PartialEq, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub store_timeout: Duration,
    pub scan_count: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            scan_count: DEFAULT_SCAN_COUNT,
        }
    }
}

impl ServerConfig {
    /// Builds the configuration from process arguments, the first of which is
    /// the program name.
    pub fn new<I: IntoIterator<Item = String>>(command_line_args: I) -> Result<Self, CliError> {
        let mut iter = command_line_args.into_iter().skip(1);
        let mut config = ServerConfig::default();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--port" => {
                    let port = parse_positive(&arg, iter.next())?;

                    config.port = u16::try_from(port)
                        .map_err(|_| CliError::InvalidCommandLineFlagValue(arg.clone()))?;
                }
                "--store-timeout-ms" => {
                    config.store_timeout = Duration::from_millis(parse_positive(&arg, iter.next())?);
                }
                "--scan-count" => {
                    let scan_count = parse_positive(&arg, iter.next())?;

                    config.scan_count = usize::try_from(scan_count)
                        .map_err(|_| CliError::InvalidCommandLineFlagValue(arg.clone()))?;
                }
                _ => return Err(CliError::InvalidCommandLineFlag(arg.clone())),
            }
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }
}

fn parse_positive(flag: &str, value: Option<String>) -> Result<u64, CliError> {
    let Some(value) = value else {
        return Err(CliError::InvalidCommandLineFlagValue(flag.to_string()));
    };

    match value.parse::<u64>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(CliError::InvalidCommandLineFlagValue(flag.to_string())),
    }
}
