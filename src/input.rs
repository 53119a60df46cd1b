//! Input handling for directory connections.
//!
//! Bridges raw TCP data and parsed RESP requests. Bytes are accumulated in a
//! per-connection buffer so that a request split across several reads is
//! decoded once it is complete.

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::AsyncReadExt;

use crate::resp::{RespError, RespValue};

/// Errors that can occur while reading and parsing requests from a stream.
#[derive(Error, Debug, PartialEq)]
pub enum CommandReadError {
    #[error("I/O error: {0}")]
    IoError(String),
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("RESP parse error: {0}")]
    RespParseError(#[from] RespError),
}

impl CommandReadError {
    pub fn as_string(&self) -> String {
        match self {
            CommandReadError::IoError(msg) => RespValue::Error(format!("ERR {}", msg)).encode(),
            CommandReadError::ConnectionClosed => {
                RespValue::Error("ERR connection closed".to_string()).encode()
            }
            CommandReadError::RespParseError(err) => err.as_string(),
        }
    }
}

/// Reads from a stream until at least one complete RESP value is buffered.
///
/// # Arguments
///
/// * `stream` - The stream to read data from
/// * `buffer` - Bytes received but not yet decoded; survives across calls
///
/// # Returns
///
/// * `Ok(Vec<RespValue>)` - Every complete value decoded from the buffer
/// * `Err(CommandReadError::IoError)` - If reading from the stream fails
/// * `Err(CommandReadError::ConnectionClosed)` - If the peer closes the stream
/// * `Err(CommandReadError::RespParseError)` - If the buffered bytes are not valid RESP
pub async fn read_and_parse_resp<R>(
    stream: &mut R,
    buffer: &mut BytesMut,
) -> Result<Vec<RespValue>, CommandReadError>
where
    R: AsyncReadExt + Unpin,
{
    loop {
        let values = RespValue::parse(buffer)?;
        if !values.is_empty() {
            return Ok(values);
        }

        let number_of_bytes = stream
            .read_buf(buffer)
            .await
            .map_err(|e| CommandReadError::IoError(e.to_string()))?;

        if number_of_bytes == 0 {
            return Err(CommandReadError::ConnectionClosed);
        }
    }
}
