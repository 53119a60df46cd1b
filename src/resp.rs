//! Redis serialization protocol values, as spoken on the directory endpoint.

use bytes::{Buf, BytesMut};
use thiserror::Error;

/// Largest bulk string accepted from a client, matching Redis' default
/// `proto-max-bulk-len`.
const MAX_BULK_LENGTH: i64 = 512 * 1024 * 1024;
/// Largest number of elements accepted in one array frame.
const MAX_ARRAY_LENGTH: i64 = 1024 * 1024;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum RespError {
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    #[error("unknown RESP type")]
    UnknownRespType,
    #[error("failed to parse integer")]
    FailedToParseInteger,
    #[error("invalid bulk string")]
    InvalidBulkString,
    #[error("invalid array")]
    InvalidArray,
}

impl RespError {
    pub fn as_string(&self) -> String {
        RespValue::Error(format!("ERR Protocol error: {}", self)).encode()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum RespValue {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(String),
    Array(Vec<RespValue>),
    Null,
}

impl RespValue {
    /// Decodes every complete frame at the front of `bytes`.
    ///
    /// Decoded frames are consumed from the buffer. A trailing partial frame is
    /// left in place so the caller can append more data and parse again.
    pub fn parse(bytes: &mut BytesMut) -> Result<Vec<RespValue>, RespError> {
        let mut values = Vec::new();

        while !bytes.is_empty() {
            match Self::decode(&bytes[..])? {
                Some((value, consumed)) => {
                    bytes.advance(consumed);
                    values.push(value);
                }
                None => break,
            }
        }

        Ok(values)
    }

    /// Decodes one frame, returning it with the number of bytes it spans, or
    /// `None` when the input ends before the frame does.
    fn decode(input: &[u8]) -> Result<Option<(RespValue, usize)>, RespError> {
        let Some((line, mut consumed)) = Self::read_line(input)? else {
            return Ok(None);
        };

        let mut chars = line.chars();
        let Some(type_byte) = chars.next() else {
            return Err(RespError::UnknownRespType);
        };
        let content = chars.as_str();

        let value = match type_byte {
            '+' => RespValue::SimpleString(content.to_string()),
            '-' => RespValue::Error(content.to_string()),
            ':' => RespValue::Integer(
                content
                    .parse::<i64>()
                    .map_err(|_| RespError::FailedToParseInteger)?,
            ),
            '$' => {
                let length = content
                    .parse::<i64>()
                    .map_err(|_| RespError::InvalidBulkString)?;

                if length < 0 {
                    return Ok(Some((RespValue::Null, consumed)));
                }

                if length > MAX_BULK_LENGTH {
                    return Err(RespError::InvalidBulkString);
                }

                let length = length as usize;
                let rest = &input[consumed..];

                if rest.len() < length + 2 {
                    return Ok(None);
                }

                if &rest[length..length + 2] != b"\r\n" {
                    return Err(RespError::InvalidBulkString);
                }

                let data =
                    std::str::from_utf8(&rest[..length]).map_err(|_| RespError::InvalidUtf8)?;
                consumed += length + 2;

                RespValue::BulkString(data.to_string())
            }
            '*' => {
                let length = content
                    .parse::<i64>()
                    .map_err(|_| RespError::InvalidArray)?;

                if length < 0 {
                    return Ok(Some((RespValue::Null, consumed)));
                }

                if length > MAX_ARRAY_LENGTH {
                    return Err(RespError::InvalidArray);
                }

                let mut elements = Vec::with_capacity((length as usize).min(1024));

                while elements.len() < length as usize {
                    let Some((element, element_size)) = Self::decode(&input[consumed..])? else {
                        return Ok(None);
                    };

                    elements.push(element);
                    consumed += element_size;
                }

                RespValue::Array(elements)
            }
            _ => return Err(RespError::UnknownRespType),
        };

        Ok(Some((value, consumed)))
    }

    fn read_line(input: &[u8]) -> Result<Option<(&str, usize)>, RespError> {
        let Some(position) = input.windows(2).position(|window| window == b"\r\n") else {
            return Ok(None);
        };

        let line = std::str::from_utf8(&input[..position]).map_err(|_| RespError::InvalidUtf8)?;

        Ok(Some((line, position + 2)))
    }

    pub fn encode(&self) -> String {
        match self {
            RespValue::SimpleString(s) => format!("+{}\r\n", s),
            RespValue::Error(s) => format!("-{}\r\n", s),
            RespValue::Integer(i) => format!(":{}\r\n", i),
            RespValue::BulkString(s) => format!("${}\r\n{}\r\n", s.len(), s),
            RespValue::Array(elements) => {
                let mut encoded = format!("*{}\r\n", elements.len());
                for element in elements {
                    encoded.push_str(&element.encode());
                }
                encoded
            }
            RespValue::Null => "$-1\r\n".to_string(),
        }
    }

    pub fn ok() -> Self {
        RespValue::SimpleString("OK".to_string())
    }

    pub fn bulk_string_array<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RespValue::Array(
            values
                .into_iter()
                .map(|value| RespValue::BulkString(value.into()))
                .collect(),
        )
    }

    pub fn encode_array_from_strings(values: Vec<String>) -> String {
        Self::bulk_string_array(values).encode()
    }
}
