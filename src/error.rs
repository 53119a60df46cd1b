use std::time::Duration;

use thiserror::Error;

use crate::{keys::KeyError, resp::RespValue, store::StoreError};

/// Coarse classification of a [`DirectoryError`], as reported to callers.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    Validation,
    StoreUnavailable,
    StoreTimeout,
    MalformedKey,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::StoreUnavailable => "UNAVAILABLE",
            ErrorKind::StoreTimeout => "TIMEOUT",
            ErrorKind::MalformedKey => "MALFORMEDKEY",
        }
    }
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum DirectoryError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("store call timed out after {0:?}")]
    StoreTimeout(Duration),
    #[error("malformed key: {0}")]
    MalformedKey(String),
}

impl DirectoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        DirectoryError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DirectoryError::Validation(_) => ErrorKind::Validation,
            DirectoryError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            DirectoryError::StoreTimeout(_) => ErrorKind::StoreTimeout,
            DirectoryError::MalformedKey(_) => ErrorKind::MalformedKey,
        }
    }

    /// Store failures may succeed when the caller tries again; the directory
    /// itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::StoreUnavailable | ErrorKind::StoreTimeout
        )
    }

    pub fn as_string(&self) -> String {
        let message = match self {
            DirectoryError::Validation(message) => message.clone(),
            DirectoryError::StoreUnavailable(message) => message.clone(),
            DirectoryError::StoreTimeout(duration) => {
                format!("store call exceeded {}ms", duration.as_millis())
            }
            DirectoryError::MalformedKey(key) => key.clone(),
        };

        RespValue::Error(format!("{} {}", self.kind().as_str(), message)).encode()
    }
}

impl From<StoreError> for DirectoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(message) => DirectoryError::StoreUnavailable(message),
            StoreError::WrongType(key) => DirectoryError::MalformedKey(key),
            StoreError::InvalidPattern(pattern) => DirectoryError::MalformedKey(pattern),
        }
    }
}

impl From<KeyError> for DirectoryError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::EmptyId => DirectoryError::MalformedKey("empty entity id".to_string()),
            KeyError::Unrecognized(key) => DirectoryError::MalformedKey(key),
        }
    }
}
