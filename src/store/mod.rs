//! Capability set the directory needs from a key-value backend.
//!
//! Consistency is weak:
//!
//! - `scan` is not a snapshot. Keys created or removed while a cursor is in
//!   flight may or may not be reported, and a key may be reported twice.
//! - A [`Pipeline`] is submitted in one round trip and its operations commit
//!   together, but it is not a transaction: when the backend fails part way
//!   through, the operations before the failure stay applied.

mod bounded;
mod memory;

pub use bounded::{BoundedStore, DEFAULT_STORE_TIMEOUT};
pub use memory::{DataType, KeyValueStore, MemoryStore, Value};

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("wrong type of value held at key {0}")]
    WrongType(String),
    #[error("invalid scan pattern: {0}")]
    InvalidPattern(String),
}

/// One page of a cursor scan. A `cursor` of `0` means the scan is complete.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ScanPage {
    pub cursor: u64,
    pub keys: Vec<String>,
}

/// A single queued pipeline operation.
#[derive(Debug, PartialEq, Clone)]
pub enum PipelineOp {
    GetField { key: String, field: String },
    GetAllFields { key: String },
    SetFields { key: String, fields: Vec<(String, String)> },
    PushFront { key: String, values: Vec<String> },
    Range { key: String, start: isize, end: isize },
    DeleteKey { key: String },
}

/// The result of one [`PipelineOp`], in queue order.
#[derive(Debug, PartialEq, Clone)]
pub enum Reply {
    Value(Option<String>),
    Fields(HashMap<String, String>),
    List(Vec<String>),
    Length(usize),
    Removed(bool),
    Ok,
}

impl Reply {
    pub fn into_value(self) -> Option<String> {
        match self {
            Reply::Value(value) => value,
            _ => None,
        }
    }

    pub fn into_list(self) -> Vec<String> {
        match self {
            Reply::List(list) => list,
            _ => Vec::new(),
        }
    }

    pub fn into_fields(self) -> HashMap<String, String> {
        match self {
            Reply::Fields(fields) => fields,
            _ => HashMap::new(),
        }
    }
}

/// Operations queued for a single batched round trip.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Pipeline {
    ops: Vec<PipelineOp>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_field(&mut self, key: impl Into<String>, field: impl Into<String>) -> &mut Self {
        self.ops.push(PipelineOp::GetField {
            key: key.into(),
            field: field.into(),
        });
        self
    }

    pub fn get_all_fields(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(PipelineOp::GetAllFields { key: key.into() });
        self
    }

    pub fn set_fields(&mut self, key: impl Into<String>, fields: Vec<(String, String)>) -> &mut Self {
        self.ops.push(PipelineOp::SetFields {
            key: key.into(),
            fields,
        });
        self
    }

    pub fn push_front(&mut self, key: impl Into<String>, values: Vec<String>) -> &mut Self {
        self.ops.push(PipelineOp::PushFront {
            key: key.into(),
            values,
        });
        self
    }

    /// Queues a read of the whole list stored at `key`.
    pub fn range_all(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(PipelineOp::Range {
            key: key.into(),
            start: 0,
            end: -1,
        });
        self
    }

    pub fn delete_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(PipelineOp::DeleteKey { key: key.into() });
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_ops(self) -> Vec<PipelineOp> {
        self.ops
    }
}

/// Primitive operations of a key-value backend with hashes, lists and scalars.
///
/// Every method may suspend the caller on backend I/O. Implementations must not
/// hold in-process locks across such suspension points.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, StoreError>;

    async fn get_all_fields(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    async fn set_fields(&self, key: &str, fields: &[(String, String)]) -> Result<(), StoreError>;

    /// Pushes each value to the head of the list in turn, so the last value
    /// ends up first. Returns the new length of the list.
    async fn push_front(&self, key: &str, values: &[String]) -> Result<usize, StoreError>;

    /// Inclusive range; negative indexes count from the end of the list.
    async fn range(&self, key: &str, start: isize, end: isize) -> Result<Vec<String>, StoreError>;

    /// Returns whether a key was removed.
    async fn delete_key(&self, key: &str) -> Result<bool, StoreError>;

    /// `count` is a hint for how much of the key space one call examines, not
    /// a guarantee on the number of returned keys.
    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<ScanPage, StoreError>;

    async fn execute(&self, pipeline: Pipeline) -> Result<Vec<Reply>, StoreError>;

    async fn set_scalar(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn get_scalar(&self, key: &str) -> Result<Option<String>, StoreError>;
}
