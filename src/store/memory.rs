use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use globset::{Glob, GlobMatcher};
use tokio::sync::Mutex;

use super::{DirectoryStore, Pipeline, PipelineOp, Reply, ScanPage, StoreError};

#[derive(Debug, PartialEq, Clone)]
pub enum DataType {
    String(String),
    List(VecDeque<String>),
    Hash(HashMap<String, String>),
}

#[derive(Debug, PartialEq, Clone)]
pub struct Value {
    pub data: DataType,
}

impl Value {
    fn new(data: DataType) -> Self {
        Self { data }
    }
}

pub type KeyValueStore = HashMap<String, Value>;

/// In-process backend holding strings, lists and hashes in one map.
///
/// A pipeline runs under a single lock acquisition, so no other caller
/// observes it half applied. If an operation fails (wrong value type), the
/// operations queued before it remain applied.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    store: Arc<Mutex<KeyValueStore>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle on the underlying map, mostly useful for inspection.
    pub fn inner(&self) -> Arc<Mutex<KeyValueStore>> {
        Arc::clone(&self.store)
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        let store_guard = self.store.lock().await;
        get_field(&store_guard, key, field)
    }

    async fn get_all_fields(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let store_guard = self.store.lock().await;
        get_all_fields(&store_guard, key)
    }

    async fn set_fields(&self, key: &str, fields: &[(String, String)]) -> Result<(), StoreError> {
        let mut store_guard = self.store.lock().await;
        set_fields(&mut store_guard, key, fields)
    }

    async fn push_front(&self, key: &str, values: &[String]) -> Result<usize, StoreError> {
        let mut store_guard = self.store.lock().await;
        push_front(&mut store_guard, key, values)
    }

    async fn range(&self, key: &str, start: isize, end: isize) -> Result<Vec<String>, StoreError> {
        let store_guard = self.store.lock().await;
        range(&store_guard, key, start, end)
    }

    async fn delete_key(&self, key: &str) -> Result<bool, StoreError> {
        let mut store_guard = self.store.lock().await;
        Ok(store_guard.remove(key).is_some())
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<ScanPage, StoreError> {
        let matcher = compile_pattern(pattern)?;
        let store_guard = self.store.lock().await;
        Ok(scan(&store_guard, cursor, &matcher, count))
    }

    async fn execute(&self, pipeline: Pipeline) -> Result<Vec<Reply>, StoreError> {
        let mut store_guard = self.store.lock().await;
        let mut replies = Vec::with_capacity(pipeline.len());

        for op in pipeline.into_ops() {
            let reply = match op {
                PipelineOp::GetField { key, field } => {
                    Reply::Value(get_field(&store_guard, &key, &field)?)
                }
                PipelineOp::GetAllFields { key } => {
                    Reply::Fields(get_all_fields(&store_guard, &key)?)
                }
                PipelineOp::SetFields { key, fields } => {
                    set_fields(&mut store_guard, &key, &fields)?;
                    Reply::Ok
                }
                PipelineOp::PushFront { key, values } => {
                    Reply::Length(push_front(&mut store_guard, &key, &values)?)
                }
                PipelineOp::Range { key, start, end } => {
                    Reply::List(range(&store_guard, &key, start, end)?)
                }
                PipelineOp::DeleteKey { key } => Reply::Removed(store_guard.remove(&key).is_some()),
            };

            replies.push(reply);
        }

        Ok(replies)
    }

    async fn set_scalar(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut store_guard = self.store.lock().await;
        store_guard.insert(key.to_string(), Value::new(DataType::String(value.to_string())));
        Ok(())
    }

    async fn get_scalar(&self, key: &str) -> Result<Option<String>, StoreError> {
        let store_guard = self.store.lock().await;

        match store_guard.get(key) {
            Some(Value {
                data: DataType::String(value),
            }) => Ok(Some(value.clone())),
            Some(_) => Err(StoreError::WrongType(key.to_string())),
            None => Ok(None),
        }
    }
}

fn get_field(store: &KeyValueStore, key: &str, field: &str) -> Result<Option<String>, StoreError> {
    match store.get(key) {
        Some(Value {
            data: DataType::Hash(hash),
        }) => Ok(hash.get(field).cloned()),
        Some(_) => Err(StoreError::WrongType(key.to_string())),
        None => Ok(None),
    }
}

fn get_all_fields(store: &KeyValueStore, key: &str) -> Result<HashMap<String, String>, StoreError> {
    match store.get(key) {
        Some(Value {
            data: DataType::Hash(hash),
        }) => Ok(hash.clone()),
        Some(_) => Err(StoreError::WrongType(key.to_string())),
        None => Ok(HashMap::new()),
    }
}

fn set_fields(
    store: &mut KeyValueStore,
    key: &str,
    fields: &[(String, String)],
) -> Result<(), StoreError> {
    let value = store
        .entry(key.to_string())
        .or_insert_with(|| Value::new(DataType::Hash(HashMap::new())));

    let DataType::Hash(ref mut hash) = value.data else {
        return Err(StoreError::WrongType(key.to_string()));
    };

    for (field, field_value) in fields {
        hash.insert(field.clone(), field_value.clone());
    }

    Ok(())
}

fn push_front(store: &mut KeyValueStore, key: &str, values: &[String]) -> Result<usize, StoreError> {
    match store.get_mut(key) {
        Some(value) => {
            let DataType::List(ref mut list) = value.data else {
                return Err(StoreError::WrongType(key.to_string()));
            };

            for value in values {
                list.push_front(value.clone());
            }

            Ok(list.len())
        }
        // an empty list is never stored
        None if values.is_empty() => Ok(0),
        None => {
            let mut list = VecDeque::with_capacity(values.len());
            for value in values {
                list.push_front(value.clone());
            }

            let list_length = list.len();
            store.insert(key.to_string(), Value::new(DataType::List(list)));

            Ok(list_length)
        }
    }
}

fn range(
    store: &KeyValueStore,
    key: &str,
    start_index: isize,
    end_index: isize,
) -> Result<Vec<String>, StoreError> {
    let Some(value) = store.get(key) else {
        return Ok(Vec::new());
    };

    let DataType::List(ref list) = value.data else {
        return Err(StoreError::WrongType(key.to_string()));
    };

    let Ok((start, end)) = validate_range_indexes(list, start_index, end_index) else {
        return Ok(Vec::new());
    };

    Ok(list.range(start..=end).cloned().collect())
}

fn compile_pattern(pattern: &str) -> Result<GlobMatcher, StoreError> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|e| StoreError::InvalidPattern(e.to_string()))
}

/// One scan step: examines up to `count` keys in key order starting at the
/// `cursor` offset and returns those matching the pattern.
///
/// The key order is taken afresh on every call, so inserts and removals
/// between calls shift the offsets. That may skip or repeat keys, which is the
/// weak guarantee callers are told to expect.
///
/// A page costs a linear selection over the whole key space plus a sort of the
/// page itself, so walking `n` keys takes about `n * n / count` steps. Callers
/// keep that low with a large `count`.
fn scan(store: &KeyValueStore, cursor: u64, matcher: &GlobMatcher, count: usize) -> ScanPage {
    let mut keys = store.keys().collect::<Vec<&String>>();
    let total = keys.len();

    let start = usize::try_from(cursor).unwrap_or(usize::MAX).min(total);
    let end = start.saturating_add(count.max(1)).min(total);

    // keys[..end] become the `end` smallest keys, then keys[start..end] the page
    if end < total {
        keys.select_nth_unstable(end);
    }
    let page = &mut keys[..end];
    if start < end {
        page.select_nth_unstable(start);
    }
    page[start..].sort_unstable();

    let matching = page[start..]
        .iter()
        .filter(|key| matcher.is_match(key.as_str()))
        .map(|key| key.to_string())
        .collect();

    let next_cursor = if end >= total { 0 } else { end as u64 };

    ScanPage {
        cursor: next_cursor,
        keys: matching,
    }
}

/// Validates and normalizes range indices for list operations.
///
/// Negative indices count from the end of the list (-1 is the last element).
/// Out of range bounds are clamped; an empty or inverted range is an error.
fn validate_range_indexes(
    list: &VecDeque<String>,
    start_index: isize,
    end_index: isize,
) -> Result<(usize, usize), &'static str> {
    let len = list.len() as isize;

    if len == 0 {
        return Err("List is empty");
    }

    let mut start = if start_index < 0 {
        len + start_index
    } else {
        start_index
    };
    let mut end = if end_index < 0 {
        len + end_index
    } else {
        end_index
    };

    start = start.max(0);
    end = end.min(len - 1);

    if start >= len {
        return Err("Start index is out of bounds");
    }

    if start > end {
        return Err("Start index is bigger than end index after processing");
    }

    Ok((start as usize, end as usize))
}
