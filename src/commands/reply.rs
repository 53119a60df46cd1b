//! Flattening of directory mappings into RESP arrays.
//!
//! Mappings are sent like `HGETALL` replies: key, value, key, value, ...
//! in key order.

use std::collections::BTreeMap;

use crate::{
    commands::CommandError,
    directory::{Counts, Distribution},
    resp::RespValue,
};

pub fn counts(counts: &Counts) -> RespValue {
    let mut elements = Vec::with_capacity(counts.len() * 2);

    for (key, count) in counts {
        elements.push(RespValue::BulkString(key.clone()));
        elements.push(RespValue::Integer(i64::try_from(*count).unwrap_or(i64::MAX)));
    }

    RespValue::Array(elements)
}

pub fn lists(lists: &Distribution) -> RespValue {
    let mut elements = Vec::with_capacity(lists.len() * 2);

    for (key, list) in lists {
        elements.push(RespValue::BulkString(key.clone()));
        elements.push(RespValue::bulk_string_array(list.iter().cloned()));
    }

    RespValue::Array(elements)
}

pub fn fields(fields: &BTreeMap<String, String>) -> RespValue {
    RespValue::bulk_string_array(
        fields
            .iter()
            .flat_map(|(key, value)| [key.clone(), value.clone()]),
    )
}

pub fn parse_id(name: &str, value: &str) -> Result<i64, CommandError> {
    value
        .parse::<i64>()
        .map_err(|_| CommandError::validation(format!("{} must be an integer, got '{}'", name, value)))
}
