//! Tolerant decoding of the OCS envelope, `{"ocs": {"meta": .., "data": ..}}`.
//!
//! Absent or mistyped fields fall back to empty values. A body without
//! `ocs.data` decodes to empty results.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::editing::types::{
    CreatorDescriptor, EditorDescriptor, EditorDetails, TemplateDescriptor,
};

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(&Value::deserialize(deserializer)?))
}

pub(crate) fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::Bool(b) => i64::from(b),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

pub(crate) fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().map(value_to_string).collect(),
        _ => Vec::new(),
    })
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// `ocs.data` of a body, or `None` when the body is not JSON or has no data.
pub fn ocs_data(body: &[u8]) -> Option<Value> {
    let mut root: Value = match serde_json::from_slice(body) {
        Ok(root) => root,
        Err(err) => {
            warn!(error = %err, "OCS response is not JSON");
            return None;
        }
    };
    match root.pointer_mut("/ocs/data").map(Value::take) {
        Some(Value::Null) | None => None,
        Some(data) => Some(data),
    }
}

/// Records of a collection that may be an object keyed by id or a plain array.
/// For objects the key fills a record's empty `id`.
fn records<T: DeserializeOwned>(
    collection: Option<&Value>,
    id_of: fn(&mut T) -> &mut String,
) -> Vec<T> {
    let entries: Vec<(Option<&String>, &Value)> = match collection {
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (Some(k), v)).collect(),
        Some(Value::Array(items)) => items.iter().map(|v| (None, v)).collect(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter(|(_, v)| v.is_object())
        .filter_map(|(key, v)| match T::deserialize(v) {
            Ok(mut record) => {
                let id = id_of(&mut record);
                if id.is_empty()
                    && let Some(key) = key
                {
                    *id = key.clone();
                }
                Some(record)
            }
            Err(err) => {
                warn!(error = %err, "skipping malformed OCS record");
                None
            }
        })
        .collect()
}

pub fn decode_editor_details(body: &[u8]) -> EditorDetails {
    let Some(data) = ocs_data(body) else {
        return EditorDetails::default();
    };
    EditorDetails {
        editors: records(data.get("editors"), |e: &mut EditorDescriptor| &mut e.id),
        creators: records(data.get("creators"), |c: &mut CreatorDescriptor| &mut c.id),
    }
}

/// Templates are listed under `templates`; older servers used `editors`.
pub fn decode_templates(body: &[u8]) -> Vec<TemplateDescriptor> {
    let Some(data) = ocs_data(body) else {
        return Vec::new();
    };
    let collection = data.get("templates").or_else(|| data.get("editors"));
    records(collection, |t: &mut TemplateDescriptor| &mut t.id)
}

/// `ocs.data.url`, empty when absent.
pub fn decode_url(body: &[u8]) -> String {
    ocs_data(body)
        .and_then(|data| data.get("url").map(value_to_string))
        .unwrap_or_default()
}
