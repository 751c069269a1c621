//! Cached response entries.

use serde_json::Value;

/// One cached provider response.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    /// Nothing was collected for this key.
    Absent,
    /// The collector recorded an error; carries the upstream message verbatim.
    Error(String),
    /// The collector recorded a payload. The payload may still be malformed.
    Data(Value),
}

impl CacheEntry {
    /// Interpret a raw collector node.
    ///
    /// `{"err": ...}` wins over `{"data": ...}` when both are present.
    pub fn from_node(node: Option<&Value>) -> Self {
        let Some(Value::Object(map)) = node else {
            return CacheEntry::Absent;
        };

        if let Some(err) = map.get("err") {
            if !err.is_null() {
                return CacheEntry::Error(error_message(err));
            }
        }

        match map.get("data") {
            Some(data) => CacheEntry::Data(data.clone()),
            None => CacheEntry::Absent,
        }
    }

    /// Short label used in source logs and debug output.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheEntry::Absent => "absent",
            CacheEntry::Error(_) => "error",
            CacheEntry::Data(_) => "data",
        }
    }
}

fn error_message(err: &Value) -> String {
    match err {
        Value::String(s) => s.clone(),
        Value::Object(obj) => match obj.get("message") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => err.to_string(),
        },
        other => other.to_string(),
    }
}
