//! Wire types exchanged with mem0 and printed by the hooks.

use crate::error::Mem0Error;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One conversation message as mem0 expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// A message authored by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Both role and content are present.
    pub fn is_complete(&self) -> bool {
        !self.role.is_empty() && !self.content.is_empty()
    }
}

/// A memory returned by search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Memory text
    #[serde(default, deserialize_with = "null_as_default")]
    pub memory: String,

    /// Categories assigned by mem0
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,

    /// Similarity score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl MemoryRecord {
    pub fn new(memory: impl Into<String>) -> Self {
        Self {
            memory: memory.into(),
            ..Default::default()
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Normalize a search response into memory records.
///
/// mem0 answers either `{"results": [...]}` or a bare `[...]`. Anything else
/// is treated as no results, and entries that are not memory objects are
/// dropped.
pub fn normalize_search_response(response: Value) -> Vec<MemoryRecord> {
    let items = match response {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Value::Array(items) => items,
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("skipping malformed memory record: {e}");
                None
            }
        })
        .collect()
}

/// Result envelope printed by the manual save script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveEnvelope {
    pub fn saved(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

impl From<Result<Value, Mem0Error>> for SaveEnvelope {
    fn from(outcome: Result<Value, Mem0Error>) -> Self {
        match outcome {
            Ok(result) => Self::saved(result),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_results_object_and_bare_list_agree() {
        let records = json!([
            {"id": "m1", "memory": "likes dark mode", "categories": ["preferences"], "score": 0.82},
            {"id": "m2", "memory": "uses cargo nextest", "categories": null}
        ]);

        let wrapped = normalize_search_response(json!({"results": records.clone()}));
        let bare = normalize_search_response(records);

        assert_eq!(wrapped, bare);
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[0].categories, vec!["preferences"]);
        assert_eq!(wrapped[0].score, Some(0.82));
        assert!(wrapped[1].categories.is_empty());
    }

    #[test]
    fn test_unexpected_shapes_are_empty() {
        assert!(normalize_search_response(json!({"detail": "nope"})).is_empty());
        assert!(normalize_search_response(json!({"results": "nope"})).is_empty());
        assert!(normalize_search_response(json!("text")).is_empty());
        assert!(normalize_search_response(Value::Null).is_empty());
    }

    #[test]
    fn test_malformed_records_are_dropped() {
        let records = normalize_search_response(json!([
            "just a string",
            {"memory": 42},
            {"memory": "kept"},
            {}
        ]));
        assert_eq!(records, vec![MemoryRecord::new("kept"), MemoryRecord::default()]);
    }

    #[test]
    fn test_message_serialization() {
        let json = serde_json::to_value(Message::user("hello world")).unwrap();
        assert_eq!(json, json!({"role": "user", "content": "hello world"}));
        assert!(!Message::new("", "text").is_complete());
        assert!(!Message::new("user", "").is_complete());
    }

    #[test]
    fn test_envelope_shapes() {
        let saved = serde_json::to_value(SaveEnvelope::saved(json!([{"id": "m1"}]))).unwrap();
        assert_eq!(saved, json!({"success": true, "result": [{"id": "m1"}]}));

        let failed = SaveEnvelope::from(Err(Mem0Error::Api {
            status: 401,
            message: "Invalid API key".to_string(),
        }));
        let failed = serde_json::to_value(failed).unwrap();
        assert_eq!(
            failed,
            json!({"success": false, "error": "mem0 API error (401): Invalid API key"})
        );
    }
}
