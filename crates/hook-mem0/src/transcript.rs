//! Turn raw transcript records into messages worth saving.

use crate::schema::Message;
use serde_json::Value;

/// Longest message content sent to mem0, in characters.
pub const MAX_CONTENT_CHARS: usize = 2000;

const TRUNCATION_MARKER: &str = "...";

/// Extract the last `max_messages` records as messages.
///
/// Records without a role or usable content are dropped after the window is
/// taken, so fewer than `max_messages` messages may come back.
pub fn extract_messages(records: &[Value], max_messages: usize) -> Vec<Message> {
    let start = records.len().saturating_sub(max_messages);

    records[start..]
        .iter()
        .filter_map(message_from_record)
        .collect()
}

fn message_from_record(record: &Value) -> Option<Message> {
    let role = record.get("role")?.as_str().filter(|r| !r.is_empty())?;
    let content = flatten_content(record.get("content")?)?;

    if content.is_empty() {
        return None;
    }

    Some(Message::new(role, truncate_content(&content, MAX_CONTENT_CHARS)))
}

/// Plain string content as-is; multi-part content joined by single spaces.
fn flatten_content(content: &Value) -> Option<String> {
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => {
            let texts: Vec<&str> = parts
                .iter()
                .filter_map(|part| match part {
                    Value::String(text) => Some(text.as_str()),
                    Value::Object(obj) if obj.get("type").and_then(Value::as_str) == Some("text") => {
                        Some(obj.get("text").and_then(Value::as_str).unwrap_or(""))
                    }
                    _ => None,
                })
                .collect();
            Some(texts.join(" "))
        }
        _ => None,
    }
}

/// Cut `content` to `max_chars` characters, marking the cut.
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}{}", &content[..idx], TRUNCATION_MARKER),
        None => content.to_string(),
    }
}
