//! Hook input parsing from stdin.

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};

/// Hook input structure received from Claude Code.
///
/// Only the fields the mem0 hooks care about are typed; everything else the
/// host sends lands in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookInput {
    /// Hook event name (e.g., "UserPromptSubmit", "Stop")
    #[serde(default)]
    pub hook_event_name: Option<String>,

    /// Session ID
    #[serde(default)]
    pub session_id: Option<String>,

    /// User prompt (UserPromptSubmit)
    #[serde(default)]
    pub prompt: Option<String>,

    /// Older name of the prompt field
    #[serde(default)]
    pub user_prompt: Option<String>,

    /// Inline conversation transcript (Stop)
    #[serde(default)]
    pub transcript: Option<Value>,

    /// Path to the session transcript in JSONL form (Stop)
    #[serde(default)]
    pub transcript_path: Option<String>,

    /// Additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl HookInput {
    /// Read and parse hook input from stdin.
    pub fn from_stdin() -> Result<Self> {
        Self::from_reader(io::stdin().lock())
    }

    /// Read and parse hook input from any reader.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut input = String::new();
        reader
            .read_to_string(&mut input)
            .context("Failed to read hook input")?;
        Self::parse(&input)
    }

    /// Parse hook input from a JSON string. Non-object documents are rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let parsed: HookInput =
            serde_json::from_str(input).context("Hook input is not a JSON object")?;
        Ok(parsed)
    }

    /// The submitted prompt, preferring `prompt` over `user_prompt`.
    pub fn prompt_text(&self) -> Option<&str> {
        self.prompt
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| self.user_prompt.as_deref().filter(|p| !p.is_empty()))
    }

    /// Raw transcript records, oldest first.
    ///
    /// An inline `transcript` array wins. When it is absent, the JSONL file at
    /// `transcript_path` is read instead. Unusable input yields no records.
    pub fn transcript_records(&self) -> Vec<Value> {
        match &self.transcript {
            Some(Value::Array(items)) => return items.clone(),
            Some(_) => return Vec::new(),
            None => {}
        }

        let Some(path) = self.transcript_path.as_deref().filter(|p| !p.is_empty()) else {
            return Vec::new();
        };

        match read_transcript_file(Utf8Path::new(path)) {
            Ok(records) => records,
            Err(e) => {
                tracing::debug!("transcript unavailable: {e:#}");
                Vec::new()
            }
        }
    }
}

/// Load a JSONL transcript. Lines wrapping a `message` object contribute that
/// object; other object lines are returned as-is.
pub fn read_transcript_file(path: &Utf8Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {}", path))?;

    let mut records = Vec::new();
    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(mut entry)) => match entry.remove("message") {
                Some(message @ Value::Object(_)) => records.push(message),
                Some(_) | None => records.push(Value::Object(entry)),
            },
            Ok(_) => {}
            Err(e) => tracing::debug!("skipping transcript line {}: {e}", number + 1),
        }
    }

    Ok(records)
}
