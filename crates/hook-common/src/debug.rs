//! Debug logging for hooks.
//!
//! Records every hook decision to a JSONL file so a silent hook can still be
//! inspected after the fact.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;

/// Debug log entry for one hook invocation
#[derive(Debug, Serialize)]
pub struct HookDebugLog {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Hook name (e.g., "mem0-stop")
    pub hook_name: String,
    /// Decision made (skip/inject/save/fail)
    pub decision: String,
    /// Reason for the decision
    pub reason: String,
    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl HookDebugLog {
    pub fn new(hook_name: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            hook_name: hook_name.to_string(),
            decision: String::new(),
            reason: String::new(),
            context: None,
        }
    }

    pub fn with_decision(mut self, decision: &str, reason: &str) -> Self {
        self.decision = decision.to_string();
        self.reason = reason.to_string();
        self
    }

    pub fn with_context(mut self, context: &str) -> Self {
        // Prompts and transcripts can be large
        self.context = Some(if context.chars().count() > 200 {
            let head: String = context.chars().take(200).collect();
            format!("{}...", head)
        } else {
            context.to_string()
        });
        self
    }

    /// Append the entry to the debug log, if debug mode is enabled.
    pub fn write(&self) -> std::io::Result<()> {
        if !is_debug_enabled() {
            return Ok(());
        }
        self.write_to(&debug_log_path())
    }

    /// Append the entry to the given file, creating parent directories.
    pub fn write_to(&self, log_path: &Utf8Path) -> std::io::Result<()> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let json = serde_json::to_string(self).map_err(std::io::Error::other)?;
        writeln!(file, "{}", json)?;

        Ok(())
    }
}

fn project_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(std::env::var("CLAUDE_PROJECT_DIR").unwrap_or_else(|_| ".".to_string()))
}

/// Check if debug mode is enabled
pub fn is_debug_enabled() -> bool {
    if std::env::var("CLAUDE_HOOK_DEBUG").is_ok() {
        return true;
    }

    project_dir().join(".claude").join(".hook-debug").exists()
}

/// Get debug log file path
pub fn debug_log_path() -> Utf8PathBuf {
    project_dir()
        .join(".claude")
        .join("logs")
        .join("hook-debug.jsonl")
}

/// Quick helper to log a hook decision
pub fn log_decision(hook_name: &str, decision: &str, reason: &str) {
    let log = HookDebugLog::new(hook_name).with_decision(decision, reason);

    if let Err(e) = log.write() {
        tracing::debug!("debug log unavailable: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_log_serialization() {
        let log = HookDebugLog::new("mem0-stop").with_decision("save", "3 messages saved");

        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("mem0-stop"));
        assert!(json.contains("\"decision\":\"save\""));
        assert!(!json.contains("context"));
    }

    #[test]
    fn test_truncation() {
        let long_input = "ä".repeat(500);
        let log = HookDebugLog::new("test").with_context(&long_input);

        let context = log.context.unwrap();
        assert_eq!(context.chars().count(), 203); // 200 + "..."
    }

    #[test]
    fn test_write_to_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path =
            Utf8PathBuf::from_path_buf(dir.path().join("logs").join("hook-debug.jsonl")).unwrap();

        HookDebugLog::new("a").with_decision("skip", "no key").write_to(&path).unwrap();
        HookDebugLog::new("b").with_decision("save", "ok").write_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["hook_name"], "a");
    }
}
