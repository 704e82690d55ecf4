//! Hook configuration from environment variables.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_USER_ID: &str = "claude-code-user";
pub const DEFAULT_HOST: &str = "https://api.mem0.ai";
pub const DEFAULT_TOP_K: u32 = 5;
pub const DEFAULT_THRESHOLD: f64 = 0.3;
pub const DEFAULT_SAVE_MESSAGES: usize = 10;

/// Settings shared by every mem0 hook. Built once in `main`.
#[derive(Clone, PartialEq)]
pub struct Mem0Config {
    /// API key; every network action requires it
    pub api_key: String,
    /// User the memories are scoped to
    pub user_id: String,
    /// Maximum memories returned by a search
    pub top_k: u32,
    /// Minimum similarity score for a search hit
    pub threshold: f64,
    /// Save each submitted prompt in the background
    pub auto_save: bool,
    /// Number of trailing transcript messages the stop hook saves
    pub save_messages: usize,
    /// API base URL, without trailing slash
    pub host: String,
    /// Print a system message when the stop hook fails to save
    pub report_save_failure: bool,
}

impl Default for Mem0Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            user_id: DEFAULT_USER_ID.to_string(),
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_THRESHOLD,
            auto_save: true,
            save_messages: DEFAULT_SAVE_MESSAGES,
            host: DEFAULT_HOST.to_string(),
            report_save_failure: false,
        }
    }
}

impl fmt::Debug for Mem0Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mem0Config")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("user_id", &self.user_id)
            .field("top_k", &self.top_k)
            .field("threshold", &self.threshold)
            .field("auto_save", &self.auto_save)
            .field("save_messages", &self.save_messages)
            .field("host", &self.host)
            .field("report_save_failure", &self.report_save_failure)
            .finish()
    }
}

impl Mem0Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset. Unparseable numbers fall back to their
    /// default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_key: var("MEM0_API_KEY").unwrap_or_default(),
            user_id: var("MEM0_USER_ID").unwrap_or(defaults.user_id),
            top_k: parse_or("MEM0_TOP_K", var("MEM0_TOP_K"), defaults.top_k),
            threshold: parse_or("MEM0_THRESHOLD", var("MEM0_THRESHOLD"), defaults.threshold),
            auto_save: var("MEM0_AUTO_SAVE").map_or(defaults.auto_save, |v| is_true(&v)),
            save_messages: parse_or(
                "MEM0_SAVE_MESSAGES",
                var("MEM0_SAVE_MESSAGES"),
                defaults.save_messages,
            ),
            host: var("MEM0_HOST")
                .map(|h| h.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.host),
            report_save_failure: var("MEM0_STOP_REPORT_FAILURE").is_some_and(|v| is_true(&v)),
        }
    }

    /// Whether network actions are possible at all.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("ignoring {key}={raw:?}: {e}");
            default
        }
    }
}
