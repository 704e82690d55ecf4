//! Blocking client for the mem0 platform API.

use crate::config::Mem0Config;
use crate::error::{Mem0Error, Result};
use crate::schema::{MemoryRecord, Message, normalize_search_response};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;

const ADD_PATH: &str = "/v1/memories/";
const SEARCH_PATH: &str = "/v2/memories/search/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The two operations the hooks need from a memory service.
pub trait MemoryService {
    /// Memories relevant to `query`, best match first.
    fn search(&self, query: &str) -> Result<Vec<MemoryRecord>>;

    /// Store messages; returns the service's response body.
    fn add(&self, messages: &[Message]) -> Result<Value>;
}

/// mem0 REST client scoped to one user.
#[derive(Clone)]
pub struct Mem0Client {
    http: Client,
    host: String,
    api_key: String,
    user_id: String,
    top_k: u32,
    threshold: f64,
}

impl fmt::Debug for Mem0Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mem0Client")
            .field("host", &self.host)
            .field("user_id", &self.user_id)
            .field("top_k", &self.top_k)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl Mem0Client {
    /// Create a client from the hook configuration.
    pub fn new(config: &Mem0Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("mem0-hooks/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Mem0Error::Unavailable(e.to_string()))?;

        Ok(Self {
            http,
            host: config.host.clone(),
            api_key: config.api_key.clone(),
            user_id: config.user_id.clone(),
            top_k: config.top_k,
            threshold: config.threshold,
        })
    }

    fn search_body(&self, query: &str) -> Value {
        json!({
            "query": query,
            "filters": { "user_id": self.user_id },
            "top_k": self.top_k,
            "threshold": self.threshold,
        })
    }

    fn add_body(&self, messages: &[Message]) -> Value {
        json!({
            "messages": messages,
            "user_id": self.user_id,
        })
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.host, path);
        tracing::debug!("POST {url}");

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Token {}", self.api_key))
            .json(body)
            .send()?;

        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(Mem0Error::Api {
                status: status.as_u16(),
                message: api_error_message(status, &text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl MemoryService for Mem0Client {
    fn search(&self, query: &str) -> Result<Vec<MemoryRecord>> {
        let response = self.post(SEARCH_PATH, &self.search_body(query))?;
        Ok(normalize_search_response(response))
    }

    fn add(&self, messages: &[Message]) -> Result<Value> {
        self.post(ADD_PATH, &self.add_body(messages))
    }
}

/// Best human-readable message from an error response body.
fn api_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "error", "message"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body.to_string()
    }
}
