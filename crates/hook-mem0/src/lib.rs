//! mem0 integration for Claude Code hooks.
//!
//! Provides:
//! - Environment configuration
//! - Message and memory record schema
//! - Blocking client for the mem0 REST API
//! - Transcript extraction
//! - Bounded background saves

pub mod background;
pub mod client;
pub mod config;
pub mod error;
pub mod schema;
pub mod transcript;

pub use background::{BackgroundSave, SAVE_GRACE_PERIOD, SaveStatus, spawn_save};
pub use client::{Mem0Client, MemoryService};
pub use config::Mem0Config;
pub use error::{Mem0Error, Result};
pub use schema::{MemoryRecord, Message, SaveEnvelope};
pub use transcript::extract_messages;
