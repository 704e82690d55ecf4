//! Common utilities for the mem0 Claude Code hooks.
//!
//! This crate provides shared functionality for all hook binaries:
//! - JSON input parsing from stdin
//! - Hook output for stdout
//! - stderr diagnostics and the JSONL decision log

pub mod debug;
pub mod input;
pub mod logging;
pub mod output;

pub use debug::log_decision;
pub use input::HookInput;
pub use output::HookOutput;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::debug::log_decision;
    pub use crate::input::HookInput;
    pub use crate::output::HookOutput;
    pub use anyhow::{Context, Result};
    pub use serde::{Deserialize, Serialize};
}
