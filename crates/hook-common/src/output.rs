//! Hook output generation for stdout.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// JSON control output understood by Claude Code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookOutput {
    /// Whether the host should carry on with its normal behavior
    #[serde(rename = "continue")]
    pub should_continue: bool,

    /// Message shown to the user by the host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
}

impl HookOutput {
    /// Let the host proceed normally.
    pub fn proceed() -> Self {
        Self {
            should_continue: true,
            system_message: None,
        }
    }

    /// Attach a user-visible message.
    pub fn with_system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = Some(message.into());
        self
    }

    /// Write the output as one JSON line.
    pub fn write_to(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let json = serde_json::to_string(self)?;
        writeln!(out, "{}", json)?;
        out.flush()?;
        Ok(())
    }

    /// Write the output to stdout.
    pub fn write_stdout(&self) -> anyhow::Result<()> {
        self.write_to(&mut io::stdout().lock())
    }
}

/// Write plain text for context injection (UserPromptSubmit).
pub fn write_context(out: &mut impl Write, context: &str) -> anyhow::Result<()> {
    writeln!(out, "{}", context)?;
    out.flush()?;
    Ok(())
}
