//! Manual save: Store arbitrary messages in mem0.
//!
//! Usage:
//!   mem0-save-manual "message to save"
//!   echo '{"messages": [...]}' | mem0-save-manual
//!
//! Prints a JSON envelope. Exits 1 only for configuration or input errors;
//! a failed save still exits 0 with `"success": false`.
//!
//! Every argument is message text, so `-h` and `--help` are saved like any
//! other word. There is no help or version flag.

use anyhow::Result;
use clap::Parser;
use hook_common::logging;
use hook_common::prelude::*;
use hook_mem0::{Mem0Client, Mem0Config, MemoryService, Message, SaveEnvelope};
use serde_json::Value;
use std::io::{self, Read, Write};
use std::process::ExitCode;

const HOOK_NAME: &str = "mem0-save-manual";

/// Exit code for configuration and input errors.
const EXIT_INPUT_ERROR: u8 = 1;

/// Save messages to mem0 memory.
#[derive(Debug, Parser)]
#[command(name = "mem0-save-manual", about, disable_help_flag = true)]
struct Cli {
    /// Message text to save; read JSON messages from stdin when omitted
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    words: Vec<String>,
}

/// Accepted stdin shapes. Entries are converted one at a time.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessagesInput {
    Wrapped {
        #[serde(default)]
        messages: Vec<Value>,
    },
    Bare(Vec<Value>),
}

fn main() -> Result<ExitCode> {
    logging::init();
    let cli = Cli::parse();
    let config = Mem0Config::from_env();

    let (envelope, code) = run(&cli, &config, io::stdin().lock(), |messages| {
        Mem0Client::new(&config).and_then(|client| client.add(messages))
    });

    print_envelope(&mut io::stdout().lock(), &envelope, code == 0)?;
    Ok(ExitCode::from(code))
}

/// Validate configuration and input, then save.
///
/// `save` is only called once a non-empty message list exists.
fn run<F>(cli: &Cli, config: &Mem0Config, stdin: impl Read, save: F) -> (SaveEnvelope, u8)
where
    F: FnOnce(&[Message]) -> hook_mem0::Result<Value>,
{
    if !config.has_api_key() {
        return (SaveEnvelope::failure("MEM0_API_KEY not configured"), EXIT_INPUT_ERROR);
    }

    let messages = match collect_messages(&cli.words, stdin) {
        Ok(messages) => messages,
        Err(e) => {
            tracing::debug!("unreadable input: {e:#}");
            return (SaveEnvelope::failure("No messages provided"), EXIT_INPUT_ERROR);
        }
    };

    if messages.is_empty() {
        return (SaveEnvelope::failure("No messages to save"), EXIT_INPUT_ERROR);
    }

    let envelope = SaveEnvelope::from(save(&messages));
    match &envelope.error {
        Some(error) => {
            tracing::error!("mem0 save error: {error}");
            log_decision(HOOK_NAME, "fail", error);
        }
        None => log_decision(HOOK_NAME, "save", &format!("{} messages saved", messages.len())),
    }

    (envelope, 0)
}

/// Messages from argv words, or from stdin JSON when no words were given.
/// Entries that are not `{role, content}` strings, or have either empty, are
/// dropped.
fn collect_messages(words: &[String], stdin: impl Read) -> Result<Vec<Message>> {
    let mut messages = if words.is_empty() {
        parse_messages(stdin)?
    } else {
        vec![Message::user(words.join(" "))]
    };

    messages.retain(Message::is_complete);
    Ok(messages)
}

fn parse_messages(mut stdin: impl Read) -> Result<Vec<Message>> {
    let mut input = String::new();
    stdin.read_to_string(&mut input).context("Failed to read stdin")?;

    let parsed: MessagesInput =
        serde_json::from_str(&input).context("stdin is not a message list")?;
    let (MessagesInput::Wrapped { messages: entries } | MessagesInput::Bare(entries)) = parsed;

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::debug!("skipping malformed message: {e}");
                None
            }
        })
        .collect())
}

/// Successful saves are pretty-printed; early failures are compact.
fn print_envelope(out: &mut impl Write, envelope: &SaveEnvelope, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string(envelope)?
    };
    writeln!(out, "{}", json)?;
    out.flush()?;
    Ok(())
}
