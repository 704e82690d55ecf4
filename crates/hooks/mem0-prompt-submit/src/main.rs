//! UserPromptSubmit hook: Inject relevant mem0 memories into the context.
//!
//! Searches mem0 with the submitted prompt and prints the hits as plain text,
//! which Claude Code adds to the conversation. With `MEM0_AUTO_SAVE` the
//! prompt itself is saved on a background thread.

use anyhow::Result;
use hook_common::debug::HookDebugLog;
use hook_common::logging;
use hook_common::output::write_context;
use hook_common::prelude::*;
use hook_mem0::{
    Mem0Client, Mem0Config, MemoryRecord, MemoryService, Message, SAVE_GRACE_PERIOD, spawn_save,
};
use std::io::{self, Write};

const HOOK_NAME: &str = "mem0-prompt-submit";

const MEMORY_HEADER: &str = "## Relevant memories from previous conversations:";

fn main() -> Result<()> {
    logging::init();

    let Ok(input) = HookInput::from_stdin() else {
        return Ok(());
    };

    let Some(prompt) = input.prompt_text() else {
        return Ok(());
    };

    let config = Mem0Config::from_env();
    if !config.has_api_key() {
        // Unconfigured integration must not disturb the prompt
        log_decision(HOOK_NAME, "skip", "MEM0_API_KEY not configured");
        return Ok(());
    }

    let client = match Mem0Client::new(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{e}");
            log_decision(HOOK_NAME, "fail", &e.to_string());
            return Ok(());
        }
    };

    recall(&client, &config, prompt, &mut io::stdout().lock())
}

/// Search, optionally auto-save, and print the memory context.
fn recall<S>(service: &S, config: &Mem0Config, prompt: &str, out: &mut impl Write) -> Result<()>
where
    S: MemoryService + Clone + Send + 'static,
{
    let memories = search_memories(service, prompt);

    let pending = config
        .auto_save
        .then(|| spawn_save(service.clone(), vec![Message::user(prompt)]));

    let context = format_memories(&memories);
    if !context.is_empty() {
        write_context(out, &context)?;
    }

    let log = HookDebugLog::new(HOOK_NAME)
        .with_decision("inject", &format!("{} memories found", memories.len()))
        .with_context(prompt);
    if let Err(e) = log.write() {
        tracing::debug!("debug log unavailable: {e}");
    }

    if let Some(pending) = pending {
        let status = pending.wait(SAVE_GRACE_PERIOD);
        tracing::debug!("mem0 auto-save: {status:?}");
    }

    Ok(())
}

fn search_memories(service: &impl MemoryService, query: &str) -> Vec<MemoryRecord> {
    match service.search(query) {
        Ok(memories) => memories,
        Err(e) => {
            tracing::error!("mem0 search error: {e}");
            Vec::new()
        }
    }
}

/// Render memories as a markdown list under a fixed header.
///
/// Returns an empty string when no memory has text.
fn format_memories(memories: &[MemoryRecord]) -> String {
    let lines: Vec<String> = memories
        .iter()
        .filter(|m| !m.memory.is_empty())
        .map(|m| {
            if m.categories.is_empty() {
                format!("- {}", m.memory)
            } else {
                format!("- [{}] {}", m.categories.join(", "), m.memory)
            }
        })
        .collect();

    if lines.is_empty() {
        return String::new();
    }

    format!("{}\n{}", MEMORY_HEADER, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hook_mem0::{Mem0Error, Result as Mem0Result};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeMem0 {
        memories: Vec<MemoryRecord>,
        search_fails: bool,
        searches: Arc<Mutex<Vec<String>>>,
        saved: Arc<Mutex<Vec<Message>>>,
    }

    impl MemoryService for FakeMem0 {
        fn search(&self, query: &str) -> Mem0Result<Vec<MemoryRecord>> {
            self.searches.lock().unwrap().push(query.to_string());
            if self.search_fails {
                return Err(Mem0Error::Api {
                    status: 401,
                    message: "Invalid API key".to_string(),
                });
            }
            Ok(self.memories.clone())
        }

        fn add(&self, messages: &[Message]) -> Mem0Result<Value> {
            self.saved.lock().unwrap().extend_from_slice(messages);
            Ok(json!([{"event": "ADD"}]))
        }
    }

    fn config(auto_save: bool) -> Mem0Config {
        Mem0Config {
            api_key: "m0-test".to_string(),
            auto_save,
            ..Default::default()
        }
    }

    fn run(service: &FakeMem0, config: &Mem0Config, prompt: &str) -> String {
        let mut out = Vec::new();
        recall(service, config, prompt, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_single_memory() {
        let memories = vec![MemoryRecord::new("likes dark mode").with_categories(["preferences"])];
        insta::assert_snapshot!(format_memories(&memories), @r"
        ## Relevant memories from previous conversations:
        - [preferences] likes dark mode
        ");
    }

    #[test]
    fn test_format_mixed_memories() {
        let memories = vec![
            MemoryRecord::new("prefers Rust").with_categories(["preferences", "technology"]),
            MemoryRecord::new(""),
            MemoryRecord::new("works on the billing service"),
        ];
        insta::assert_snapshot!(format_memories(&memories), @r"
        ## Relevant memories from previous conversations:
        - [preferences, technology] prefers Rust
        - works on the billing service
        ");
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_memories(&[]), "");
        assert_eq!(format_memories(&[MemoryRecord::new("")]), "");
    }

    #[test]
    fn test_recall_prints_context_and_saves_prompt() {
        let service = FakeMem0 {
            memories: vec![MemoryRecord::new("likes dark mode").with_categories(["preferences"])],
            ..Default::default()
        };

        let output = run(&service, &config(true), "which theme should I use?");

        assert_eq!(
            output,
            "## Relevant memories from previous conversations:\n- [preferences] likes dark mode\n"
        );
        assert_eq!(*service.searches.lock().unwrap(), vec!["which theme should I use?"]);
        assert_eq!(
            *service.saved.lock().unwrap(),
            vec![Message::user("which theme should I use?")]
        );
    }

    #[test]
    fn test_recall_without_auto_save() {
        let service = FakeMem0::default();

        let output = run(&service, &config(false), "hello");

        assert_eq!(output, "");
        assert!(service.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn test_search_failure_is_silent() {
        let service = FakeMem0 {
            search_fails: true,
            ..Default::default()
        };

        let output = run(&service, &config(true), "hello");

        assert_eq!(output, "");
        // The prompt is still saved even though search failed
        assert_eq!(*service.saved.lock().unwrap(), vec![Message::user("hello")]);
    }
}
