//! Stop hook: Save the recent conversation to mem0.
//!
//! Takes the last `MEM0_SAVE_MESSAGES` transcript messages and stores them.
//! Never blocks the stop: the exit code is always 0.

use anyhow::Result;
use hook_common::logging;
use hook_common::prelude::*;
use hook_mem0::{Mem0Client, Mem0Config, MemoryService, Message, extract_messages};
use serde_json::Value;

const HOOK_NAME: &str = "mem0-stop";

fn main() -> Result<()> {
    logging::init();

    let Ok(input) = HookInput::from_stdin() else {
        return Ok(());
    };

    let config = Mem0Config::from_env();
    if !config.has_api_key() {
        log_decision(HOOK_NAME, "skip", "MEM0_API_KEY not configured");
        return Ok(());
    }

    let messages = extract_messages(&input.transcript_records(), config.save_messages);
    if messages.is_empty() {
        log_decision(HOOK_NAME, "skip", "no messages in transcript");
        return Ok(());
    }

    let report = config.report_save_failure;
    let output = match Mem0Client::new(&config) {
        Ok(client) => save_session(&client, &messages, report),
        Err(e) => stop_output(Err(e), messages.len(), report),
    };

    if let Some(output) = output {
        output.write_stdout()?;
    }

    Ok(())
}

/// Save the messages through any memory service.
fn save_session(
    service: &impl MemoryService,
    messages: &[Message],
    report_failure: bool,
) -> Option<HookOutput> {
    stop_output(service.add(messages), messages.len(), report_failure)
}

/// Decide what to print for a save outcome.
///
/// Success lets the stop proceed. Failure is logged and, unless reporting is
/// enabled, produces no output at all.
fn stop_output(
    outcome: hook_mem0::Result<Value>,
    saved: usize,
    report_failure: bool,
) -> Option<HookOutput> {
    match outcome {
        Ok(_) => {
            log_decision(HOOK_NAME, "save", &format!("{saved} messages saved"));
            Some(HookOutput::proceed())
        }
        Err(e) => {
            tracing::error!("mem0 save error: {e}");
            log_decision(HOOK_NAME, "fail", &e.to_string());
            report_failure.then(|| {
                HookOutput::proceed().with_system_message(format!("mem0 save failed: {e}"))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hook_mem0::{Mem0Error, MemoryRecord, Result as Mem0Result};
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeMem0 {
        fail: bool,
        saved: RefCell<Vec<Message>>,
    }

    impl MemoryService for FakeMem0 {
        fn search(&self, _query: &str) -> Mem0Result<Vec<MemoryRecord>> {
            Ok(Vec::new())
        }

        fn add(&self, messages: &[Message]) -> Mem0Result<Value> {
            if self.fail {
                return Err(Mem0Error::Api {
                    status: 503,
                    message: "Service Unavailable".to_string(),
                });
            }
            self.saved.borrow_mut().extend_from_slice(messages);
            Ok(json!({"message": "ok"}))
        }
    }

    fn transcript(json: &str) -> Vec<Value> {
        HookInput::parse(json).unwrap().transcript_records()
    }

    #[test]
    fn test_saves_extracted_messages() {
        let records = transcript(
            r#"{"transcript": [
                {"role": "user", "content": [{"type": "text", "text": "part one"}, {"type": "text", "text": "part two"}]},
                {"role": "assistant", "content": "noted"}
            ]}"#,
        );
        let messages = extract_messages(&records, 10);
        let service = FakeMem0::default();

        let output = save_session(&service, &messages, false);

        assert_eq!(output, Some(HookOutput::proceed()));
        assert_eq!(
            *service.saved.borrow(),
            vec![Message::user("part one part two"), Message::new("assistant", "noted")]
        );
    }

    #[test]
    fn test_failure_is_silent_by_default() {
        let service = FakeMem0 {
            fail: true,
            ..Default::default()
        };

        let output = save_session(&service, &[Message::user("hi")], false);

        assert_eq!(output, None);
    }

    #[test]
    fn test_failure_can_be_reported() {
        let service = FakeMem0 {
            fail: true,
            ..Default::default()
        };

        let output = save_session(&service, &[Message::user("hi")], true).unwrap();

        assert!(output.should_continue);
        assert_eq!(
            output.system_message.as_deref(),
            Some("mem0 save failed: mem0 API error (503): Service Unavailable")
        );
    }

    #[test]
    fn test_unavailable_client_output() {
        let outcome = Err(Mem0Error::Unavailable("no TLS backend".to_string()));
        assert_eq!(stop_output(outcome, 1, false), None);
    }
}
