//! Fire-and-forget saves with a bounded wait.
//!
//! The save runs on its own thread. The caller waits at most a grace period
//! for it; after that the thread is detached and its outcome is never
//! observed. The in-flight request is not cancelled.

use crate::client::MemoryService;
use crate::schema::Message;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// How long the prompt hook waits for its background save.
pub const SAVE_GRACE_PERIOD: Duration = Duration::from_secs(2);

/// What the caller learned about a background save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// The service accepted the messages.
    Saved,
    /// The service rejected the messages or was unreachable.
    Failed,
    /// Still running when the grace period ran out.
    TimedOut,
    /// The thread never reported back (failed to start or panicked).
    Lost,
}

/// Handle to a save running on a background thread.
#[derive(Debug)]
pub struct BackgroundSave {
    outcome: Receiver<bool>,
}

/// Start saving `messages` on a new thread.
pub fn spawn_save<S>(service: S, messages: Vec<Message>) -> BackgroundSave
where
    S: MemoryService + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("mem0-auto-save".to_string())
        .spawn(move || {
            let saved = match service.add(&messages) {
                Ok(_) => {
                    tracing::debug!("mem0 auto-save stored {} message(s)", messages.len());
                    true
                }
                Err(e) => {
                    tracing::error!("mem0 auto-save error: {e}");
                    false
                }
            };
            // The receiver is gone once the caller stopped waiting.
            let _ = tx.send(saved);
        });

    if let Err(e) = spawned {
        tracing::error!("mem0 auto-save could not start: {e}");
    }

    BackgroundSave { outcome: rx }
}

impl BackgroundSave {
    /// Wait up to `timeout` for the save to finish.
    pub fn wait(self, timeout: Duration) -> SaveStatus {
        match self.outcome.recv_timeout(timeout) {
            Ok(true) => SaveStatus::Saved,
            Ok(false) => SaveStatus::Failed,
            Err(RecvTimeoutError::Timeout) => SaveStatus::TimedOut,
            Err(RecvTimeoutError::Disconnected) => SaveStatus::Lost,
        }
    }
}
