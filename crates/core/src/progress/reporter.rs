//! Single-message progress reporting.

use std::sync::Arc;
use tracing::{debug, warn};

use super::traits::StatusSink;
use super::types::{Stage, StatusHandle};

/// Keeps one status message per request up to date.
///
/// Transport failures are logged and swallowed; progress reporting never
/// fails a request. If the initial message could not be sent, the next
/// update sends it instead, so at most one message ever exists.
pub struct ProgressReporter {
    sink: Arc<dyn StatusSink>,
    chat_id: i64,
    handle: Option<StatusHandle>,
    last_text: Option<String>,
    history: Vec<Stage>,
}

impl ProgressReporter {
    /// Sends the initial "processing" message.
    pub async fn start(sink: Arc<dyn StatusSink>, chat_id: i64) -> Self {
        let mut reporter = Self {
            sink,
            chat_id,
            handle: None,
            last_text: None,
            history: vec![Stage::Received],
        };
        if let Some(text) = Stage::Received.status_text() {
            reporter.set_text(text).await;
        }
        reporter
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.history.last().copied().unwrap_or(Stage::Received)
    }

    /// Every stage entered so far, in order.
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    /// Handle of the status message, once sent.
    pub fn handle(&self) -> Option<StatusHandle> {
        self.handle
    }

    /// Moves to `stage` and shows its text.
    pub async fn advance(&mut self, stage: Stage) {
        self.enter(stage);
        if let Some(text) = stage.status_text() {
            self.set_text(text).await;
        }
    }

    /// Moves to `stage` showing `text` instead of the stage's own text.
    pub async fn advance_with_text(&mut self, stage: Stage, text: &str) {
        self.enter(stage);
        self.set_text(text).await;
    }

    /// Announces the re-encode fallback.
    pub async fn fallback(&mut self) {
        self.advance(Stage::ConvertingFallback).await;
    }

    /// Shows the final text and enters the terminal stage.
    pub async fn finish(&mut self, stage: Stage, text: &str) {
        self.advance_with_text(stage, text).await;
    }

    fn enter(&mut self, stage: Stage) {
        if self.stage() == stage {
            return;
        }
        debug!(chat_id = self.chat_id, from = %self.stage(), to = %stage, "Stage transition");
        self.history.push(stage);
    }

    async fn set_text(&mut self, text: &str) {
        if self.last_text.as_deref() == Some(text) {
            return;
        }

        match self.handle {
            Some(handle) => {
                if let Err(e) = self.sink.edit(&handle, text).await {
                    warn!(chat_id = self.chat_id, error = %e, "Status edit failed");
                    return;
                }
            }
            None => match self.sink.create(self.chat_id, text).await {
                Ok(handle) => self.handle = Some(handle),
                Err(e) => {
                    warn!(chat_id = self.chat_id, error = %e, "Status message not sent");
                    return;
                }
            },
        }
        self.last_text = Some(text.to_string());
    }
}
