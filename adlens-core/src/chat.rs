//! Chat assistant for the analysis panel.
//!
//! Replies are fixed templates keyed by the selection's kind and size. The user's text
//! does not influence the reply. A follow-up is delivered after a short "thinking"
//! delay on a Tokio task, which is aborted when the pending reply is cancelled or the
//! session is dropped.

use crate::config::ChatConfig;
use crate::selection::Selection;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Greeting shown when the chat panel opens.
pub fn opening_message(selection: Option<&Selection>) -> String {
    match selection {
        Some(Selection::Rows { ads }) => format!(
            "Hello! I can see you've selected {} ad campaigns for analysis. I can help you \
             understand performance patterns, identify optimization opportunities, and answer \
             questions about these specific campaigns.",
            ads.len()
        ),
        Some(Selection::Columns { metrics, .. }) => format!(
            "Hello! You've selected {} metrics for analysis. I can help you understand how \
             these metrics relate to each other, identify trends, and provide insights on \
             performance optimization.",
            metrics.len()
        ),
        Some(Selection::Cells { cells }) => format!(
            "Hello! You've selected {} specific data points for analysis. I can help you \
             understand these specific values, compare them against benchmarks, and provide \
             targeted recommendations.",
            cells.len()
        ),
        None => "Hello! I'm here to help you analyze your Facebook ads data. What would you like to know?"
            .to_string(),
    }
}

/// Reply to any user message.
pub fn follow_up(selection: Option<&Selection>) -> String {
    match selection {
        Some(Selection::Rows { ads }) => format!(
            "Based on your {} selected campaigns, I can see interesting patterns in performance. \
             Would you like me to dive deeper into specific metrics or compare these campaigns \
             against your account averages?",
            ads.len()
        ),
        Some(Selection::Columns { metrics, .. }) => format!(
            "Looking at your {} selected metrics, I can help you understand how they correlate \
             and which ones are most predictive of success. What specific relationships would \
             you like me to explore?",
            metrics.len()
        ),
        Some(Selection::Cells { cells }) => format!(
            "I've analyzed your {} selected data points. These specific values show some \
             interesting patterns. Would you like me to explain what makes these particular \
             metrics stand out?",
            cells.len()
        ),
        None => "I'm ready to help analyze your selection. What would you like to know?".to_string(),
    }
}

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A chat transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

type Transcript = Arc<Mutex<Vec<ChatMessage>>>;

fn lock(transcript: &Transcript) -> MutexGuard<'_, Vec<ChatMessage>> {
    transcript.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A conversation about one selection.
///
/// At most one reply is pending at a time. Dropping the session cancels it.
pub struct ChatSession {
    selection: Option<Selection>,
    transcript: Transcript,
    pending: Option<JoinHandle<()>>,
    reply_delay: Duration,
}

impl ChatSession {
    /// Start a session whose transcript opens with the greeting for `selection`.
    pub fn new(selection: Option<Selection>, config: &ChatConfig) -> Self {
        let greeting = ChatMessage::new(ChatRole::Assistant, opening_message(selection.as_ref()));
        Self {
            selection,
            transcript: Arc::new(Mutex::new(vec![greeting])),
            pending: None,
            reply_delay: Duration::from_millis(config.reply_delay_ms),
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Whether a reply is scheduled but not yet delivered.
    pub fn is_thinking(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Post a user message and schedule the assistant's follow-up.
    ///
    /// Returns `false` without changing the transcript when `text` is blank or a reply
    /// is still pending.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn send(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        if self.is_thinking() {
            tracing::debug!("Reply pending, ignoring message");
            return false;
        }

        lock(&self.transcript).push(ChatMessage::new(ChatRole::User, text));

        let transcript = Arc::clone(&self.transcript);
        let reply = follow_up(self.selection.as_ref());
        let delay = self.reply_delay;
        tracing::debug!(delay_ms = delay.as_millis() as u64, "Scheduling reply");

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            lock(&transcript).push(ChatMessage::new(ChatRole::Assistant, reply));
        }));
        true
    }

    /// Wait for the pending reply, if any, to be delivered.
    pub async fn wait_for_reply(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                tracing::debug!(error = %e, "Reply task did not complete");
            }
        }
    }

    /// Abort the pending reply. Returns whether one was pending.
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                tracing::debug!("Cancelled pending reply");
                true
            }
            _ => false,
        }
    }

    /// Snapshot of the conversation so far.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        lock(&self.transcript).clone()
    }

    /// The most recent message.
    pub fn last_message(&self) -> Option<ChatMessage> {
        lock(&self.transcript).last().cloned()
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
