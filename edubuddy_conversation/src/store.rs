//! The conversation store.
//!
//! `ConversationStore` owns the ordered message log, persists a full snapshot
//! after every mutation, and reconciles the log with replies from the ask
//! backend. At most one request is outstanding at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use edubuddy_core::{
    AskBackend, AskReply, AskRequest, CONVERSATION_KEY, KeyValueStore, Message, NullTranscript,
    Persona, Transcript,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::actions::QuickAction;

/// Bot reply used when the server reports a failure without a message.
pub const FALLBACK_REPLY: &str = "Oops! Something went wrong. Please try again.";

/// Bot reply used when no response arrived at all.
pub const CONNECTION_ERROR_REPLY: &str =
    "Oops! Something went wrong. Please check your connection and try again.";

/// Question put to the user before the history is wiped.
pub const CLEAR_CONFIRMATION: &str =
    "Are you sure you want to clear the chat history? This cannot be undone.";

#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("Conversation storage error: {0}")]
    Storage(anyhow::Error),

    #[error("Failed to encode conversation: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why an operation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Another request is still waiting for its reply.
    Busy,
    /// The message was empty after trimming.
    EmptyMessage,
    /// Retry needs at least two entries and a user message to resend.
    NothingToRetry,
    /// Quick actions need a bot reply to work on.
    NoBotMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Rejected(Rejection),
    Answered,
    RemoteFailure { status: u16 },
    TransportFailure,
}

impl SendOutcome {
    #[must_use]
    pub const fn is_rejected(self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

#[derive(Debug, Default)]
struct State {
    log: Vec<Message>,
    suggestions: Vec<String>,
    persona: Persona,
}

/// Holds the single-flight flag for as long as it lives.
struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ConversationStore<
    B = Arc<dyn AskBackend>,
    K = Arc<dyn KeyValueStore>,
    T = NullTranscript,
> {
    backend: B,
    storage: K,
    transcript: T,
    state: Mutex<State>,
    in_flight: AtomicBool,
}

impl<B, K, T> ConversationStore<B, K, T>
where
    B: AskBackend,
    K: KeyValueStore,
    T: Transcript,
{
    /// Create an empty store. Call [`Self::load`] to restore a saved log.
    pub fn new(backend: B, storage: K, transcript: T) -> Self {
        Self {
            backend,
            storage,
            transcript,
            state: Mutex::new(State::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.state.get_mut().persona = persona;
        self
    }

    /// Restore the persisted log and re-render it.
    ///
    /// A missing, unreadable or malformed snapshot leaves the log empty.
    /// Returns the number of restored messages.
    pub async fn load(&self) -> usize {
        let restored = match self.storage.get(CONVERSATION_KEY).await {
            Ok(Some(snapshot)) => serde_json::from_str::<Vec<Message>>(&snapshot)
                .unwrap_or_else(|e| {
                    warn!("Ignoring malformed conversation snapshot: {e}");
                    Vec::new()
                }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read conversation snapshot: {e:#}");
                Vec::new()
            }
        };

        let mut state = self.state.lock().await;
        for message in &restored {
            self.transcript.render_message(message);
        }

        let suggestions = restored
            .iter()
            .rev()
            .find(|m| m.is_bot())
            .map(|m| m.suggestions.clone())
            .unwrap_or_default();
        self.publish_suggestions(&suggestions);

        let count = restored.len();
        state.log = restored;
        state.suggestions = suggestions;

        info!("Restored {count} message(s) from storage");
        count
    }

    /// Send a user message and wait for the reply.
    ///
    /// Failures reported by the backend, or a missing response, become bot
    /// entries in the log. Only persistence failures are errors.
    pub async fn send(&self, message: &str) -> Result<SendOutcome, ConversationError> {
        let Some(guard) = FlightGuard::acquire(&self.in_flight) else {
            debug!("Send rejected: a request is already in flight");
            return Ok(SendOutcome::Rejected(Rejection::Busy));
        };
        self.dispatch(message, &guard).await
    }

    /// Drop the last bot reply and resend the user message that produced it.
    pub async fn retry(&self) -> Result<SendOutcome, ConversationError> {
        let Some(guard) = FlightGuard::acquire(&self.in_flight) else {
            debug!("Retry rejected: a request is already in flight");
            return Ok(SendOutcome::Rejected(Rejection::Busy));
        };

        let resend = {
            let mut state = self.state.lock().await;
            if state.log.len() < 2 {
                return Ok(SendOutcome::Rejected(Rejection::NothingToRetry));
            }

            let drop_last = state.log.last().is_some_and(Message::is_bot);
            let kept = if drop_last {
                &state.log[..state.log.len() - 1]
            } else {
                &state.log[..]
            };
            let Some(text) = kept.iter().rev().find(|m| m.is_user()).map(|m| m.text.clone())
            else {
                return Ok(SendOutcome::Rejected(Rejection::NothingToRetry));
            };

            if drop_last {
                let dropped = state.log.pop();
                if let Err(e) = self.persist(&state.log).await {
                    state.log.extend(dropped);
                    return Err(e);
                }
                self.transcript.retract_last();
            }
            text
        };

        info!("Retrying last message");
        self.dispatch(&resend, &guard).await
    }

    /// Ask the backend to rework its latest reply.
    pub async fn quick_action(&self, action: QuickAction) -> Result<SendOutcome, ConversationError> {
        let Some(last) = self.last_bot_text().await else {
            return Ok(SendOutcome::Rejected(Rejection::NoBotMessage));
        };
        self.send(&action.prompt(&last)).await
    }

    /// Wipe the log and its snapshot once `confirm` agrees.
    ///
    /// Returns whether anything was cleared.
    pub async fn clear<F>(&self, confirm: F) -> Result<bool, ConversationError>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(CLEAR_CONFIRMATION) {
            debug!("Clear declined");
            return Ok(false);
        }

        let mut state = self.state.lock().await;
        self.storage
            .delete(CONVERSATION_KEY)
            .await
            .map_err(ConversationError::Storage)?;
        state.log.clear();
        state.suggestions.clear();

        self.transcript.clear();
        self.transcript.hide_suggestions();
        info!("Conversation cleared");
        Ok(true)
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.state.lock().await.log.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.log.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.log.is_empty()
    }

    pub async fn active_suggestions(&self) -> Vec<String> {
        self.state.lock().await.suggestions.clone()
    }

    pub async fn last_bot_text(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .log
            .iter()
            .rev()
            .find(|m| m.is_bot())
            .map(|m| m.text.clone())
    }

    pub async fn persona(&self) -> Persona {
        self.state.lock().await.persona
    }

    pub async fn set_persona(&self, persona: Persona) {
        self.state.lock().await.persona = persona;
        info!("Persona set to {persona}");
    }

    /// Whether a request is waiting for its reply.
    pub fn is_waiting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub const fn transcript(&self) -> &T {
        &self.transcript
    }

    async fn dispatch(
        &self,
        message: &str,
        _guard: &FlightGuard<'_>,
    ) -> Result<SendOutcome, ConversationError> {
        let text = message.trim();
        if text.is_empty() {
            return Ok(SendOutcome::Rejected(Rejection::EmptyMessage));
        }

        let request = {
            let mut state = self.state.lock().await;
            self.append(&mut state.log, Message::user(text)).await?;

            state.suggestions.clear();
            self.transcript.hide_suggestions();

            AskRequest {
                message: text.to_string(),
                persona: state.persona,
                history: state.log.clone(),
            }
        };

        debug!(
            "Asking backend: persona={}, history={} message(s)",
            request.persona,
            request.history.len()
        );
        self.transcript.set_pending(true);
        let reply = self.backend.ask(&request).await;
        self.transcript.set_pending(false);

        let (entry, outcome) = match reply {
            Ok(AskReply::Answer {
                message,
                suggestions,
            }) => (Message::bot(message, suggestions), SendOutcome::Answered),
            Ok(AskReply::Failed { status, message }) => {
                warn!("Backend reported failure: status={status}");
                let text = message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| FALLBACK_REPLY.to_string());
                (
                    Message::bot(text, Vec::new()),
                    SendOutcome::RemoteFailure { status },
                )
            }
            Err(e) => {
                warn!("Ask request failed: {e:#}");
                (
                    Message::bot(CONNECTION_ERROR_REPLY, Vec::new()),
                    SendOutcome::TransportFailure,
                )
            }
        };

        let mut state = self.state.lock().await;
        let suggestions = entry.suggestions.clone();
        self.append(&mut state.log, entry).await?;

        self.publish_suggestions(&suggestions);
        state.suggestions = suggestions;

        Ok(outcome)
    }

    /// Push `entry` and persist; on a failed write the log is left as it was.
    async fn append(
        &self,
        log: &mut Vec<Message>,
        entry: Message,
    ) -> Result<(), ConversationError> {
        log.push(entry);
        if let Err(e) = self.persist(log).await {
            log.pop();
            return Err(e);
        }
        if let Some(entry) = log.last() {
            self.transcript.render_message(entry);
        }
        Ok(())
    }

    async fn persist(&self, log: &[Message]) -> Result<(), ConversationError> {
        let snapshot = serde_json::to_string(log)?;
        self.storage
            .set(CONVERSATION_KEY, &snapshot)
            .await
            .map_err(ConversationError::Storage)?;
        debug!("Persisted {} message(s)", log.len());
        Ok(())
    }

    fn publish_suggestions(&self, suggestions: &[String]) {
        if suggestions.is_empty() {
            self.transcript.hide_suggestions();
        } else {
            self.transcript.show_suggestions(suggestions);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flight_guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        let first = FlightGuard::acquire(&flag);
        assert!(first.is_some());
        assert!(FlightGuard::acquire(&flag).is_none());

        drop(first);
        assert!(!flag.load(Ordering::Acquire));
        assert!(FlightGuard::acquire(&flag).is_some());
    }

    #[test]
    fn rejected_outcomes_are_flagged() {
        assert!(SendOutcome::Rejected(Rejection::Busy).is_rejected());
        assert!(!SendOutcome::Answered.is_rejected());
        assert!(!SendOutcome::TransportFailure.is_rejected());
    }
}
