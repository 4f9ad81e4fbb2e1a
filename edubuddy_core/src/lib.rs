#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod persona;
pub mod wire;

pub use persona::{ParsePersonaError, Persona};
pub use wire::{ApiStatus, AskReply, AskRequest, Transcription};

/// Storage key holding the JSON snapshot of the message log.
pub const CONVERSATION_KEY: &str = "EduBuddyConversation";

/// Storage key holding the theme preference (`"dark"` / `"light"`).
pub const THEME_KEY: &str = "EduBuddyTheme";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One entry in the conversation log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    /// Follow-up prompts offered with a bot reply. Always empty for user entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl Message {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            suggestions: Vec::new(),
        }
    }

    #[must_use]
    pub fn bot(text: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            suggestions,
        }
    }

    #[must_use]
    pub const fn is_bot(&self) -> bool {
        matches!(self.sender, Sender::Bot)
    }

    #[must_use]
    pub const fn is_user(&self) -> bool {
        matches!(self.sender, Sender::User)
    }
}

/// Key-value persistence port (the `localStorage` of the client).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        (**self).delete(key).await
    }
}

/// The remote "ask" collaborator.
///
/// `Err` means no response arrived at all (transport failure). A response
/// with a non-success status is `Ok(AskReply::Failed { .. })`.
#[async_trait]
pub trait AskBackend: Send + Sync {
    async fn ask(&self, request: &AskRequest) -> anyhow::Result<AskReply>;
}

#[async_trait]
impl<T: AskBackend + ?Sized> AskBackend for Arc<T> {
    async fn ask(&self, request: &AskRequest) -> anyhow::Result<AskReply> {
        (**self).ask(request).await
    }
}

/// The remote speech-to-text collaborator. Takes an audio data URI.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_data_uri: &str) -> anyhow::Result<Transcription>;
}

#[async_trait]
impl<T: Transcriber + ?Sized> Transcriber for Arc<T> {
    async fn transcribe(&self, audio_data_uri: &str) -> anyhow::Result<Transcription> {
        (**self).transcribe(audio_data_uri).await
    }
}

/// Presentation collaborator. Receives plain data only.
pub trait Transcript: Send + Sync {
    fn render_message(&self, message: &Message);
    /// Drop the most recently rendered message.
    fn retract_last(&self);
    fn show_suggestions(&self, suggestions: &[String]);
    fn hide_suggestions(&self);
    /// Typing indicator while a request is outstanding.
    fn set_pending(&self, pending: bool);
    fn clear(&self);
}

/// A transcript that renders nothing. Used for headless operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTranscript;

impl Transcript for NullTranscript {
    fn render_message(&self, _message: &Message) {}
    fn retract_last(&self) {}
    fn show_suggestions(&self, _suggestions: &[String]) {}
    fn hide_suggestions(&self) {}
    fn set_pending(&self, _pending: bool) {}
    fn clear(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_entries_omit_suggestions() {
        let json = serde_json::to_string(&Message::user("What is a limit?")).unwrap();
        assert_eq!(json, r#"{"sender":"user","text":"What is a limit?"}"#);
    }

    #[test]
    fn bot_entry_without_suggestions_field_parses() {
        let msg: Message = serde_json::from_str(r#"{"sender":"bot","text":"hi"}"#).unwrap();
        assert!(msg.is_bot());
        assert!(msg.suggestions.is_empty());
    }

    #[test]
    fn log_snapshot_keeps_every_field() {
        let log = vec![
            Message::user("What is a limit?"),
            Message::bot(
                "A limit is...",
                vec!["Example?".to_string(), "Proof?".to_string()],
            ),
        ];
        let json = serde_json::to_string(&log).unwrap();
        let parsed: Vec<Message> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, log);
    }
}
