//! Request and response bodies exchanged with the EduBuddy backend.

use serde::{Deserialize, Serialize};

use crate::{Message, Persona};

/// Body of `POST /ask`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AskRequest {
    pub message: String,
    pub persona: Persona,
    /// Full log, including the user entry for `message`.
    pub history: Vec<Message>,
}

/// Outcome of an `/ask` call that produced a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskReply {
    Answer {
        message: String,
        suggestions: Vec<String>,
    },
    /// Non-success status, with the server-supplied message when there was one.
    Failed {
        status: u16,
        message: Option<String>,
    },
}

/// Outcome of a `/whisper` call that produced a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcription {
    Text(String),
    Failed { message: Option<String> },
}

/// Body of `GET /api_status`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiStatus {
    pub gemini_configured: bool,
    pub whisper_configured: bool,
}

impl ApiStatus {
    /// Warnings for each backend service that is not configured.
    #[must_use]
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if !self.gemini_configured {
            warnings.push("Gemini API not configured");
        }
        if !self.whisper_configured {
            warnings.push("Whisper API not configured");
        }
        warnings
    }
}
