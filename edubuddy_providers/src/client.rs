use async_trait::async_trait;
use edubuddy_core::{ApiStatus, AskBackend, AskReply, AskRequest, Transcriber, Transcription};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::retry::retry_with_backoff;

/// HTTP client for the EduBuddy backend (`/ask`, `/whisper`, `/api_status`).
pub struct EduBuddyClient {
    client: Client,
    base_url: String,
    status_retry_delays: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct AnswerBody {
    message: String,
    #[serde(default, deserialize_with = "lenient_suggestions")]
    suggestions: Vec<String>,
}

/// Suggestions come from model output, so keep whatever string entries there
/// are and drop the rest instead of losing the answer.
fn lenient_suggestions<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let suggestions = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        other => {
            debug!("Ignoring non-list suggestions: {other}");
            Vec::new()
        }
    };
    Ok(suggestions)
}

#[derive(Debug, Deserialize)]
struct FailureBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionBody {
    #[serde(default)]
    transcription: String,
}

impl EduBuddyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Creating EduBuddyClient for {base_url}");
        Self {
            client: Client::new(),
            base_url,
            status_retry_delays: vec![1, 2],
        }
    }

    /// Seconds to wait between `/api_status` attempts.
    #[must_use]
    pub fn with_status_retry_delays(mut self, delays: Vec<u64>) -> Self {
        self.status_retry_delays = delays;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Which backend services are configured.
    ///
    /// Reports nothing configured when the backend cannot be reached.
    pub async fn api_status(&self) -> ApiStatus {
        match retry_with_backoff(|| self.try_status(), &self.status_retry_delays).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Error checking API status: {e:#}");
                ApiStatus::default()
            }
        }
    }

    async fn try_status(&self) -> anyhow::Result<ApiStatus> {
        let status = self
            .client
            .get(self.url("api_status"))
            .send()
            .await?
            .error_for_status()?
            .json::<ApiStatus>()
            .await?;
        Ok(status)
    }

    /// Read the `message` of a failure body, if it has one.
    async fn failure_message(response: reqwest::Response) -> Option<String> {
        response
            .json::<FailureBody>()
            .await
            .ok()
            .and_then(|body| body.message)
    }
}

#[async_trait]
impl AskBackend for EduBuddyClient {
    async fn ask(&self, request: &AskRequest) -> anyhow::Result<AskReply> {
        info!("Sending request to /ask: persona={}", request.persona);

        let response = self
            .client
            .post(self.url("ask"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::failure_message(response).await;
            warn!("/ask returned {status}");
            return Ok(AskReply::Failed {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<AnswerBody>().await?;
        debug!("Received answer with {} suggestion(s)", body.suggestions.len());
        Ok(AskReply::Answer {
            message: body.message,
            suggestions: body.suggestions,
        })
    }
}

#[async_trait]
impl Transcriber for EduBuddyClient {
    async fn transcribe(&self, audio_data_uri: &str) -> anyhow::Result<Transcription> {
        info!("Sending audio to /whisper ({} bytes)", audio_data_uri.len());

        let response = self
            .client
            .post(self.url("whisper"))
            .json(&json!({ "audio": audio_data_uri }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::failure_message(response).await;
            warn!("/whisper returned {status}");
            return Ok(Transcription::Failed { message });
        }

        let body = response.json::<TranscriptionBody>().await?;
        Ok(Transcription::Text(body.transcription))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_suggestions_keep_the_answer() {
        let body: AnswerBody = serde_json::from_value(json!({
            "message": "A limit is...",
            "suggestions": ["Example?", 3, {"q": "Proof?"}, null, "Graph it?"],
        }))
        .unwrap();
        assert_eq!(body.message, "A limit is...");
        assert_eq!(body.suggestions, vec!["Example?", "Graph it?"]);

        for suggestions in [json!("Example?"), json!(null), json!({"a": 1})] {
            let body: AnswerBody = serde_json::from_value(json!({
                "message": "ok",
                "suggestions": suggestions,
            }))
            .unwrap();
            assert!(body.suggestions.is_empty());
        }
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = EduBuddyClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("ask"), "http://localhost:5000/ask");
    }
}
