//! Voice input: recorded audio in, message text out.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use edubuddy_core::{Transcriber, Transcription};
use thiserror::Error;
use tracing::{info, warn};

/// Input text offered when the backend could not transcribe the audio.
pub const TRANSCRIPTION_FAILED: &str =
    "Failed to transcribe audio. Please type your message instead.";

/// Input text offered when the transcription request got no response.
pub const TRANSCRIPTION_ERROR: &str =
    "Voice transcription failed. Please type your message instead.";

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Could not access your audio at {path}. Please check the file and try again.")]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Audio file {0} is empty")]
    Empty(PathBuf),
}

/// A recorded clip ready to be sent for transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    bytes: Vec<u8>,
    mime: &'static str,
}

impl AudioClip {
    #[must_use]
    pub const fn new(bytes: Vec<u8>, mime: &'static str) -> Self {
        Self { bytes, mime }
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, VoiceError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| VoiceError::Access {
                path: path.to_path_buf(),
                source,
            })?;
        if bytes.is_empty() {
            return Err(VoiceError::Empty(path.to_path_buf()));
        }
        Ok(Self::new(bytes, Self::mime_for(path)))
    }

    /// MIME type from the file extension, `audio/webm` when unknown.
    #[must_use]
    pub fn mime_for(path: &Path) -> &'static str {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("wav") => "audio/wav",
            Some("mp3") => "audio/mpeg",
            Some("ogg" | "oga") => "audio/ogg",
            Some("m4a" | "mp4") => "audio/mp4",
            _ => "audio/webm",
        }
    }

    #[must_use]
    pub const fn mime(&self) -> &'static str {
        self.mime
    }

    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Text produced for the input box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceText {
    Transcribed(String),
    /// A notice to replace by hand; never sent automatically.
    Fallback(&'static str),
}

impl VoiceText {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Transcribed(text) => text.as_str(),
            Self::Fallback(notice) => *notice,
        }
    }

    #[must_use]
    pub const fn is_transcribed(&self) -> bool {
        matches!(self, Self::Transcribed(_))
    }
}

pub struct VoiceInput<T> {
    transcriber: T,
}

impl<T: Transcriber> VoiceInput<T> {
    pub const fn new(transcriber: T) -> Self {
        Self { transcriber }
    }

    pub async fn to_input_text(&self, clip: &AudioClip) -> VoiceText {
        match self.transcriber.transcribe(&clip.data_uri()).await {
            Ok(Transcription::Text(text)) if !text.trim().is_empty() => {
                info!("Transcribed {} character(s)", text.len());
                VoiceText::Transcribed(text)
            }
            Ok(Transcription::Text(_)) => {
                warn!("Transcription came back empty");
                VoiceText::Fallback(TRANSCRIPTION_FAILED)
            }
            Ok(Transcription::Failed { message }) => {
                warn!(
                    "Transcription error: {}",
                    message.as_deref().unwrap_or("no message")
                );
                VoiceText::Fallback(TRANSCRIPTION_FAILED)
            }
            Err(e) => {
                warn!("Error in transcription process: {e:#}");
                VoiceText::Fallback(TRANSCRIPTION_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedTranscriber {
        reply: Mutex<Option<anyhow::Result<Transcription>>>,
        seen: Mutex<Vec<String>>,
    }

    impl FixedTranscriber {
        fn new(reply: anyhow::Result<Transcription>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, audio_data_uri: &str) -> anyhow::Result<Transcription> {
            self.seen.lock().unwrap().push(audio_data_uri.to_string());
            self.reply.lock().unwrap().take().unwrap()
        }
    }

    #[test]
    fn data_uri_carries_mime_and_payload() {
        let clip = AudioClip::new(b"hello".to_vec(), "audio/wav");
        assert_eq!(clip.data_uri(), "data:audio/wav;base64,aGVsbG8=");
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(AudioClip::mime_for(Path::new("a.WAV")), "audio/wav");
        assert_eq!(AudioClip::mime_for(Path::new("a.mp3")), "audio/mpeg");
        assert_eq!(AudioClip::mime_for(Path::new("a.m4a")), "audio/mp4");
        assert_eq!(AudioClip::mime_for(Path::new("recording")), "audio/webm");
    }

    #[tokio::test]
    async fn unreadable_file_is_an_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AudioClip::from_file(dir.path().join("missing.webm"))
            .await
            .unwrap_err();
        assert!(matches!(err, VoiceError::Access { .. }));
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("silence.webm");
        std::fs::write(&path, b"").unwrap();
        let err = AudioClip::from_file(&path).await.unwrap_err();
        assert!(matches!(err, VoiceError::Empty(_)));
    }

    #[tokio::test]
    async fn transcription_becomes_input_text() {
        let transcriber = FixedTranscriber::new(Ok(Transcription::Text("What is a limit?".into())));
        let voice = VoiceInput::new(transcriber);
        let clip = AudioClip::new(vec![1, 2, 3], "audio/webm");

        let text = voice.to_input_text(&clip).await;

        assert_eq!(text, VoiceText::Transcribed("What is a limit?".into()));
        assert_eq!(
            voice.transcriber.seen.lock().unwrap()[0],
            "data:audio/webm;base64,AQID"
        );
    }

    #[tokio::test]
    async fn failures_fall_back_to_notices() {
        let clip = AudioClip::new(vec![1], "audio/webm");

        let failed = VoiceInput::new(FixedTranscriber::new(Ok(Transcription::Failed {
            message: Some("quota".into()),
        })));
        assert_eq!(
            failed.to_input_text(&clip).await,
            VoiceText::Fallback(TRANSCRIPTION_FAILED)
        );

        let empty = VoiceInput::new(FixedTranscriber::new(Ok(Transcription::Text("  ".into()))));
        assert_eq!(
            empty.to_input_text(&clip).await.text(),
            TRANSCRIPTION_FAILED
        );

        let offline = VoiceInput::new(FixedTranscriber::new(Err(anyhow::anyhow!("refused"))));
        let text = offline.to_input_text(&clip).await;
        assert!(!text.is_transcribed());
        assert_eq!(text.text(), TRANSCRIPTION_ERROR);
    }
}
