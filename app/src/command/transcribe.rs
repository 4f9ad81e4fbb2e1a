use std::path::PathBuf;

use edubuddy_providers::{AudioClip, VoiceInput, VoiceText};

use super::init_common_components;

/// Input parameters for the Transcribe command strategy.
#[derive(Debug, Clone)]
pub struct TranscribeInput {
    /// Recorded audio to send to `/whisper`.
    pub file: PathBuf,
}

/// Strategy for turning an audio file into message text.
///
/// The transcription goes to stdout; the fallback notice goes to stderr and
/// the command fails, so scripts never mistake it for the user's words.
#[derive(Debug, Clone, Copy)]
pub struct TranscribeStrategy;

impl super::CommandStrategy for TranscribeStrategy {
    type Input = TranscribeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components()?;
        let clip = AudioClip::from_file(&input.file).await?;
        let voice = VoiceInput::new(common.client.clone());

        match voice.to_input_text(&clip).await {
            VoiceText::Transcribed(text) => {
                println!("{text}");
                Ok(())
            }
            VoiceText::Fallback(notice) => anyhow::bail!(notice),
        }
    }
}
