use edubuddy_conversation::ConversationStore;
use tracing::info;

use super::init_common_components;
use crate::terminal::{self, TerminalTranscript};

/// Input parameters for the History command strategy.
#[derive(Debug, Clone, Copy)]
pub struct HistoryInput {
    /// Wipe the saved conversation instead of printing it
    pub clear: bool,
    /// Skip the confirmation prompt
    pub yes: bool,
}

/// Strategy for printing or clearing the saved conversation.
#[derive(Debug, Clone, Copy)]
pub struct HistoryStrategy;

impl super::CommandStrategy for HistoryStrategy {
    type Input = HistoryInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components()?;
        let theme = common.resolve_theme().await?;

        let transcript = TerminalTranscript::new(theme);
        transcript.set_muted(input.clear);
        let store =
            ConversationStore::new(common.client.clone(), common.storage.clone(), transcript);

        let restored = store.load().await;
        info!("Restored {restored} message(s)");

        if input.clear {
            let cleared = store
                .clear(|question| input.yes || terminal::confirm(question))
                .await?;
            if cleared {
                println!("Chat history cleared.");
            } else {
                println!("Kept {restored} message(s).");
            }
            return Ok(());
        }

        if restored == 0 {
            println!("No saved conversation.");
            return Ok(());
        }

        let messages = store.messages().await;
        let user_turns = messages.iter().filter(|m| m.is_user()).count();
        println!("\n{restored} message(s), {user_turns} question(s) asked.");
        Ok(())
    }
}
