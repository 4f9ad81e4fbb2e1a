//! Conversation command: one-shot or an interactive session over the saved log.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use edubuddy_conversation::{ConversationStore, QuickAction, Rejection, SendOutcome};
use edubuddy_core::Persona;
use edubuddy_providers::{AudioClip, EduBuddyClient, VoiceInput, VoiceText};
use edubuddy_storage::JsonFileStore;
use tracing::{info, warn};

use super::{CommonComponents, init_common_components};
use crate::terminal::{self, TerminalTranscript};

type TerminalStore =
    ConversationStore<Arc<EduBuddyClient>, Arc<JsonFileStore>, TerminalTranscript>;

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Persona override; the configured default otherwise
    pub persona: Option<Persona>,
}

/// Strategy for executing the Chat command.
///
/// Restores the saved conversation, then either sends one message or runs
/// the interactive loop. Every exchange is persisted as it happens.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components()?;
        let theme = common.resolve_theme().await?;
        let persona = input
            .persona
            .unwrap_or(common.config.chat.default_persona);

        let store = ConversationStore::new(
            common.client.clone(),
            common.storage.clone(),
            TerminalTranscript::new(theme),
        )
        .with_persona(persona);

        if let Some(msg) = input.message {
            // Single message mode: history is context, not output.
            store.transcript().set_muted(true);
            store.load().await;
            store.transcript().set_muted(false);

            let outcome = store.send(&msg).await?;
            report(outcome);
            if outcome.is_rejected() {
                anyhow::bail!("Message not sent");
            }
            return Ok(());
        }

        let status = common.client.api_status().await;
        for warning in status.warnings() {
            eprintln!("⚠️  {warning}");
        }

        let restored = store.load().await;
        info!("Starting chat with {restored} restored message(s)");
        run_interactive(&common, &store).await
    }
}

async fn run_interactive(common: &CommonComponents, store: &TerminalStore) -> anyhow::Result<()> {
    println!("\n=== EduBuddy ({}) ===", store.persona().await.label());
    println!("Type /help for commands, 'exit' to leave.\n");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = terminal::read_line()? else {
            break;
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Exit => break,
            command => {
                // A failed save or theme write is reported; the session goes on.
                if let Err(e) = handle(common, store, command).await {
                    eprintln!("Error: {e:#}");
                }
            }
        }
    }

    println!("\nSession ended. {} message(s) saved.", store.len().await);
    Ok(())
}

async fn handle(
    common: &CommonComponents,
    store: &TerminalStore,
    command: ReplCommand,
) -> anyhow::Result<()> {
    match command {
        ReplCommand::Empty | ReplCommand::Exit => {}
        ReplCommand::Help => print_help(),
        ReplCommand::Message(text) => report(store.send(&text).await?),
        ReplCommand::Retry => report(store.retry().await?),
        ReplCommand::Action(action) => report(store.quick_action(action).await?),
        ReplCommand::Suggest(n) => {
            let suggestions = store.active_suggestions().await;
            match n.checked_sub(1).and_then(|i| suggestions.get(i)) {
                Some(suggestion) => report(store.send(suggestion).await?),
                None if suggestions.is_empty() => println!("No follow-up questions right now."),
                None => println!("Pick a number from 1 to {}.", suggestions.len()),
            }
        }
        ReplCommand::CopyReply => match store.last_bot_text().await {
            Some(text) => copy_reply(&text),
            None => println!("There is no reply to copy yet."),
        },
        ReplCommand::Clear => {
            if store.clear(terminal::confirm).await? {
                println!("Chat history cleared.");
            }
        }
        ReplCommand::Persona(None) => {
            let current = store.persona().await;
            println!("Persona: {}", current.label());
            let names: Vec<_> = Persona::ALL.into_iter().map(Persona::as_str).collect();
            println!("Available: {}", names.join(", "));
        }
        ReplCommand::Persona(Some(persona)) => {
            store.set_persona(persona).await;
            println!("Persona: {}", persona.label());
        }
        ReplCommand::Voice(path) => voice_turn(common, store, path).await?,
        ReplCommand::Theme => {
            let theme = common
                .theme_settings()
                .toggle(common.system_prefers_dark())
                .await?;
            store.transcript().set_theme(theme);
            println!("Theme: {theme}");
        }
        ReplCommand::Invalid(reason) => println!("{reason}"),
    }
    Ok(())
}

/// Put the raw Markdown of a reply on the clipboard, or print it unrendered
/// when no clipboard is reachable (e.g. over SSH).
fn copy_reply(text: &str) {
    match terminal::copy_to_clipboard(text) {
        Ok(()) => println!("Copied the last reply to the clipboard."),
        Err(e) => {
            warn!("Clipboard unavailable: {e:#}");
            println!("No clipboard available; here is the raw reply:\n");
            println!("{text}");
        }
    }
}

/// Transcribe a clip and let the user send, edit or drop the text.
async fn voice_turn(
    common: &CommonComponents,
    store: &TerminalStore,
    path: PathBuf,
) -> anyhow::Result<()> {
    let clip = match AudioClip::from_file(&path).await {
        Ok(clip) => clip,
        Err(e) => {
            eprintln!("{e}");
            return Ok(());
        }
    };

    println!("Transcribing {}...", path.display());
    let voice = VoiceInput::new(common.client.clone());
    match voice.to_input_text(&clip).await {
        VoiceText::Transcribed(text) => {
            println!("Heard: {text}");
            print!("Press Enter to send, or type a replacement: ");
            std::io::stdout().flush()?;
            let Some(edited) = terminal::read_line()? else {
                return Ok(());
            };
            let message = if edited.trim().is_empty() {
                text
            } else {
                edited
            };
            report(store.send(&message).await?);
        }
        VoiceText::Fallback(notice) => println!("{notice}"),
    }
    Ok(())
}

fn report(outcome: SendOutcome) {
    match outcome {
        SendOutcome::Answered | SendOutcome::Rejected(Rejection::EmptyMessage) => {}
        SendOutcome::Rejected(Rejection::Busy) => {
            println!("Still waiting for the previous reply.");
        }
        SendOutcome::Rejected(Rejection::NothingToRetry) => println!("Nothing to retry yet."),
        SendOutcome::Rejected(Rejection::NoBotMessage) => {
            println!("There is no reply to work on yet.");
        }
        SendOutcome::RemoteFailure { status } => warn!("Backend answered with status {status}"),
        SendOutcome::TransportFailure => warn!("No response from the backend"),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /retry              ask the last question again");
    println!("  /clear              delete the saved conversation");
    println!("  /persona [name]     show or switch the persona");
    for action in QuickAction::ALL {
        println!("  /{:<18} rework the last reply", action.name());
    }
    println!("  /suggest <n>        send follow-up question n");
    println!("  /copy               copy the last reply as Markdown");
    println!("  /voice <file>       transcribe an audio file");
    println!("  /theme              toggle dark/light");
    println!("  exit | quit | q     leave");
}

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Empty,
    Exit,
    Help,
    Message(String),
    Retry,
    Clear,
    Persona(Option<Persona>),
    Action(QuickAction),
    Suggest(usize),
    CopyReply,
    Voice(PathBuf),
    Theme,
    Invalid(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if matches!(line, "exit" | "quit" | "q") {
            return Self::Exit;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Self::Message(line.to_string());
        };

        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, arg)| (name, arg.trim()));

        match name {
            "help" => Self::Help,
            "retry" => Self::Retry,
            "clear" => Self::Clear,
            "copy" => Self::CopyReply,
            "theme" => Self::Theme,
            "persona" if arg.is_empty() => Self::Persona(None),
            "persona" => arg
                .parse()
                .map_or_else(|e| Self::Invalid(format!("{e}")), |p| Self::Persona(Some(p))),
            "suggest" => arg
                .parse()
                .map_or_else(|_| Self::Invalid("Usage: /suggest <n>".to_string()), Self::Suggest),
            "voice" if arg.is_empty() => Self::Invalid("Usage: /voice <file>".to_string()),
            "voice" => Self::Voice(PathBuf::from(arg)),
            other => other.parse().map_or_else(
                |_| Self::Invalid(format!("Unknown command /{other}. Type /help.")),
                Self::Action,
            ),
        }
    }
}
