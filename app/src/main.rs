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

mod command;
mod terminal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use command::{
    ChatInput, ChatStrategy, CommandStrategy, HistoryInput, HistoryStrategy, InfoStrategy,
    InitStrategy, StatusStrategy, ThemeAction, ThemeStrategy, TranscribeInput, TranscribeStrategy,
    VersionStrategy,
};
use edubuddy_core::Persona;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "edubuddy")]
#[command(about = "EduBuddy learning assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with EduBuddy, resuming the saved conversation
    Chat {
        /// Single message to send
        #[arg(short = 'm', long)]
        message: Option<String>,

        /// Persona: stem, coding, business, general or language
        #[arg(short = 'p', long)]
        persona: Option<Persona>,
    },
    /// Show or clear the saved conversation
    History {
        /// Delete the saved conversation
        #[arg(long)]
        clear: bool,

        /// Do not ask for confirmation
        #[arg(short = 'y', long, requires = "clear")]
        yes: bool,
    },
    /// Check which backend APIs are configured
    Status,
    /// Transcribe an audio file to text
    Transcribe {
        /// Audio file (webm, wav, mp3, ogg, m4a)
        file: PathBuf,
    },
    /// Show or change the light/dark theme
    Theme {
        #[arg(value_enum, default_value = "show")]
        action: ThemeAction,
    },
    /// Initialize configuration
    Init,
    /// Show configuration
    Info,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the transcript.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { message, persona } => {
            ChatStrategy
                .execute(ChatInput { message, persona })
                .await
        }
        Commands::History { clear, yes } => {
            HistoryStrategy.execute(HistoryInput { clear, yes }).await
        }
        Commands::Status => StatusStrategy.execute(()).await,
        Commands::Transcribe { file } => {
            TranscribeStrategy.execute(TranscribeInput { file }).await
        }
        Commands::Theme { action } => ThemeStrategy.execute(action).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn chat_accepts_persona_case_insensitively() {
        let cli = Cli::try_parse_from(["edubuddy", "chat", "-p", "STEM", "-m", "hi"]).unwrap();
        match cli.command {
            Commands::Chat { message, persona } => {
                assert_eq!(message.as_deref(), Some("hi"));
                assert_eq!(persona, Some(Persona::Stem));
            }
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn theme_defaults_to_show() {
        let cli = Cli::try_parse_from(["edubuddy", "theme"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Theme {
                action: ThemeAction::Show
            }
        ));
    }

    #[test]
    fn yes_requires_clear() {
        assert!(Cli::try_parse_from(["edubuddy", "history", "--yes"]).is_err());
    }
}
