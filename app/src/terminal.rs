//! Terminal rendering of the conversation.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use copypasta::{ClipboardContext, ClipboardProvider};
use edubuddy_core::{Message, Sender, Transcript};
use edubuddy_storage::Theme;
use termimad::MadSkin;

/// Prints the transcript to stdout, rendering bot replies as Markdown.
pub struct TerminalTranscript {
    dark: AtomicBool,
    muted: AtomicBool,
}

impl TerminalTranscript {
    pub const fn new(theme: Theme) -> Self {
        Self {
            dark: AtomicBool::new(theme.is_dark()),
            muted: AtomicBool::new(false),
        }
    }

    pub fn set_theme(&self, theme: Theme) {
        self.dark.store(theme.is_dark(), Ordering::Relaxed);
    }

    /// Suppress output, e.g. while restoring history in one-shot mode.
    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    fn skin(&self) -> MadSkin {
        if self.dark.load(Ordering::Relaxed) {
            MadSkin::default_dark()
        } else {
            MadSkin::default_light()
        }
    }

    pub fn print_markdown(&self, text: &str) {
        self.skin().print_text(text);
    }
}

impl Transcript for TerminalTranscript {
    fn render_message(&self, message: &Message) {
        if self.is_muted() {
            return;
        }
        match message.sender {
            Sender::User => println!("\nYou: {}", message.text),
            Sender::Bot => {
                println!("\nEduBuddy:");
                self.print_markdown(&message.text);
            }
        }
    }

    fn retract_last(&self) {
        if !self.is_muted() {
            println!("(previous reply discarded, asking again)");
        }
    }

    fn show_suggestions(&self, suggestions: &[String]) {
        if self.is_muted() {
            return;
        }
        println!("\nFollow-up Questions ({})", suggestions.len());
        for (i, suggestion) in suggestions.iter().enumerate() {
            println!("  {}. {suggestion}", i + 1);
        }
        println!("  (send one with /suggest <n>)");
    }

    fn hide_suggestions(&self) {}

    fn set_pending(&self, pending: bool) {
        if self.is_muted() {
            return;
        }
        if pending {
            print!("EduBuddy is typing...");
        } else {
            print!("\r\x1b[2K");
        }
        let _ = io::stdout().flush();
    }

    fn clear(&self) {
        if !self.is_muted() {
            print!("\x1b[2J\x1b[H");
            let _ = io::stdout().flush();
        }
    }
}

/// Read one line from stdin, without the trailing newline.
///
/// Returns `None` at end of input.
pub fn read_line() -> io::Result<Option<String>> {
    let mut input = String::new();
    let read = io::stdin().lock().read_line(&mut input)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
}

/// Ask a yes/no question; anything but "y"/"yes" is a no.
pub fn confirm(question: &str) -> bool {
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    matches!(
        read_line().ok().flatten().map(|answer| answer.trim().to_ascii_lowercase()),
        Some(answer) if answer == "y" || answer == "yes"
    )
}

/// Place `text` on the system clipboard.
pub fn copy_to_clipboard(text: &str) -> anyhow::Result<()> {
    let mut clipboard =
        ClipboardContext::new().map_err(|e| anyhow::anyhow!("no clipboard: {e}"))?;
    clipboard
        .set_contents(text.to_string())
        .map_err(|e| anyhow::anyhow!("clipboard write failed: {e}"))
}
