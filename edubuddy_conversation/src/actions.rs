//! Canned follow-ups that rework the latest bot reply.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Summarize,
    Simplify,
    Elaborate,
    Examples,
}

impl QuickAction {
    pub const ALL: [Self; 4] = [
        Self::Summarize,
        Self::Simplify,
        Self::Elaborate,
        Self::Examples,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Simplify => "simplify",
            Self::Elaborate => "elaborate",
            Self::Examples => "examples",
        }
    }

    /// The message sent for this action, quoting the reply it works on.
    #[must_use]
    pub fn prompt(self, bot_text: &str) -> String {
        match self {
            Self::Summarize => format!("Please summarize this concisely: \"{bot_text}\""),
            Self::Simplify => {
                format!("Please explain this in simpler terms for a beginner: \"{bot_text}\"")
            }
            Self::Elaborate => format!("Please elaborate more on this topic: \"{bot_text}\""),
            Self::Examples => {
                format!("Please provide practical examples related to: \"{bot_text}\"")
            }
        }
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QuickAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown action '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_quote_the_reply() {
        assert_eq!(
            QuickAction::Summarize.prompt("A limit is..."),
            "Please summarize this concisely: \"A limit is...\""
        );
        assert_eq!(
            QuickAction::Examples.prompt("x"),
            "Please provide practical examples related to: \"x\""
        );
    }

    #[test]
    fn parses_action_names() {
        assert_eq!(
            "Simplify".parse::<QuickAction>().unwrap(),
            QuickAction::Simplify
        );
        assert!("explain".parse::<QuickAction>().is_err());
    }
}
