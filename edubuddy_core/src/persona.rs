//! Subject personas the backend can answer as.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Stem,
    Coding,
    Business,
    #[default]
    General,
    Language,
}

#[derive(Debug, Error)]
#[error("unknown persona '{0}' (expected one of: stem, coding, business, general, language)")]
pub struct ParsePersonaError(String);

impl Persona {
    pub const ALL: [Self; 5] = [
        Self::Stem,
        Self::Coding,
        Self::Business,
        Self::General,
        Self::Language,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stem => "stem",
            Self::Coding => "coding",
            Self::Business => "business",
            Self::General => "general",
            Self::Language => "language",
        }
    }

    /// Human readable label for menus.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stem => "STEM",
            Self::Coding => "Coding",
            Self::Business => "Business",
            Self::General => "General learning",
            Self::Language => "Language & humanities",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = ParsePersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| ParsePersonaError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("STEM".parse::<Persona>().unwrap(), Persona::Stem);
        assert_eq!(" coding ".parse::<Persona>().unwrap(), Persona::Coding);
    }

    #[test]
    fn rejects_unknown_persona() {
        let err = "pirate".parse::<Persona>().unwrap_err();
        assert!(err.to_string().contains("pirate"));
    }

    #[test]
    fn serializes_as_wire_string() {
        assert_eq!(
            serde_json::to_string(&Persona::Language).unwrap(),
            "\"language\""
        );
        assert_eq!(Persona::default(), Persona::General);
    }
}
