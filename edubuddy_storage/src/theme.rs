//! Light/dark theme preference.
//!
//! A saved preference always wins. Without one, the system preference is
//! applied and saved on first initialization.

use std::fmt;

use edubuddy_core::{KeyValueStore, THEME_KEY};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parse a stored value. Anything but `"dark"`/`"light"` is no preference.
    #[must_use]
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    #[must_use]
    pub const fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the terminal reports a dark background.
///
/// Reads the `COLORFGBG` convention (`"fg;bg"` or `"fg;default;bg"`): ANSI
/// background 0-6 and 8 are dark. Falls back when the value is absent or
/// unreadable.
#[must_use]
pub fn system_prefers_dark(colorfgbg: Option<&str>, fallback: bool) -> bool {
    colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .map_or(fallback, |bg| bg <= 6 || bg == 8)
}

pub struct ThemeSettings<K> {
    store: K,
}

impl<K: KeyValueStore> ThemeSettings<K> {
    pub const fn new(store: K) -> Self {
        Self { store }
    }

    pub async fn saved(&self) -> anyhow::Result<Option<Theme>> {
        Ok(self
            .store
            .get(THEME_KEY)
            .await?
            .as_deref()
            .and_then(Theme::from_stored))
    }

    /// Resolve the theme for this run, saving the system preference when
    /// nothing was saved yet.
    pub async fn initialize(&self, system_prefers_dark: bool) -> anyhow::Result<Theme> {
        if let Some(theme) = self.saved().await? {
            debug!("Using saved theme: {theme}");
            return Ok(theme);
        }

        let theme = Theme::from_prefers_dark(system_prefers_dark);
        self.set(theme).await?;
        Ok(theme)
    }

    pub async fn set(&self, theme: Theme) -> anyhow::Result<()> {
        self.store.set(THEME_KEY, theme.as_str()).await?;
        info!("Theme set to {theme}");
        Ok(())
    }

    pub async fn toggle(&self, system_prefers_dark: bool) -> anyhow::Result<Theme> {
        let current = self
            .saved()
            .await?
            .unwrap_or_else(|| Theme::from_prefers_dark(system_prefers_dark));
        let next = current.toggled();
        self.set(next).await?;
        Ok(next)
    }
}
