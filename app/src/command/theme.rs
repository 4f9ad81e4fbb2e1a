use clap::ValueEnum;
use edubuddy_storage::Theme;

use super::init_common_components;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    /// Print the theme in effect
    Show,
    Dark,
    Light,
    /// Flip between dark and light
    Toggle,
}

/// Strategy for reading and changing the saved theme preference.
#[derive(Debug, Clone, Copy)]
pub struct ThemeStrategy;

impl super::CommandStrategy for ThemeStrategy {
    type Input = ThemeAction;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components()?;
        let settings = common.theme_settings();

        let theme = match input {
            ThemeAction::Show => common.resolve_theme().await?,
            ThemeAction::Dark => {
                settings.set(Theme::Dark).await?;
                Theme::Dark
            }
            ThemeAction::Light => {
                settings.set(Theme::Light).await?;
                Theme::Light
            }
            ThemeAction::Toggle => settings.toggle(common.system_prefers_dark()).await?,
        };

        println!("Theme: {theme}");
        Ok(())
    }
}
