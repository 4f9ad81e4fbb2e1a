use edubuddy_config::Config;

use super::init_common_components;

/// Strategy for displaying configuration information.
///
/// Prints the backend URL, storage location, chat defaults and the theme
/// that would be applied right now.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components()?;
        let config = &common.config;

        println!("=== EduBuddy Configuration ===\n");

        println!("Config Dir: {}", Config::config_dir()?.display());
        println!();

        println!("Server:");
        println!("  Base URL: {}", common.client.base_url());
        println!(
            "  Status Retry Delays: {}",
            format_delays(&config.server.status_retry_delays)
        );
        println!();

        println!("Chat:");
        println!("  Default Persona: {}", config.chat.default_persona.label());
        println!();

        println!("Storage:");
        println!("  Path: {}", config.storage_path()?.display());
        println!();

        println!("Theme:");
        let system_dark = common.system_prefers_dark();
        println!(
            "  System Preference: {}",
            if system_dark { "dark" } else { "light" }
        );
        match common.theme_settings().saved().await? {
            Some(theme) => println!("  Saved Preference: {theme}"),
            None => println!("  Saved Preference: (none - following system)"),
        }

        Ok(())
    }
}

fn format_delays(delays: &[u64]) -> String {
    if delays.is_empty() {
        return "(no retries)".to_string();
    }
    delays
        .iter()
        .map(|d| format!("{d}s"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::format_delays;

    #[test]
    fn delays_are_listed_in_seconds() {
        assert_eq!(format_delays(&[1, 2]), "1s, 2s");
        assert_eq!(format_delays(&[]), "(no retries)");
    }
}
