use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use edubuddy_core::Persona;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_base_url")]
    pub base_url: String,
    /// Seconds between `/api_status` attempts.
    #[serde(default = "ServerConfig::default_status_retry_delays")]
    pub status_retry_delays: Vec<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            status_retry_delays: Self::default_status_retry_delays(),
        }
    }
}

impl ServerConfig {
    fn default_base_url() -> String {
        "http://localhost:5000".to_string()
    }

    fn default_status_retry_delays() -> Vec<u64> {
        vec![1, 2]
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ChatConfig {
    #[serde(default)]
    pub default_persona: Persona,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StorageConfig {
    /// Defaults to `~/edubuddy/storage.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ThemeConfig {
    /// Used when the terminal does not report its background.
    #[serde(default = "ThemeConfig::default_system_prefers_dark")]
    pub system_prefers_dark: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            system_prefers_dark: Self::default_system_prefers_dark(),
        }
    }
}

impl ThemeConfig {
    const fn default_system_prefers_dark() -> bool {
        true
    }
}

const CONFIG_TEMPLATE: &str = r#"{
  "server": {
    "base_url": "http://localhost:5000",
    "status_retry_delays": [1, 2]
  },
  "chat": {
    "default_persona": "general"
  },
  "theme": {
    "system_prefers_dark": true
  }
}"#;

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("edubuddy"))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'edubuddy init' to create config.",
                config_path.display()
            );
        }

        let config = Self::load_from(&config_path)?;
        info!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Where the conversation and theme are persisted.
    pub fn storage_path(&self) -> anyhow::Result<PathBuf> {
        match &self.storage.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("storage.json")),
        }
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Point server.base_url at your EduBuddy backend");
        println!("   2. Run 'edubuddy status' to check which APIs are configured");
        println!("   3. Run 'edubuddy chat' to start a conversation");
        println!();
        println!("🔧 Configuration options:");
        println!("   - default_persona: stem, coding, business, general or language");
        println!("   - storage.path: where history and theme are kept (default ~/edubuddy/storage.json)");
        println!();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_to_defaults() {
        let config: Config = serde_json::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.server.base_url, "http://localhost:5000");
        assert_eq!(config.server.status_retry_delays, vec![1, 2]);
        assert_eq!(config.chat.default_persona, Persona::General);
        assert!(config.storage.path.is_none());
        assert!(config.theme.system_prefers_dark);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"chat": {"default_persona": "coding"}}"#).unwrap();
        assert_eq!(config.chat.default_persona, Persona::Coding);
        assert_eq!(config.server.base_url, "http://localhost:5000");
    }

    #[test]
    fn explicit_storage_path_wins() {
        let config: Config =
            serde_json::from_str(r#"{"storage": {"path": "/tmp/edubuddy.json"}}"#).unwrap();
        assert_eq!(
            config.storage_path().unwrap(),
            PathBuf::from("/tmp/edubuddy.json")
        );
    }
}
