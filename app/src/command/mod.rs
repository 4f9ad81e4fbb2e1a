//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own type and input, dispatched
//! statically from `main`.

use std::sync::Arc;

use edubuddy_config::Config;
use edubuddy_providers::EduBuddyClient;
use edubuddy_storage::{JsonFileStore, Theme, ThemeSettings, theme::system_prefers_dark};
use tracing::info;

mod chat;
mod history;
mod info;
mod init;
mod status;
mod theme;
mod transcribe;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use history::{HistoryInput, HistoryStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use status::StatusStrategy;
pub use theme::{ThemeAction, ThemeStrategy};
pub use transcribe::{TranscribeInput, TranscribeStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// # Example
/// ```rust,ignore
/// struct MyStrategy;
///
/// impl CommandStrategy for MyStrategy {
///     type Input = MyInput;
///
///     async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
///         // Command logic here
///         Ok(())
///     }
/// }
/// ```
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Pieces shared by every command that talks to the backend or local storage.
struct CommonComponents {
    config: Config,
    client: Arc<EduBuddyClient>,
    storage: Arc<JsonFileStore>,
}

impl CommonComponents {
    fn theme_settings(&self) -> ThemeSettings<Arc<JsonFileStore>> {
        ThemeSettings::new(self.storage.clone())
    }

    /// System preference: the terminal's `COLORFGBG`, else the config default.
    fn system_prefers_dark(&self) -> bool {
        let colorfgbg = std::env::var("COLORFGBG").ok();
        system_prefers_dark(colorfgbg.as_deref(), self.config.theme.system_prefers_dark)
    }

    async fn resolve_theme(&self) -> anyhow::Result<Theme> {
        self.theme_settings()
            .initialize(self.system_prefers_dark())
            .await
    }
}

fn init_common_components() -> anyhow::Result<CommonComponents> {
    let config = Config::load()?;

    let storage_path = config.storage_path()?;
    info!("Storage path: {}", storage_path.display());
    let storage = Arc::new(JsonFileStore::new(storage_path));

    let client = Arc::new(
        EduBuddyClient::new(config.server.base_url.clone())
            .with_status_retry_delays(config.server.status_retry_delays.clone()),
    );

    Ok(CommonComponents {
        config,
        client,
        storage,
    })
}
