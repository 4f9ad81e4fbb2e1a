use super::init_common_components;

/// Strategy for reporting which backend APIs are configured.
///
/// `/api_status` is retried with backoff; if it never answers, both APIs
/// are reported as not configured.
#[derive(Debug, Clone, Copy)]
pub struct StatusStrategy;

impl super::CommandStrategy for StatusStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components()?;
        let status = common.client.api_status().await;

        println!("Backend: {}", common.client.base_url());
        println!("  Gemini: {}", configured(status.gemini_configured));
        println!("  Whisper: {}", configured(status.whisper_configured));

        for warning in status.warnings() {
            eprintln!("⚠️  {warning}");
        }
        Ok(())
    }
}

const fn configured(flag: bool) -> &'static str {
    if flag { "configured" } else { "not configured" }
}
