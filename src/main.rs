use anyhow::Result;
use tracing_subscriber::EnvFilter;

use lexcora::assistant::AssistantService;
use lexcora::gemini::GeminiClient;
use lexcora::{run_server, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    if !config.credentials_available() {
        tracing::warn!("no API key configured; serving demo-mode responses only");
    }

    let client = GeminiClient::new(
        config.gemini_base_url.clone(),
        config.api_key.clone().unwrap_or_default(),
    );
    let assistant = AssistantService::new(config.clone(), client.clone());

    run_server(config, client, assistant).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
