use std::env;

pub const DEFAULT_GEMINI_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub query_model: String,
    pub chat_model: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub gemini_base_url: String,
    pub api_key: Option<String>,
    pub models: ModelConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("LEXCORA_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            api_key: read_api_key(),
            models: ModelConfig {
                query_model: env::var("LEXCORA_QUERY_MODEL")
                    .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
                chat_model: env::var("LEXCORA_CHAT_MODEL")
                    .unwrap_or_else(|_| "gemini-3-pro-preview".to_string()),
            },
        }
    }

    // Evaluated once at startup and injected; services never re-read the
    // environment mid-flight.
    pub fn credentials_available(&self) -> bool {
        self.api_key.is_some()
    }
}

fn read_api_key() -> Option<String> {
    env::var("GEMINI_API_KEY")
        .or_else(|_| env::var("API_KEY"))
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}
