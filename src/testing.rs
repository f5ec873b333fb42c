// Shared test fixtures: a local stand-in for the Gemini REST endpoint that
// records every request body and serves one canned reply.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::config::{AppConfig, ModelConfig};
use crate::gemini::GeminiClient;

pub struct ProviderFixture {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<Value>>>,
}

#[derive(Clone)]
struct FixtureState {
    status: StatusCode,
    reply: Value,
    requests: Arc<Mutex<Vec<Value>>>,
}

pub async fn provider_fixture(status: u16, reply: Value) -> ProviderFixture {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = FixtureState {
        status: StatusCode::from_u16(status).expect("valid status code"),
        reply,
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/:call", post(record_and_reply))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture listener");
    let addr = listener.local_addr().expect("fixture listener addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    ProviderFixture {
        base_url: format!("http://{addr}"),
        requests,
    }
}

async fn record_and_reply(
    State(state): State<FixtureState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().expect("fixture lock").push(body);
    (state.status, Json(state.reply.clone()))
}

pub fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [{ "text": text }] } }
        ]
    })
}

/// Reply carrying grounding metadata; `sources` is (title, uri) pairs.
pub fn grounded_reply(text: &str, sources: &[(&str, &str)]) -> Value {
    let chunks: Vec<Value> = sources
        .iter()
        .map(|(title, uri)| json!({ "web": { "uri": uri, "title": title } }))
        .collect();
    json!({
        "candidates": [
            {
                "content": { "role": "model", "parts": [{ "text": text }] },
                "groundingMetadata": { "groundingChunks": chunks }
            }
        ]
    })
}

pub fn gemini_error(status: &str, message: &str) -> Value {
    let code = match status {
        "INVALID_ARGUMENT" => 400,
        "UNAUTHENTICATED" => 401,
        "PERMISSION_DENIED" => 403,
        "UNAVAILABLE" => 503,
        _ => 500,
    };
    json!({ "error": { "code": code, "message": message, "status": status } })
}

pub fn test_config(base_url: &str, api_key: Option<&str>) -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        gemini_base_url: base_url.to_string(),
        api_key: api_key.map(str::to_string),
        models: ModelConfig {
            query_model: "gemini-2.5-flash".to_string(),
            chat_model: "gemini-3-pro-preview".to_string(),
        },
    }
}

pub fn fixture_client(fixture: &ProviderFixture) -> GeminiClient {
    GeminiClient::new(fixture.base_url.clone(), "test-key")
}

/// Client for demo-mode tests; the address never accepts a connection, which
/// is fine because no request may be made without a credential.
pub fn offline_client() -> GeminiClient {
    GeminiClient::new("http://127.0.0.1:9", "")
}
