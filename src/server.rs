use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::assistant::{AssistantService, ChatSession};
use crate::config::AppConfig;
use crate::gemini::GeminiClient;
use crate::models::{
    AssistantResponse, CreateSessionRequest, HealthResponse, Language, QueryRequest,
    SendMessageRequest, SessionCreated, SessionInfo, SessionMode,
};

#[derive(Clone)]
struct SessionEntry {
    session: Arc<tokio::sync::Mutex<ChatSession>>,
    language: Language,
    mode: SessionMode,
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
struct AppState {
    config: AppConfig,
    client: GeminiClient,
    assistant: AssistantService,
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
}

pub async fn run_server(
    config: AppConfig,
    client: GeminiClient,
    assistant: AssistantService,
) -> Result<()> {
    let state = AppState {
        config: config.clone(),
        client,
        assistant,
        sessions: Arc::new(Mutex::new(HashMap::new())),
    };

    let app = router(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/assistant/query", post(answer_query))
        .route("/api/sessions", post(create_session))
        .route(
            "/api/sessions/:session_id",
            get(get_session).delete(delete_session),
        )
        .route("/api/sessions/:session_id/messages", post(send_message))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Infallible by construction: credential and provider failures already
// collapsed into fixed fallback texts inside the service.
async fn answer_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Json<AssistantResponse> {
    let response = state
        .assistant
        .answer(&request.query, request.language)
        .await;
    Json(response)
}

async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<SessionCreated>, ApiError> {
    let session = ChatSession::new(
        &state.config,
        &state.client,
        request.language,
        request.history,
    );
    let mode = if session.is_live() {
        SessionMode::Live
    } else {
        SessionMode::Demo
    };

    let session_id = Uuid::new_v4();
    let entry = SessionEntry {
        session: Arc::new(tokio::sync::Mutex::new(session)),
        language: request.language,
        mode,
        created_at: Utc::now(),
    };

    state
        .sessions
        .lock()
        .map_err(|_| ApiError::from(anyhow::anyhow!("lock poisoned")))?
        .insert(session_id, entry);

    Ok(Json(SessionCreated { session_id }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionInfo>, ApiError> {
    let entry = state
        .sessions
        .lock()
        .map_err(|_| ApiError::from(anyhow::anyhow!("lock poisoned")))?
        .get(&session_id)
        .cloned();

    match entry {
        Some(entry) => Ok(Json(SessionInfo {
            session_id,
            language: entry.language,
            mode: entry.mode,
            created_at: entry.created_at,
        })),
        None => Err(ApiError::not_found(format!(
            "session not found: {}",
            session_id
        ))),
    }
}

async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<AssistantResponse>, ApiError> {
    // Clone the handle out so the registry lock is never held across await.
    let session = {
        let sessions = state
            .sessions
            .lock()
            .map_err(|_| ApiError::from(anyhow::anyhow!("lock poisoned")))?;
        sessions
            .get(&session_id)
            .map(|entry| entry.session.clone())
    };

    let Some(session) = session else {
        return Err(ApiError::not_found(format!(
            "session not found: {}",
            session_id
        )));
    };

    // Holding the session lock across the provider call keeps concurrent
    // messages to one session strictly ordered.
    let mut session = session.lock().await;
    Ok(Json(session.send_message(&request.message).await))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .sessions
        .lock()
        .map_err(|_| ApiError::from(anyhow::anyhow!("lock poisoned")))?
        .remove(&session_id);

    match removed {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::not_found(format!(
            "session not found: {}",
            session_id
        ))),
    }
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let active_sessions = state
        .sessions
        .lock()
        .map_err(|_| ApiError::from(anyhow::anyhow!("lock poisoned")))?
        .len();

    let mode = if state.config.credentials_available() {
        SessionMode::Live
    } else {
        SessionMode::Demo
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        mode,
        active_sessions,
    }))
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: value.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}
