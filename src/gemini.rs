use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn generate(
        &self,
        model: &str,
        query: &str,
        system_instruction: &str,
    ) -> Result<ModelReply> {
        let request = build_request(system_instruction, vec![Content::user(query)]);
        self.post_generate(model, &request).await
    }

    // Purely local construction, like the vendor SDKs: no network happens
    // until the first send.
    pub fn start_chat(
        &self,
        model: impl Into<String>,
        system_instruction: impl Into<String>,
        history: Vec<Content>,
    ) -> ChatContext {
        ChatContext {
            client: self.clone(),
            model: model.into(),
            system_instruction: system_instruction.into(),
            history,
        }
    }

    async fn post_generate(&self, model: &str, request: &GenerateContentRequest) -> Result<ModelReply> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .context("failed to call gemini generateContent endpoint")?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "gemini generateContent returned {status}: {}",
                normalize_error_body(&body)
            );
        }

        response
            .json::<ModelReply>()
            .await
            .context("failed to decode gemini generateContent response")
    }
}

// Conversation context with provider-side semantics: it owns the accumulated
// turns, appends a user/model pair only after the provider accepted the call,
// and never edits or removes recorded turns.
pub struct ChatContext {
    client: GeminiClient,
    model: String,
    system_instruction: String,
    history: Vec<Content>,
}

impl ChatContext {
    pub async fn send(&mut self, message: &str) -> Result<ModelReply> {
        let user_turn = Content::user(message);
        let mut contents = self.history.clone();
        contents.push(user_turn.clone());

        let request = build_request(&self.system_instruction, contents);
        let reply = self.client.post_generate(&self.model, &request).await?;

        self.history.push(user_turn);
        self.history.push(Content::model(reply.text().unwrap_or_default()));
        Ok(reply)
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    tools: Vec<Tool>,
}

#[derive(Serialize, Default)]
struct Tool {
    google_search: GoogleSearchConfig,
}

#[derive(Serialize, Default)]
struct GoogleSearchConfig {}

fn build_request(system_instruction: &str, contents: Vec<Content>) -> GenerateContentRequest {
    GenerateContentRequest {
        contents,
        system_instruction: Some(Content {
            role: "system".to_string(),
            parts: vec![Part {
                text: system_instruction.to_string(),
            }],
        }),
        tools: vec![Tool::default()],
    }
}

// Reply shapes are provider-controlled and not contractually guaranteed, so
// every level deserializes as optional and unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelReply {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    pub content: Option<ReplyContent>,
    #[serde(rename = "groundingMetadata")]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyContent {
    #[serde(default)]
    pub parts: Vec<ReplyPart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyPart {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingMetadata {
    #[serde(default, rename = "groundingChunks")]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

impl ModelReply {
    // Text lives in the first candidate; an all-empty concatenation counts
    // as no text at all.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn normalize_error_body(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorWrapper {
        error: ErrorBody,
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        status: Option<String>,
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    if let Ok(wrapper) = serde_json::from_str::<ErrorWrapper>(trimmed) {
        let status = wrapper.error.status.unwrap_or_default();
        let message = wrapper
            .error
            .message
            .unwrap_or_else(|| trimmed.to_string());
        return if status.is_empty() {
            message
        } else {
            format!("{status}: {message}")
        };
    }

    trimmed.to_string()
}
