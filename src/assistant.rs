use crate::citations::extract_sources;
use crate::config::AppConfig;
use crate::gemini::{ChatContext, Content, GeminiClient};
use crate::instructions;
use crate::models::{AssistantResponse, ChatMessage, Language, Role};

// Fixed user-safe texts. Provider errors never reach callers verbatim; every
// failure path resolves to one of these, matched to the request language.
const DEMO_QUERY_EN: &str =
    "Demo Mode: API Key not configured. (Simulated Response) According to UAE Labour Law...";
const DEMO_QUERY_AR: &str =
    "وضع تجريبي: مفتاح API غير مكون. (رد محاكى) وفقاً لقانون العمل الإماراتي...";

const NO_RESPONSE_EN: &str = "No response generated.";
const NO_RESPONSE_AR: &str = "لم يتم إنشاء استجابة.";

const UNAVAILABLE_EN: &str = "Service temporarily unavailable. Please try again later.";
const UNAVAILABLE_AR: &str = "الخدمة غير متوفرة حالياً. يرجى المحاولة مرة أخرى لاحقاً.";

const DEMO_CHAT_EN: &str =
    "Demo Mode: API Key not configured. I cannot process real-time requests without an API key.";
const DEMO_CHAT_AR: &str =
    "الوضع التجريبي: مفتاح API غير مكون. لا يمكنني معالجة الطلبات في الوقت الفعلي بدون مفتاح.";

const CHAT_FAILURE_EN: &str =
    "I apologize, but I am encountering technical difficulties at the moment.";
const CHAT_FAILURE_AR: &str = "أعتذر، ولكنني أواجه صعوبات فنية في الوقت الحالي.";

fn by_language(language: Language, en: &'static str, ar: &'static str) -> &'static str {
    match language {
        Language::En => en,
        Language::Ar => ar,
    }
}

#[derive(Clone)]
pub struct AssistantService {
    config: AppConfig,
    client: GeminiClient,
}

impl AssistantService {
    pub fn new(config: AppConfig, client: GeminiClient) -> Self {
        Self { config, client }
    }

    // Empty queries are forwarded untouched; the provider decides what to do
    // with them.
    pub async fn answer(&self, query: &str, language: Language) -> AssistantResponse {
        if !self.config.credentials_available() {
            return AssistantResponse {
                text: by_language(language, DEMO_QUERY_EN, DEMO_QUERY_AR).to_string(),
                sources: Vec::new(),
            };
        }

        let instruction = instructions::query_instruction(language);
        match self
            .client
            .generate(&self.config.models.query_model, query, &instruction)
            .await
        {
            Ok(reply) => AssistantResponse {
                text: reply.text().unwrap_or_else(|| {
                    by_language(language, NO_RESPONSE_EN, NO_RESPONSE_AR).to_string()
                }),
                sources: extract_sources(&reply),
            },
            Err(err) => {
                tracing::error!("assistant query ({}) failed: {:#}", language.as_str(), err);
                AssistantResponse {
                    text: by_language(language, UNAVAILABLE_EN, UNAVAILABLE_AR).to_string(),
                    sources: Vec::new(),
                }
            }
        }
    }
}

// A session is either live (provider context held) or in demo mode (no
// credential at construction), and never moves between the two afterwards.
pub struct ChatSession {
    language: Language,
    context: Option<ChatContext>,
}

impl ChatSession {
    pub fn new(
        config: &AppConfig,
        client: &GeminiClient,
        language: Language,
        history: Vec<ChatMessage>,
    ) -> Self {
        if !config.credentials_available() {
            return Self {
                language,
                context: None,
            };
        }

        let instruction = instructions::chat_instruction(language);
        let initial = history.into_iter().map(to_provider_turn).collect();
        let context = client.start_chat(config.models.chat_model.clone(), instruction, initial);

        Self {
            language,
            context: Some(context),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_live(&self) -> bool {
        self.context.is_some()
    }

    pub async fn send_message(&mut self, message: &str) -> AssistantResponse {
        let Some(context) = self.context.as_mut() else {
            return AssistantResponse {
                text: by_language(self.language, DEMO_CHAT_EN, DEMO_CHAT_AR).to_string(),
                sources: Vec::new(),
            };
        };

        match context.send(message).await {
            Ok(reply) => AssistantResponse {
                text: reply.text().unwrap_or_default(),
                sources: extract_sources(&reply),
            },
            Err(err) => {
                tracing::error!("chat turn ({}) failed: {:#}", self.language.as_str(), err);
                AssistantResponse {
                    text: by_language(self.language, CHAT_FAILURE_EN, CHAT_FAILURE_AR).to_string(),
                    sources: Vec::new(),
                }
            }
        }
    }
}

fn to_provider_turn(message: ChatMessage) -> Content {
    match message.role {
        Role::User => Content::user(message.text),
        Role::Model => Content::model(message.text),
    }
}
