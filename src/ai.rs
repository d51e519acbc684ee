//! AI gateway over an OpenAI-compatible chat-completion endpoint.
//!
//! Each call is a single request/response round trip: no retry, no
//! streaming, no context-window management. Provider failures are logged and
//! collapsed into a generic error; key-point extraction degrades to an empty
//! list instead of failing.

use crate::config::AiConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub const PERSONA: &str = "You are a helpful AI assistant for a note-taking app called NodeArc. \
Help users organize their thoughts, generate insights, and answer questions about their notes.";
pub const SUMMARY_INSTRUCTION: &str = "Summarize the following text in a concise and clear manner.";
pub const KEY_POINTS_INSTRUCTION: &str =
    "Extract 3-5 key points from the following text. Return them as a JSON array of strings.";

pub const NO_RESPONSE: &str = "No response generated";
pub const NO_SUMMARY: &str = "No summary generated";
pub const ASK_FAILED: &str = "Failed to get AI response";
pub const SUMMARY_FAILED: &str = "Failed to generate summary";

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum AiError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The only variant callers show to users.
    #[error("{0}")]
    Failed(&'static str),
}

impl AiError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AiError::Failed(msg) => *msg,
            _ => ASK_FAILED,
        }
    }
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A finished message list: one system message, at most one context
/// message, and the user prompt last.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn system(persona: impl Into<String>) -> SystemStage {
        SystemStage {
            messages: vec![ChatMessage::new(ChatRole::System, persona)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }
}

/// System prompt set; context or the user prompt may follow.
#[derive(Debug)]
pub struct SystemStage {
    messages: Vec<ChatMessage>,
}

impl SystemStage {
    pub fn context(mut self, context: &str) -> ContextStage {
        self.messages.push(ChatMessage::new(
            ChatRole::System,
            format!("Context from user's notes: {}", context),
        ));
        ContextStage {
            messages: self.messages,
        }
    }

    pub fn user(mut self, prompt: impl Into<String>) -> Conversation {
        self.messages.push(ChatMessage::new(ChatRole::User, prompt));
        Conversation {
            messages: self.messages,
        }
    }
}

/// Context injected; only the user prompt may follow.
#[derive(Debug)]
pub struct ContextStage {
    messages: Vec<ChatMessage>,
}

impl ContextStage {
    pub fn user(mut self, prompt: impl Into<String>) -> Conversation {
        self.messages.push(ChatMessage::new(ChatRole::User, prompt));
        Conversation {
            messages: self.messages,
        }
    }
}

// ============================================================================
// Completion Client
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Anything that can turn a request into the first choice's content.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, AiError>;
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingApiKey)?;

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status { status, body });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

// ============================================================================
// Gateway
// ============================================================================

#[derive(Clone)]
pub struct AiGateway {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl AiGateway {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(Arc::new(OpenAiClient::new(config)), config.model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, conversation: Conversation, temperature: f32, max_tokens: u32) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: conversation.into_messages(),
            temperature,
            max_tokens,
        }
    }

    /// Answer `prompt`, optionally grounded in note text. Empty context is
    /// treated as absent.
    pub async fn ask_ai(&self, prompt: &str, context: Option<&str>) -> Result<String, AiError> {
        let conversation = match context.filter(|c| !c.is_empty()) {
            Some(ctx) => Conversation::system(PERSONA).context(ctx).user(prompt),
            None => Conversation::system(PERSONA).user(prompt),
        };
        let request = self.request(conversation, 0.7, 1000);

        match self.client.complete(&request).await {
            Ok(content) => Ok(non_empty_or(content, NO_RESPONSE)),
            Err(e) => {
                tracing::error!(error = %e, model = %self.model, "AI request failed");
                Err(AiError::Failed(ASK_FAILED))
            }
        }
    }

    pub async fn generate_summary(&self, text: &str) -> Result<String, AiError> {
        let conversation = Conversation::system(SUMMARY_INSTRUCTION).user(text);
        let request = self.request(conversation, 0.5, 500);

        match self.client.complete(&request).await {
            Ok(content) => Ok(non_empty_or(content, NO_SUMMARY)),
            Err(e) => {
                tracing::error!(error = %e, model = %self.model, "summary request failed");
                Err(AiError::Failed(SUMMARY_FAILED))
            }
        }
    }

    /// Never fails: provider errors and unparsable output both yield an
    /// empty list.
    pub async fn extract_key_points(&self, text: &str) -> Vec<String> {
        let conversation = Conversation::system(KEY_POINTS_INSTRUCTION).user(text);
        let request = self.request(conversation, 0.3, 300);

        let content = match self.client.complete(&request).await {
            Ok(content) => non_empty_or(content, "[]"),
            Err(e) => {
                tracing::error!(error = %e, model = %self.model, "key points request failed");
                return Vec::new();
            }
        };

        parse_key_points(&content).unwrap_or_else(|| {
            tracing::warn!(model = %self.model, "key points output was not a JSON string array");
            Vec::new()
        })
    }
}

fn non_empty_or(content: Option<String>, fallback: &str) -> String {
    content
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Strict parse: the whole output must be a JSON array of strings.
pub fn parse_key_points(raw: &str) -> Option<Vec<String>> {
    serde_json::from_str::<Vec<String>>(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays canned results and records every request it sees.
    struct FakeClient {
        reply: Mutex<Option<Result<Option<String>, AiError>>>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl FakeClient {
        fn replying(reply: Result<Option<String>, AiError>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last_request(&self) -> CompletionRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl CompletionClient for FakeClient {
        async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, AiError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.lock().unwrap().take().unwrap_or(Ok(None))
        }
    }

    fn gateway(client: Arc<FakeClient>) -> AiGateway {
        AiGateway::new(client, "gpt-3.5-turbo")
    }

    #[test]
    fn test_builder_orders_system_context_user() {
        let conversation = Conversation::system("persona").context("notes").user("question");
        let roles: Vec<ChatRole> = conversation.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::System, ChatRole::System, ChatRole::User]);
        assert_eq!(conversation.messages()[1].content, "Context from user's notes: notes");
        assert_eq!(conversation.messages()[2].content, "question");
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let json = serde_json::to_string(&ChatMessage::new(ChatRole::Assistant, "hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[tokio::test]
    async fn test_ask_ai_sends_fixed_sampling_parameters() {
        let client = FakeClient::replying(Ok(Some("answer".to_string())));
        let answer = gateway(client.clone()).ask_ai("hello", None).await.unwrap();
        assert_eq!(answer, "answer");

        let request = client.last_request();
        assert_eq!(request.model, "gpt-3.5-turbo");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 1000);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].content, PERSONA);
    }

    #[tokio::test]
    async fn test_ask_ai_injects_context() {
        let client = FakeClient::replying(Ok(Some("a".to_string())));
        gateway(client.clone()).ask_ai("q", Some("buy milk")).await.unwrap();
        let request = client.last_request();
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[1].role, ChatRole::System);
    }

    #[tokio::test]
    async fn test_ask_ai_ignores_empty_context() {
        let client = FakeClient::replying(Ok(Some("a".to_string())));
        gateway(client.clone()).ask_ai("q", Some("")).await.unwrap();
        assert_eq!(client.last_request().messages.len(), 2);
    }

    #[tokio::test]
    async fn test_ask_ai_falls_back_on_empty_content() {
        let client = FakeClient::replying(Ok(Some(String::new())));
        assert_eq!(gateway(client).ask_ai("q", None).await.unwrap(), NO_RESPONSE);

        let client = FakeClient::replying(Ok(None));
        assert_eq!(gateway(client).ask_ai("q", None).await.unwrap(), NO_RESPONSE);
    }

    #[tokio::test]
    async fn test_ask_ai_failure_is_generic() {
        let client = FakeClient::replying(Err(AiError::Status {
            status: 500,
            body: "boom".to_string(),
        }));
        let err = gateway(client).ask_ai("q", None).await.unwrap_err();
        assert!(matches!(err, AiError::Failed(ASK_FAILED)));
        assert_eq!(err.user_message(), ASK_FAILED);
    }

    #[tokio::test]
    async fn test_summary_parameters_and_fallback() {
        let client = FakeClient::replying(Ok(None));
        let summary = gateway(client.clone()).generate_summary("long text").await.unwrap();
        assert_eq!(summary, NO_SUMMARY);
        let request = client.last_request();
        assert_eq!(request.temperature, 0.5);
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.messages[0].content, SUMMARY_INSTRUCTION);
        assert_eq!(request.messages[1].content, "long text");
    }

    #[tokio::test]
    async fn test_summary_failure_is_generic() {
        let client = FakeClient::replying(Err(AiError::MissingApiKey));
        let err = gateway(client).generate_summary("t").await.unwrap_err();
        assert_eq!(err.user_message(), SUMMARY_FAILED);
    }

    #[tokio::test]
    async fn test_key_points_parses_string_array() {
        let client = FakeClient::replying(Ok(Some(r#"["one", "two"]"#.to_string())));
        let points = gateway(client.clone()).extract_key_points("t").await;
        assert_eq!(points, vec!["one", "two"]);
        let request = client.last_request();
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.max_tokens, 300);
    }

    #[tokio::test]
    async fn test_key_points_unparsable_output_is_empty() {
        let client = FakeClient::replying(Ok(Some("1. one\n2. two".to_string())));
        assert!(gateway(client).extract_key_points("t").await.is_empty());
    }

    #[tokio::test]
    async fn test_key_points_provider_failure_is_empty() {
        let client = FakeClient::replying(Err(AiError::MissingApiKey));
        assert!(gateway(client).extract_key_points("t").await.is_empty());
    }

    #[test]
    fn test_parse_key_points_is_strict() {
        assert_eq!(parse_key_points("[]"), Some(vec![]));
        assert_eq!(parse_key_points(" [\"a\"] \n"), Some(vec!["a".to_string()]));
        assert_eq!(parse_key_points("[1, 2]"), None);
        assert_eq!(parse_key_points(r#"{"points": ["a"]}"#), None);
        assert_eq!(parse_key_points("not json"), None);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let config = AiConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            model: "m".to_string(),
        };
        let err = AiGateway::from_config(&config).ask_ai("q", None).await.unwrap_err();
        assert_eq!(err.user_message(), ASK_FAILED);
    }
}
