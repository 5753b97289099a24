use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::models::ChatMessage;

/// Normalized generation call handed to a backend.
///
/// Messages and sampling parameters are carried over from the inbound
/// request verbatim; `web_search` is always false because this adapter is a
/// pure text-completion passthrough.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub web_search: bool,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    /// Forwarded unchanged, never inspected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

/// The single completion a backend produces for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub role: String,
    pub content: Value,
}

/// Backend failure taxonomy. Every variant carries a description that is
/// surfaced verbatim to the caller.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend network error: {0}")]
    Network(String),

    #[error("backend provider error: {0}")]
    Provider(String),

    #[error("malformed backend reply: {0}")]
    MalformedReply(String),
}

/// A text-generation backend: one call in, one completion (or failure) out.
///
/// Implementations own their transport concerns (connection reuse,
/// timeouts). The adapter never retries; a failed call is surfaced to the
/// client immediately.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn complete(&self, request: &GenerationRequest) -> Result<Completion, BackendError>;
}

/// Configuration for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Provider base URL (include /v1 where the provider expects it).
    pub base_url: String,

    /// Optional bearer token for the provider.
    pub api_key: Option<String>,

    /// HTTP client (shared). Built from the environment when absent.
    pub client: Option<reqwest::Client>,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            client: None,
        }
    }
}

/// HTTP backend for OpenAI-compatible providers (hosted APIs, vLLM, Ollama).
pub struct HttpBackend {
    config: HttpBackendConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(mut config: HttpBackendConfig) -> Self {
        let client = config
            .client
            .take()
            .unwrap_or_else(crate::util::build_http_client_from_env);
        Self { config, client }
    }

    /// Build a backend from CHATFRONT_BACKEND_URL and CHATFRONT_BACKEND_API_KEY
    /// (falling back to OPENAI_API_KEY).
    pub fn from_env() -> Self {
        Self::new(HttpBackendConfig {
            base_url: crate::util::backend_base_url(),
            api_key: api_key_from_env(),
            client: None,
        })
    }

    /// Base URL this backend talks to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn complete_async(
        &self,
        request: &GenerationRequest,
    ) -> Result<Completion, BackendError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let mut rb = self.client.post(&url).json(request);
        if let Some(key) = self.config.api_key.as_deref() {
            if !key.is_empty() {
                rb = rb.bearer_auth(key);
            }
        }

        let response = rb
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(BackendError::Provider(format!(
                "provider returned {}: {}",
                status, body
            )));
        }

        let reply: Value = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedReply(e.to_string()))?;
        completion_from_reply(&reply)
    }
}

#[async_trait]
impl GenerationBackend for HttpBackend {
    async fn complete(&self, request: &GenerationRequest) -> Result<Completion, BackendError> {
        self.complete_async(request).await
    }
}

fn api_key_from_env() -> Option<String> {
    std::env::var("CHATFRONT_BACKEND_API_KEY")
        .or_else(|_| std::env::var("OPENAI_API_KEY"))
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Extract the single completion from a provider reply.
///
/// Only `choices[0].message` is consulted; `content` is taken as-is so that
/// structured provider content survives the trip untouched.
fn completion_from_reply(reply: &Value) -> Result<Completion, BackendError> {
    let message = reply
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .ok_or_else(|| {
            BackendError::MalformedReply("reply carries no choices[0].message".to_string())
        })?;

    let role = message
        .get("role")
        .and_then(|r| r.as_str())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| {
            BackendError::MalformedReply("reply message carries no role".to_string())
        })?
        .to_string();

    let content = message.get("content").cloned().unwrap_or(Value::Null);

    Ok(Completion { role, content })
}
