use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single conversation turn.
///
/// `content` is deliberately untyped: clients send plain strings as well as
/// multi-part arrays (text + image parts), and providers return the same
/// range of shapes. It is forwarded unchanged and never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Value,
}

fn default_max_tokens() -> u32 {
    300
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    1.0
}

/// Inbound Chat Completions request.
///
/// Absent sampling fields are populated with their defaults at parse time,
/// so downstream code never distinguishes "omitted" from "explicitly set to
/// the default".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default)]
    pub frequency_penalty: f64,
    #[serde(default)]
    pub presence_penalty: f64,
    #[serde(default)]
    pub stop: Vec<String>,
    /// Structured-output hint. Forwarded unchanged, never inspected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

impl ChatCompletionRequest {
    /// Parse and validate a raw JSON request body.
    ///
    /// Serde handles field kinds and defaults; the explicit checks below
    /// cover the constraints the wire format cannot express.
    pub fn parse(raw: &[u8]) -> Result<Self, ValidationError> {
        let request: Self =
            serde_json::from_slice(raw).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::EmptyModel);
        }
        if self.messages.is_empty() {
            return Err(ValidationError::EmptyMessages);
        }
        if let Some(pos) = self.messages.iter().position(|m| m.role.is_empty()) {
            return Err(ValidationError::EmptyRole(pos));
        }
        Ok(())
    }
}

/// One generated candidate. This adapter always produces exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: String,
}

/// Response envelope for a completed generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
}

/// Reasons an inbound request is rejected before reaching the backend.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("model must be a non-empty string")]
    EmptyModel,

    #[error("messages must contain at least one entry")]
    EmptyMessages,

    #[error("messages[{0}].role must not be empty")]
    EmptyRole(usize),

    #[error("invalid request body: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: &Value) -> Vec<u8> {
        serde_json::to_vec(v).expect("serialize fixture")
    }

    #[test]
    fn populates_defaults_for_absent_fields() {
        let body = json!({
            "model": "test-model",
            "messages": [{"role": "user", "content": "hi"}]
        });
        let parsed = ChatCompletionRequest::parse(&raw(&body)).expect("valid request");
        assert_eq!(parsed.max_tokens, 300);
        assert_eq!(parsed.temperature, 0.7);
        assert_eq!(parsed.top_p, 1.0);
        assert_eq!(parsed.frequency_penalty, 0.0);
        assert_eq!(parsed.presence_penalty, 0.0);
        assert!(parsed.stop.is_empty());
        assert!(parsed.response_format.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let body = json!({
            "model": "test-model",
            "messages": [{"role": "user", "content": "hi"}],
            "max_tokens": 16,
            "temperature": 0.0,
            "stop": ["###"]
        });
        let parsed = ChatCompletionRequest::parse(&raw(&body)).expect("valid request");
        assert_eq!(parsed.max_tokens, 16);
        assert_eq!(parsed.temperature, 0.0);
        assert_eq!(parsed.stop, vec!["###".to_string()]);
    }

    #[test]
    fn parsing_is_idempotent() {
        let body = raw(&json!({
            "model": "test-model",
            "messages": [{"role": "user", "content": "hi"}]
        }));
        let first = ChatCompletionRequest::parse(&body).expect("first parse");
        let second = ChatCompletionRequest::parse(&body).expect("second parse");
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_missing_model() {
        let body = json!({
            "messages": [{"role": "user", "content": "hi"}]
        });
        let err = ChatCompletionRequest::parse(&raw(&body)).expect_err("missing model");
        assert!(matches!(err, ValidationError::Malformed(_)));
        assert!(err.to_string().contains("model"));
    }

    #[test]
    fn rejects_empty_model() {
        let body = json!({
            "model": "  ",
            "messages": [{"role": "user", "content": "hi"}]
        });
        let err = ChatCompletionRequest::parse(&raw(&body)).expect_err("blank model");
        assert!(matches!(err, ValidationError::EmptyModel));
    }

    #[test]
    fn rejects_empty_messages() {
        let body = json!({"model": "test-model", "messages": []});
        let err = ChatCompletionRequest::parse(&raw(&body)).expect_err("no messages");
        assert!(matches!(err, ValidationError::EmptyMessages));
    }

    #[test]
    fn rejects_empty_role() {
        let body = json!({
            "model": "test-model",
            "messages": [
                {"role": "user", "content": "hi"},
                {"role": "", "content": "anonymous"}
            ]
        });
        let err = ChatCompletionRequest::parse(&raw(&body)).expect_err("blank role");
        assert!(matches!(err, ValidationError::EmptyRole(1)));
    }

    #[test]
    fn rejects_non_numeric_temperature() {
        let body = json!({
            "model": "test-model",
            "messages": [{"role": "user", "content": "hi"}],
            "temperature": "warm"
        });
        let err = ChatCompletionRequest::parse(&raw(&body)).expect_err("bad temperature");
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[test]
    fn accepts_structured_content_and_response_format() {
        let body = json!({
            "model": "test-model",
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": "Describe this image"},
                    {"type": "image_url", "image_url": {"url": "https://example.com/cat.png"}}
                ]
            }],
            "response_format": {"type": "json_object", "schema": {"type": "object"}}
        });
        let parsed = ChatCompletionRequest::parse(&raw(&body)).expect("valid request");
        assert!(parsed.messages[0].content.is_array());
        assert_eq!(parsed.response_format.as_ref().unwrap()["type"], "json_object");
    }
}
