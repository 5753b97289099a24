use std::time::{SystemTime, UNIX_EPOCH};

use crate::backend::{Completion, GenerationRequest};
use crate::models::{ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Map an inbound Chat Completions request onto a backend generation call.
///
/// This mapping is field-by-field:
/// - messages → messages (role and content verbatim, no reformatting)
/// - sampling parameters → passed through unchanged
/// - response_format → forwarded unchanged when present
/// - web_search → always false (no retrieval-augmented behavior)
pub fn to_generation_request(request: &ChatCompletionRequest) -> GenerationRequest {
    GenerationRequest {
        model: request.model.clone(),
        messages: request.messages.clone(),
        web_search: false,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        top_p: request.top_p,
        frequency_penalty: request.frequency_penalty,
        presence_penalty: request.presence_penalty,
        stop: request.stop.clone(),
        response_format: request.response_format.clone(),
    }
}

/// Wrap a backend completion in the Chat Completions response envelope.
///
/// The envelope carries a fresh id and the wall-clock time at which it was
/// built; `model` echoes the inbound request. There is always exactly one
/// choice, at index 0, finished with "stop".
pub fn completion_to_chat_response(
    completion: &Completion,
    model: &str,
) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: fresh_completion_id(),
        object: "chat.completion".to_string(),
        created: unix_timestamp(),
        model: model.to_string(),
        choices: vec![ChatChoice {
            index: 0,
            message: ChatMessage {
                role: completion.role.clone(),
                content: completion.content.clone(),
            },
            finish_reason: "stop".to_string(),
        }],
    }
}

/// Generate a completion id.
///
/// UUID-derived so that two responses issued by the same process never
/// collide, independent of clock resolution.
fn fresh_completion_id() -> String {
    let uuid_str = uuid::Uuid::new_v4().simple().to_string();
    format!("chatcmpl-{}", &uuid_str[..16])
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_fixture() -> ChatCompletionRequest {
        let body = json!({
            "model": "test-model",
            "messages": [
                {"role": "system", "content": "You are helpful."},
                {"role": "user", "content": "hi"}
            ],
            "max_tokens": 64,
            "temperature": 0.2,
            "top_p": 0.9,
            "frequency_penalty": 0.5,
            "presence_penalty": 0.25,
            "stop": ["###"],
            "response_format": {"type": "json_object"}
        });
        ChatCompletionRequest::parse(&serde_json::to_vec(&body).unwrap()).expect("fixture parses")
    }

    #[test]
    fn maps_all_fields_onto_the_generation_call() {
        let request = request_fixture();
        let call = to_generation_request(&request);

        assert_eq!(call.model, "test-model");
        assert_eq!(call.messages, request.messages);
        assert!(!call.web_search);
        assert_eq!(call.max_tokens, 64);
        assert_eq!(call.temperature, 0.2);
        assert_eq!(call.top_p, 0.9);
        assert_eq!(call.frequency_penalty, 0.5);
        assert_eq!(call.presence_penalty, 0.25);
        assert_eq!(call.stop, vec!["###".to_string()]);
        assert_eq!(call.response_format, Some(json!({"type": "json_object"})));
    }

    #[test]
    fn builds_a_single_choice_envelope() {
        let completion = Completion {
            role: "assistant".to_string(),
            content: json!("hello"),
        };
        let response = completion_to_chat_response(&completion, "test-model");

        assert_eq!(response.object, "chat.completion");
        assert_eq!(response.model, "test-model");
        assert!(response.created > 0);
        assert_eq!(response.choices.len(), 1);

        let choice = &response.choices[0];
        assert_eq!(choice.index, 0);
        assert_eq!(choice.finish_reason, "stop");
        assert_eq!(choice.message.role, "assistant");
        assert_eq!(choice.message.content, json!("hello"));
    }

    #[test]
    fn structured_completion_content_survives_untouched() {
        let content = json!([{"type": "text", "text": "part one"}]);
        let completion = Completion {
            role: "assistant".to_string(),
            content: content.clone(),
        };
        let response = completion_to_chat_response(&completion, "test-model");
        assert_eq!(response.choices[0].message.content, content);
    }

    #[test]
    fn ids_are_unique_within_a_process() {
        let completion = Completion {
            role: "assistant".to_string(),
            content: json!("hello"),
        };
        let first = completion_to_chat_response(&completion, "test-model");
        let second = completion_to_chat_response(&completion, "test-model");
        assert_ne!(first.id, second.id);
        assert!(first.id.starts_with("chatcmpl-"));
    }
}
