#![forbid(unsafe_code)]
#![doc = r#"
Chatfront

Serve the OpenAI Chat Completions surface (`POST /v1/chat/completions`) in front of a pluggable text-generation backend.

Crate highlights
- Library: schema types in `models`, pure translation via `to_generation_request` / `completion_to_chat_response`.
- HTTP server (in `server`): the completions endpoint plus `/status`.
- Backends: the `backend::GenerationBackend` trait with an HTTP implementation for OpenAI-compatible providers.

Modules
- `models`: Wire shapes for Chat Completions requests and responses, with validation.
- `backend`: Backend collaborator seam (call/reply types, error taxonomy, HTTP implementation).
- `conversion`: Mapping logic from the wire shapes to backend calls and back.
- `server`: Actix-web router/handlers (the binary uses this).
- `util`: Shared helpers (tracing, env, HTTP client, CORS).
"#]

pub mod backend;
pub mod conversion;
pub mod models;
pub mod server;
pub mod util;

// Re-export the primary translation functions for ergonomic library use.
pub use crate::backend::{
    BackendError, Completion, GenerationBackend, GenerationRequest, HttpBackend, HttpBackendConfig,
};
pub use crate::conversion::{completion_to_chat_response, to_generation_request};
pub use crate::models::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ValidationError,
};
