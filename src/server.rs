use actix_web::{web, HttpResponse, Responder};
use http::StatusCode;
use tracing::{debug, warn};

use crate::conversion::{completion_to_chat_response, to_generation_request};
use crate::models::ChatCompletionRequest;
use crate::util::{error_response, AppState};

/// Configure Actix-web routes with AppState.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .route("/status", web::get().to(status))
            .route("/v1/chat/completions", web::post().to(chat_completions)),
    );
}

/// Service status endpoint exposing the version and available routes.
async fn status() -> impl Responder {
    web::Json(serde_json::json!({
        "name": "chatfront",
        "version": env!("CARGO_PKG_VERSION"),
        "routes": ["/status", "/v1/chat/completions"],
        "backend": {
            "base_url": crate::util::backend_base_url()
        }
    }))
}

/// OpenAI-compatible chat completions endpoint.
///
/// Within one call the steps run strictly in sequence: parse, translate,
/// invoke the backend once, wrap. Validation failures come back as 400 and
/// never reach the backend; backend failures come back as 500. Both carry a
/// `detail` body, and no request is retried.
async fn chat_completions(state: web::Data<AppState>, body: web::Bytes) -> impl Responder {
    let request = match ChatCompletionRequest::parse(&body) {
        Ok(request) => request,
        Err(err) => {
            debug!(error = %err, "rejecting invalid chat completion request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    debug!(
        model = %request.model,
        messages = request.messages.len(),
        "handling chat completion"
    );

    let call = to_generation_request(&request);
    match state.backend.complete(&call).await {
        Ok(completion) => {
            HttpResponse::Ok().json(completion_to_chat_response(&completion, &request.model))
        }
        Err(err) => {
            warn!(model = %request.model, error = %err, "backend call failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}
