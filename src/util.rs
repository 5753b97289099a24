use actix_web::HttpResponse;
use http::StatusCode;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize dotenv and structured tracing based on RUST_LOG.
///
/// Environment files are resolved in order: an explicit path in ENV_FILE,
/// then the conventional ".env" in the working directory. Existing process
/// variables are never overwritten. The source used is logged for
/// observability.
pub fn init_tracing() {
    let mut env_source: String = "none".into();

    if let Ok(p) = std::env::var("ENV_FILE") {
        let p = p.trim();
        if !p.is_empty() && std::path::Path::new(p).is_file() && dotenvy::from_filename(p).is_ok() {
            env_source = p.to_string();
        }
    }

    if env_source == "none" && dotenvy::dotenv().is_ok() {
        env_source = ".env".into();
    }

    // Respects RUST_LOG potentially provided by the env file
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let subscriber = fmt().with_env_filter(EnvFilter::new(filter)).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::info!("Environment loaded from: {}", env_source);
}

/// Shared application state used by the HTTP server and handlers.
///
/// The backend handle is long-lived and injected at construction; handlers
/// hold no mutable state, so concurrent requests need no coordination.
pub struct AppState {
    pub backend: std::sync::Arc<dyn crate::backend::GenerationBackend>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            backend: std::sync::Arc::new(crate::backend::HttpBackend::from_env()),
        }
    }
}

impl AppState {
    /// Create AppState around an explicit backend (tests, embedded use).
    pub fn with_backend(backend: std::sync::Arc<dyn crate::backend::GenerationBackend>) -> Self {
        Self { backend }
    }
}

/// Build an HTTP client honoring proxy and timeout environment variables.
///
/// Environment:
/// - CHATFRONT_NO_PROXY = 1|true|yes|on  -> disable all proxies
/// - CHATFRONT_PROXY_URL = <url>         -> proxy for all schemes
/// - HTTP_PROXY / http_proxy             -> HTTP proxy
/// - HTTPS_PROXY / https_proxy           -> HTTPS proxy
/// - CHATFRONT_HTTP_TIMEOUT_SECONDS      -> overall request timeout (u64)
pub fn build_http_client_from_env() -> reqwest::Client {
    let mut builder = reqwest::Client::builder();

    if let Ok(secs) = std::env::var("CHATFRONT_HTTP_TIMEOUT_SECONDS") {
        if let Ok(n) = secs.trim().parse::<u64>() {
            builder = builder.timeout(std::time::Duration::from_secs(n));
        }
    }

    if env_flag("CHATFRONT_NO_PROXY") {
        builder = builder.no_proxy();
    } else {
        if let Ok(url) = std::env::var("CHATFRONT_PROXY_URL") {
            let u = url.trim();
            if !u.is_empty() {
                if let Ok(p) = reqwest::Proxy::all(u) {
                    builder = builder.proxy(p);
                }
            }
        }
        if let Ok(http_p) = std::env::var("HTTP_PROXY").or_else(|_| std::env::var("http_proxy")) {
            let u = http_p.trim();
            if !u.is_empty() {
                if let Ok(p) = reqwest::Proxy::http(u) {
                    builder = builder.proxy(p);
                }
            }
        }
        if let Ok(https_p) = std::env::var("HTTPS_PROXY").or_else(|_| std::env::var("https_proxy"))
        {
            let u = https_p.trim();
            if !u.is_empty() {
                if let Ok(p) = reqwest::Proxy::https(u) {
                    builder = builder.proxy(p);
                }
            }
        }
    }

    // User-Agent for observability
    builder = builder.user_agent(format!("chatfront/{}", env!("CARGO_PKG_VERSION")));

    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}

/// Resolve the backend base URL from environment or use the default public
/// OpenAI endpoint.
pub fn backend_base_url() -> String {
    match std::env::var("CHATFRONT_BACKEND_URL") {
        Ok(val) if !val.trim().is_empty() => val,
        _ => {
            static LOGGED: std::sync::OnceLock<()> = std::sync::OnceLock::new();
            LOGGED.get_or_init(|| {
                tracing::warn!(
                    "CHATFRONT_BACKEND_URL not set; defaulting to https://api.openai.com/v1"
                );
            });
            "https://api.openai.com/v1".into()
        }
    }
}

/// Build a JSON error response with the given HTTP status and detail message.
pub fn error_response(status: StatusCode, msg: &str) -> HttpResponse {
    let body = serde_json::json!({ "detail": msg });
    HttpResponse::build(actix_web::http::StatusCode::from_u16(status.as_u16()).unwrap()).json(body)
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v.trim().to_ascii_lowercase())
        .map(|v| v == "1" || v == "true" || v == "yes" || v == "on")
        .unwrap_or(false)
}

fn env_list(key: &str) -> Option<Vec<String>> {
    let raw = std::env::var(key).ok()?;
    Some(
        raw.split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
    )
}

/// Build a CORS configuration from environment variables for Actix-web.
///
/// Environment variables:
/// - CORS_ALLOWED_ORIGINS: "*" or comma-separated origins
/// - CORS_ALLOWED_METHODS: "*" or comma-separated methods
/// - CORS_ALLOWED_HEADERS: "*" or comma-separated request header names
/// - CORS_ALLOW_CREDENTIALS: enable with 1,true,yes,on
/// - CORS_MAX_AGE: max age in seconds (usize)
///
/// Defaults are permissive when not configured.
pub fn cors_config_from_env() -> actix_cors::Cors {
    let mut cors = actix_cors::Cors::default();

    match std::env::var("CORS_ALLOWED_ORIGINS") {
        Ok(s) if s.trim() != "*" => {
            for origin in env_list("CORS_ALLOWED_ORIGINS").unwrap_or_default() {
                cors = cors.allowed_origin(&origin);
            }
        }
        _ => cors = cors.allow_any_origin(),
    }

    match std::env::var("CORS_ALLOWED_METHODS") {
        Ok(s) if s.trim() != "*" => {
            let methods = env_list("CORS_ALLOWED_METHODS").unwrap_or_default();
            if !methods.is_empty() {
                cors = cors.allowed_methods(methods.iter().map(|m| m.as_str()));
            }
        }
        _ => cors = cors.allow_any_method(),
    }

    match std::env::var("CORS_ALLOWED_HEADERS") {
        Ok(s) if s.trim() != "*" => {
            for header in env_list("CORS_ALLOWED_HEADERS").unwrap_or_default() {
                cors = cors.allowed_header(header.as_str());
            }
        }
        _ => cors = cors.allow_any_header(),
    }

    if env_flag("CORS_ALLOW_CREDENTIALS") {
        cors = cors.supports_credentials();
    }

    if let Ok(secs) = std::env::var("CORS_MAX_AGE") {
        if let Ok(n) = secs.trim().parse::<usize>() {
            cors = cors.max_age(n);
        }
    }

    cors
}
