//! Budgie Web Server
//!
//! Axum-based REST API for the Budgie expense tracker.
//!
//! - AI endpoints: expense parsing, budget advice, budget suggestion
//! - Session endpoints: the in-memory expense list and budget of this process
//! - Open CORS by default, sanitized error responses

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use budgie_core::{AIBackend, AIClient, BudgetAdvisor, Session};

mod handlers;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = any origin)
    pub allowed_origins: Vec<String>,
    /// Timeout applied to every AI provider request
    pub ai_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            ai_timeout: Duration::from_secs(budgie_core::ai::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    /// Read `BUDGIE_ALLOWED_ORIGINS` (comma-separated) and `BUDGIE_AI_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var("BUDGIE_ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        Self {
            allowed_origins,
            ai_timeout: budgie_core::ai::timeout_from_env(),
        }
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub config: ServerConfig,
    /// `None` when no AI provider credential is configured
    pub ai: Option<AIClient>,
    pub advisor: BudgetAdvisor,
    session: Mutex<Session>,
}

impl AppState {
    pub fn new(ai: Option<AIClient>, config: ServerConfig) -> Self {
        Self {
            advisor: BudgetAdvisor::new(ai.clone()),
            ai,
            config,
            session: Mutex::new(Session::new()),
        }
    }

    /// Lock the session for a synchronous read or update
    pub fn session(&self) -> Result<MutexGuard<'_, Session>, AppError> {
        self.session
            .lock()
            .map_err(|_| AppError::internal("Session state is unavailable"))
    }
}

/// Create the application router
pub fn create_router(
    ai: Option<AIClient>,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> Router {
    match ai {
        Some(ref client) => info!(
            "AI backend configured: {} (model: {})",
            client.host(),
            client.model()
        ),
        None => info!("ℹ️  AI backend not configured (set OPENAI_API_KEY to enable AI features)"),
    }

    let state = Arc::new(AppState::new(ai, config.clone()));

    let api_routes = Router::new()
        .route(
            "/health",
            get(handlers::health).fallback(handlers::method_not_allowed),
        )
        // AI-assisted operations
        .route(
            "/parse-expenses",
            post(handlers::parse_expenses).fallback(handlers::method_not_allowed),
        )
        .route(
            "/budget-advice",
            post(handlers::budget_advice).fallback(handlers::method_not_allowed),
        )
        .route(
            "/budget-suggestion",
            post(handlers::budget_suggestion).fallback(handlers::method_not_allowed),
        )
        // Session expenses
        .route(
            "/expenses",
            get(handlers::list_expenses)
                .post(handlers::create_expense)
                .delete(handlers::clear_expenses)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/expenses/:id",
            patch(handlers::update_expense)
                .delete(handlers::delete_expense)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/categories/:category/expenses",
            delete(handlers::delete_category_expenses).fallback(handlers::method_not_allowed),
        )
        .route(
            "/chat",
            post(handlers::chat).fallback(handlers::method_not_allowed),
        )
        .route(
            "/summary",
            get(handlers::summary).fallback(handlers::method_not_allowed),
        )
        .route(
            "/budget",
            put(handlers::set_budget)
                .delete(handlers::clear_budget)
                .fallback(handlers::method_not_allowed),
        );

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state);

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http()).layer(cors)
}

/// Start the server
pub async fn serve(host: &str, port: u16, static_dir: Option<&str>) -> anyhow::Result<()> {
    serve_with_config(host, port, static_dir, ServerConfig::from_env()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let ai = AIClient::from_env_with_timeout(config.ai_timeout);
    check_ai_connection(ai.as_ref()).await;

    let app = create_router(ai, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection(ai: Option<&AIClient>) {
    match ai {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "✅ AI backend connected: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "⚠️  AI backend configured but not responding: {} (model: {})",
                    client.host(),
                    client.model()
                );
            }
        }
        None => {
            info!("ℹ️  AI backend not configured, parsing and suggestions use local heuristics");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }

    pub fn unavailable(msg: &str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Attach the underlying error for logging; it is never sent to the client
    pub fn with_source(mut self, err: impl Into<anyhow::Error>) -> Self {
        self.internal = Some(err.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, status = %self.status, "Request failed");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err.into()),
        }
    }
}
