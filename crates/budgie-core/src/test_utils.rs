//! Test utilities for budgie-core
//!
//! Provides a mock OpenAI chat-completions server that answers every request
//! with a scripted reply and records what it was sent.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::ai::{AIClient, OpenAIBackend};
use crate::prompts::PromptLibrary;

/// API key the mock server expects
pub const MOCK_API_KEY: &str = "sk-test";

/// What the mock server answers with
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// 200 with a completion whose message content is this text
    Content(String),
    /// Non-2xx status with a plain body
    Status(u16, String),
    /// 200 with this exact body
    RawBody(String),
    /// Wait this long, then answer like `Content`
    Stall(Duration, String),
}

#[derive(Clone)]
struct MockState {
    reply: ScriptedReply,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// Mock OpenAI-compatible server for integration tests
pub struct MockOpenAIServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockOpenAIServer {
    /// Start the mock server on an available port
    pub async fn start(reply: ScriptedReply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat_completions))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            requests,
        }
    }

    /// Answer every completion with `content`
    pub async fn with_content(content: impl Into<String>) -> Self {
        Self::start(ScriptedReply::Content(content.into())).await
    }

    /// Answer every completion with an HTTP error
    pub async fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self::start(ScriptedReply::Status(status, body.into())).await
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A backend pointed at this server, using embedded prompts only
    pub fn backend(&self) -> OpenAIBackend {
        self.backend_with_timeout(Duration::from_secs(crate::ai::DEFAULT_TIMEOUT_SECS))
    }

    pub fn backend_with_timeout(&self, timeout: Duration) -> OpenAIBackend {
        OpenAIBackend::with_timeout(&self.url(), "gpt-3.5-turbo", MOCK_API_KEY, timeout)
            .expect("build HTTP client")
            .with_prompts(PromptLibrary::embedded_only())
    }

    pub fn client(&self) -> AIClient {
        AIClient::OpenAI(self.backend())
    }

    /// Completion request bodies received so far
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOpenAIServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Models endpoint (health check)
async fn handle_models() -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "gpt-3.5-turbo", "object": "model", "owned_by": "openai"}]
    }))
}

async fn handle_chat_completions(
    State(state): State<MockState>,
    Json(request): Json<Value>,
) -> Response {
    let model = request["model"].as_str().unwrap_or("gpt-3.5-turbo").to_string();
    state.requests.lock().unwrap().push(request);

    match state.reply {
        ScriptedReply::Content(content) => completion(&model, &content),
        ScriptedReply::Stall(delay, content) => {
            tokio::time::sleep(delay).await;
            completion(&model, &content)
        }
        ScriptedReply::Status(status, body) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, body).into_response()
        }
        ScriptedReply::RawBody(body) => (StatusCode::OK, body).into_response(),
    }
}

fn completion(model: &str, content: &str) -> Response {
    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}
