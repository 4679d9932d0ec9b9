//! Pluggable AI backend abstraction
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI operations
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAIBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! // None means the provider is unconfigured
//! let ai = AIClient::from_env();
//!
//! if let Some(ref client) = ai {
//!     let expenses = client.parse_expenses("lunch $12").await?;
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (openai, mock). Default: openai
//! - `OPENAI_API_KEY`: API key (required for the openai backend)
//! - `OPENAI_BASE_URL`: Server URL (default: https://api.openai.com)
//! - `OPENAI_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `BUDGIE_AI_TIMEOUT_SECS`: Request timeout in seconds (default: 10)

mod mock;
mod openai;
pub mod parsing;
pub mod types;

pub use mock::{MockBackend, MockMode};
pub use openai::OpenAIBackend;
pub use types::*;

use std::time::Duration;

use async_trait::async_trait;

use crate::budget::BudgetSuggestion;
use crate::error::Result;
use crate::models::NewExpense;

/// Provider requests that take longer than this are treated as failures
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Request timeout from `BUDGIE_AI_TIMEOUT_SECS`, falling back to the default
pub fn timeout_from_env() -> Duration {
    let secs = std::env::var("BUDGIE_AI_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Extract structured expenses from a free-text message
    async fn parse_expenses(&self, text: &str) -> Result<Vec<NewExpense>>;

    /// Short free-text advice about the given spending
    async fn budget_advice(&self, snapshot: &SpendingSnapshot) -> Result<String>;

    /// Recommend a monthly budget ceiling for the given spending
    async fn suggest_budget(&self, snapshot: &SpendingSnapshot) -> Result<BudgetSuggestion>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI chat completions API (or any compatible server)
    OpenAI(OpenAIBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `openai` (default): requires `OPENAI_API_KEY`
    /// - `mock`: deterministic offline backend
    ///
    /// Returns None when the provider is unconfigured.
    pub fn from_env() -> Option<Self> {
        Self::from_env_with_timeout(timeout_from_env())
    }

    /// Same as `from_env` with an explicit request timeout
    ///
    /// A backend whose HTTP client cannot be built is treated as unconfigured
    /// rather than run without the timeout.
    pub fn from_env_with_timeout(timeout: Duration) -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "openai".to_string());

        match backend.to_lowercase().as_str() {
            "openai" | "openai_compatible" => Self::openai_from_env(timeout),
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to openai");
                Self::openai_from_env(timeout)
            }
        }
    }

    fn openai_from_env(timeout: Duration) -> Option<Self> {
        match OpenAIBackend::from_env(timeout) {
            Ok(backend) => backend.map(AIClient::OpenAI),
            Err(e) => {
                tracing::error!(error = %e, "Failed to build AI HTTP client, AI features disabled");
                None
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Short backend name for logs and status output
    pub fn backend_name(&self) -> &'static str {
        match self {
            AIClient::OpenAI(_) => "openai",
            AIClient::Mock(_) => "mock",
        }
    }
}

#[async_trait]
impl AIBackend for AIClient {
    async fn parse_expenses(&self, text: &str) -> Result<Vec<NewExpense>> {
        match self {
            AIClient::OpenAI(b) => b.parse_expenses(text).await,
            AIClient::Mock(b) => b.parse_expenses(text).await,
        }
    }

    async fn budget_advice(&self, snapshot: &SpendingSnapshot) -> Result<String> {
        match self {
            AIClient::OpenAI(b) => b.budget_advice(snapshot).await,
            AIClient::Mock(b) => b.budget_advice(snapshot).await,
        }
    }

    async fn suggest_budget(&self, snapshot: &SpendingSnapshot) -> Result<BudgetSuggestion> {
        match self {
            AIClient::OpenAI(b) => b.suggest_budget(snapshot).await,
            AIClient::Mock(b) => b.suggest_budget(snapshot).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAI(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAI(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAI(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[tokio::test]
    async fn test_client_dispatches_to_mock() {
        let client = AIClient::mock();
        assert_eq!(client.backend_name(), "mock");
        assert!(client.health_check().await);

        let expenses = client.parse_expenses("lunch $12").await.unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, Category::Food);
    }

    #[test]
    fn test_client_delegates_to_openai() {
        let backend = OpenAIBackend::new("http://localhost:9", "gpt-4o-mini", "sk-test").unwrap();
        let client = AIClient::OpenAI(backend);
        assert_eq!(client.model(), "gpt-4o-mini");
        assert_eq!(client.host(), "http://localhost:9");
        assert_eq!(client.backend_name(), "openai");
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(DEFAULT_TIMEOUT_SECS, 10);
    }
}
