//! OpenAI chat completions backend
//!
//! Works with api.openai.com and any server implementing the
//! `/v1/chat/completions` API.
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_API_KEY`: API key (required)
//! - `OPENAI_BASE_URL`: Server URL (default: https://api.openai.com)
//! - `OPENAI_MODEL`: Model name (default: gpt-3.5-turbo)

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::budget::BudgetSuggestion;
use crate::error::{Error, Result};
use crate::models::{Category, NewExpense};
use crate::prompts::{PromptId, PromptLibrary};

use super::parsing::{parse_advice, parse_expense_list, parse_suggestion, truncate_for_log};
use super::types::SpendingSnapshot;
use super::{AIBackend, DEFAULT_TIMEOUT_SECS};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// OpenAI chat completions backend
#[derive(Clone)]
pub struct OpenAIBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OpenAIBackend {
    /// Create a backend with the default request timeout
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Result<Self> {
        Self::with_timeout(
            base_url,
            model,
            api_key,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Every request made by this backend is bounded by `timeout`
    pub fn with_timeout(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        })
    }

    /// Replace the prompt library (e.g. embedded prompts only in tests)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create from environment variables
    ///
    /// Required: `OPENAI_API_KEY`
    /// Optional: `OPENAI_BASE_URL` (default: https://api.openai.com)
    /// Optional: `OPENAI_MODEL` (default: gpt-3.5-turbo)
    ///
    /// `Ok(None)` when no API key is set.
    pub fn from_env(timeout: Duration) -> Result<Option<Self>> {
        let Some(api_key) = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
        else {
            return Ok(None);
        };
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self::with_timeout(&base_url, &model, &api_key, timeout).map(Some)
    }

    /// Render a prompt and send it as a system + user chat completion
    async fn complete(&self, id: PromptId, vars: &HashMap<&str, &str>) -> Result<String> {
        let request = {
            let mut prompts = self
                .prompts
                .write()
                .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
            let prompt = prompts.get(id)?;

            ChatCompletionRequest {
                model: self.model.clone(),
                messages: vec![
                    ChatMessage {
                        role: "system".to_string(),
                        content: prompt.render_system(vars),
                    },
                    ChatMessage {
                        role: "user".to_string(),
                        content: prompt.render_user(vars),
                    },
                ],
                temperature: Some(prompt.metadata.temperature),
                max_tokens: Some(prompt.metadata.max_tokens),
            }
        };

        let response = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Provider(format!(
                "OpenAI API error {}: {}",
                status,
                truncate_for_log(&body)
            )));
        }

        let chat_response: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            Error::MalformedResponse(format!(
                "Invalid completion body: {} | Raw: {}",
                e,
                truncate_for_log(&body)
            ))
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::MalformedResponse("No response from OpenAI API".into()))?;

        debug!(prompt = id.as_str(), response = %truncate_for_log(&content), "OpenAI response");
        Ok(content)
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// `content` is null when the model refuses or only calls tools
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl AIBackend for OpenAIBackend {
    async fn parse_expenses(&self, text: &str) -> Result<Vec<NewExpense>> {
        let categories = Category::all()
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut vars = HashMap::new();
        vars.insert("text", text);
        vars.insert("categories", categories.as_str());

        let response = self.complete(PromptId::ParseExpenses, &vars).await?;
        parse_expense_list(&response)
    }

    async fn budget_advice(&self, snapshot: &SpendingSnapshot) -> Result<String> {
        let total_spent = format!("{:.2}", snapshot.total_spent());
        let breakdown = snapshot.advice_breakdown();
        let recent = snapshot.recent_expenses();

        let mut vars = HashMap::new();
        vars.insert("total_spent", total_spent.as_str());
        vars.insert("category_breakdown", breakdown.as_str());
        vars.insert("recent_expenses", recent.as_str());

        let response = self.complete(PromptId::BudgetAdvice, &vars).await?;
        parse_advice(&response)
    }

    async fn suggest_budget(&self, snapshot: &SpendingSnapshot) -> Result<BudgetSuggestion> {
        let total_spent = format!("{:.2}", snapshot.total_spent());
        let breakdown = snapshot.suggestion_breakdown();
        let count = snapshot.expenses.len().to_string();

        let mut vars = HashMap::new();
        vars.insert("total_spent", total_spent.as_str());
        vars.insert("category_breakdown", breakdown.as_str());
        vars.insert("expense_count", count.as_str());

        let response = self.complete(PromptId::BudgetSuggestion, &vars).await?;
        parse_suggestion(&response)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/v1/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(error = %e, "OpenAI health check failed");
                false
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_new_trims_trailing_slash() {
        let backend =
            OpenAIBackend::new("http://localhost:8080/", "gpt-3.5-turbo", "sk-test").unwrap();
        assert_eq!(backend.host(), "http://localhost:8080");
        assert_eq!(backend.model(), "gpt-3.5-turbo");
        assert_eq!(backend.api_key, "sk-test");
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend =
            OpenAIBackend::new("http://127.0.0.1:9", "gpt-3.5-turbo", "sk-test").unwrap();
        assert!(!backend.health_check().await);
    }

    #[test]
    fn test_chat_completion_request_serialization() {
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage {
                role: "system".to_string(),
                content: "Parse expenses".to_string(),
            }],
            temperature: Some(0.1),
            max_tokens: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "Parse expenses");
        let temp = json["temperature"].as_f64().unwrap();
        assert!((temp - 0.1).abs() < 0.001);
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_chat_completion_response_deserialization() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "[]"},
                "finish_reason": "stop"
            }]
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content.as_deref(), Some("[]"));
    }

    #[test]
    fn test_null_content_deserializes() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert!(response.choices[0].message.content.is_none());
    }
}
