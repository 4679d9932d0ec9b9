//! AI-assisted handlers: expense parsing, budget advice, budget suggestion

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AppError, AppState};
use budgie_core::{BudgetSuggestion, NewExpense, SpendingSnapshot};

/// Shown when no provider credential is configured
pub const ADVICE_UNAVAILABLE: &str = "AI budget advice is unavailable right now.";
const ADVICE_FAILED: &str = "Failed to get budget advice. Please try again later.";
const SUGGESTION_FAILED: &str = "Failed to get budget suggestion. Please try again later.";
const PARSE_FAILED: &str = "Failed to parse expenses. Please try again.";
const INVALID_AMOUNT: &str = "Amount must be a non-negative number";

#[derive(Debug, Deserialize)]
pub struct ParseExpensesRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub advice: String,
}

/// POST /api/parse-expenses - Turn free text into expense candidates
///
/// Nothing is recorded; see `/api/chat` for parse-and-record.
pub async fn parse_expenses(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ParseExpensesRequest>,
) -> Result<Json<Vec<NewExpense>>, AppError> {
    if request.text.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let expenses = state
        .advisor
        .parse_expenses(&request.text)
        .await
        .map_err(|e| AppError::internal(PARSE_FAILED).with_source(e))?;

    debug!(count = expenses.len(), "Parsed expenses");
    Ok(Json(expenses))
}

/// POST /api/budget-advice - Free-text advice for the submitted spending
pub async fn budget_advice(
    State(state): State<Arc<AppState>>,
    Json(snapshot): Json<SpendingSnapshot>,
) -> Result<Json<AdviceResponse>, AppError> {
    match state.advisor.budget_advice(&snapshot).await {
        Ok(advice) => Ok(Json(AdviceResponse { advice })),
        Err(e) if e.is_invalid_data() => Err(AppError::bad_request(INVALID_AMOUNT)),
        Err(e) if e.is_not_configured() => Err(AppError::unavailable(ADVICE_UNAVAILABLE)),
        Err(e) => Err(AppError::internal(ADVICE_FAILED).with_source(e)),
    }
}

/// POST /api/budget-suggestion - Recommend a monthly budget ceiling
pub async fn budget_suggestion(
    State(state): State<Arc<AppState>>,
    Json(snapshot): Json<SpendingSnapshot>,
) -> Result<Json<BudgetSuggestion>, AppError> {
    match state.advisor.suggest_budget(&snapshot).await {
        Ok(suggestion) => Ok(Json(suggestion)),
        Err(e) if e.is_invalid_data() => Err(AppError::bad_request(INVALID_AMOUNT)),
        Err(e) => Err(AppError::internal(SUGGESTION_FAILED).with_source(e)),
    }
}
