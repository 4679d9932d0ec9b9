//! Session expense handlers: list, create, update, delete, chat, summary

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{AppError, AppState};
use budgie_core::chat;
use budgie_core::{Category, Expense, ExpenseId, ExpenseUpdate, NewExpense, SessionSummary};

/// Reject amounts the store would otherwise clamp
fn validate_amount(amount: f64) -> Result<(), AppError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(AppError::bad_request("Amount must be a non-negative number"))
    }
}

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

/// GET /api/expenses - Records in insertion order
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let session = state.session()?;
    Ok(Json(session.store.expenses().to_vec()))
}

/// POST /api/expenses - Record one expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Json(expense): Json<NewExpense>,
) -> Result<Json<Expense>, AppError> {
    validate_amount(expense.amount)?;

    let mut session = state.session()?;
    let id = session.store.add(expense);
    let created = session
        .store
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::internal("Failed to record expense"))?;

    Ok(Json(created))
}

/// DELETE /api/expenses - Remove every record
pub async fn clear_expenses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    state.session()?.store.clear();
    Ok(success())
}

/// PATCH /api/expenses/:id - Merge fields into a record; unknown ids are a no-op
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(update): Json<ExpenseUpdate>,
) -> Result<Json<Value>, AppError> {
    if let Some(amount) = update.amount {
        validate_amount(amount)?;
    }

    state.session()?.store.update(ExpenseId(id), update);
    Ok(success())
}

/// DELETE /api/expenses/:id - Remove a record; unknown ids are a no-op
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, AppError> {
    state.session()?.store.remove(ExpenseId(id));
    Ok(success())
}

/// DELETE /api/categories/:category/expenses - Remove a whole category
pub async fn delete_category_expenses(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<Value>, AppError> {
    let category: Category = category
        .parse()
        .map_err(|_| AppError::bad_request("Unknown category"))?;

    let removed = state.session()?.store.remove_category(category);
    info!(%category, removed, "Deleted category expenses");
    Ok(Json(json!({ "removed": removed })))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub expenses: Vec<Expense>,
}

/// POST /api/chat - Parse a message and record what it contains
///
/// Parsing problems never surface as errors; the reply says what happened.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(AppError::bad_request("Message text is required"));
    }

    let parsed = match state.advisor.parse_expenses(text).await {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Chat message could not be processed");
            return Ok(Json(ChatResponse {
                reply: chat::ERROR_REPLY.to_string(),
                expenses: Vec::new(),
            }));
        }
    };

    let added = state.session()?.record(parsed);

    Ok(Json(ChatResponse {
        reply: chat::reply_for(&added),
        expenses: added,
    }))
}

/// GET /api/summary - Records, totals, chart slices and budget status
pub async fn summary(State(state): State<Arc<AppState>>) -> Result<Json<SessionSummary>, AppError> {
    let session = state.session()?;
    Ok(Json(session.summary()))
}
