//! Session budget handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{AppError, AppState};
use budgie_core::BudgetEvaluation;

#[derive(Debug, Deserialize)]
pub struct SetBudgetRequest {
    pub amount: f64,
}

/// PUT /api/budget - Set the monthly ceiling (zero or less clears it)
pub async fn set_budget(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetBudgetRequest>,
) -> Result<Json<BudgetEvaluation>, AppError> {
    if !request.amount.is_finite() {
        return Err(AppError::bad_request("Budget must be a number"));
    }

    let mut session = state.session()?;
    session.budget.set(request.amount);
    let total = session.store.total_spent();

    Ok(Json(session.budget.evaluate(total)))
}

/// DELETE /api/budget - Clear the monthly ceiling
pub async fn clear_budget(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BudgetEvaluation>, AppError> {
    let mut session = state.session()?;
    session.budget.clear();
    let total = session.store.total_spent();

    Ok(Json(session.budget.evaluate(total)))
}
