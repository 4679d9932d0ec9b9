//! One user's in-memory tracking session
//!
//! Bundles the record store with the budget ceiling. Everything the UI shows
//! is projected from these two values on demand.

use serde::Serialize;

use crate::aggregate;
use crate::ai::SpendingSnapshot;
use crate::budget::{BudgetEvaluation, BudgetGoal};
use crate::models::{CategoryGroup, CategoryShare, CategoryTotals, Expense, NewExpense};
use crate::store::ExpenseStore;

/// Records plus the budget they are measured against
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub store: ExpenseStore,
    pub budget: BudgetGoal,
}

/// Everything the dashboard renders, computed in one pass
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub expenses: Vec<Expense>,
    pub total_spent: f64,
    pub category_totals: CategoryTotals,
    pub breakdown: Vec<CategoryShare>,
    pub groups: Vec<CategoryGroup>,
    pub budget: BudgetEvaluation,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit parsed candidates, returning the stored records in order
    pub fn record(&mut self, expenses: Vec<NewExpense>) -> Vec<Expense> {
        self.store
            .add_many(expenses)
            .into_iter()
            .filter_map(|id| self.store.get(id).cloned())
            .collect()
    }

    /// Spending data in the shape AI requests take
    pub fn snapshot(&self) -> SpendingSnapshot {
        SpendingSnapshot::from_expenses(self.store.expenses())
    }

    pub fn summary(&self) -> SessionSummary {
        let expenses = self.store.expenses();
        let total_spent = aggregate::total_spent(expenses);
        let category_totals = aggregate::category_totals(expenses);

        SessionSummary {
            expenses: expenses.to_vec(),
            total_spent,
            breakdown: aggregate::category_breakdown(&category_totals),
            groups: aggregate::group_by_category(expenses),
            category_totals,
            budget: self.budget.evaluate(total_spent),
        }
    }

    /// Drop all records and the budget, restarting ids
    pub fn reset(&mut self) {
        self.store.reset();
        self.budget.clear();
    }
}
