//! AI backend request/response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};

use crate::aggregate;
use crate::error::{Error, Result};
use crate::models::{Category, CategoryTotals, Expense, NewExpense};

/// Number of most recent expenses included in advice prompts
pub const RECENT_EXPENSE_COUNT: usize = 5;

/// Spending data sent along with advice and suggestion requests
///
/// Expenses only need description, amount and category; ids and timestamps
/// sent by clients are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSnapshot {
    #[serde(default)]
    pub expenses: Vec<NewExpense>,
    #[serde(default)]
    pub category_totals: Option<CategoryTotals>,
}

impl SpendingSnapshot {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        Self {
            expenses: expenses
                .iter()
                .map(|e| NewExpense::new(e.description.clone(), e.amount, e.category))
                .collect(),
            category_totals: Some(aggregate::category_totals(expenses)),
        }
    }

    /// Reject negative or non-finite amounts, in expenses or supplied totals
    pub fn validate(&self) -> Result<()> {
        let amounts = self.expenses.iter().map(|e| e.amount).chain(
            self.category_totals
                .iter()
                .flat_map(|totals| totals.values().map(|s| s.total)),
        );

        for amount in amounts {
            if !amount.is_finite() || amount < 0.0 {
                return Err(Error::InvalidData(format!(
                    "Amount must be a non-negative number, got {}",
                    amount
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn total_spent(&self) -> f64 {
        aggregate::total_spent(&self.expenses)
    }

    /// Client-supplied totals, or totals derived from the expenses when absent
    pub fn totals(&self) -> CategoryTotals {
        match &self.category_totals {
            Some(totals) if !totals.is_empty() => totals.clone(),
            _ => aggregate::category_totals(&self.expenses),
        }
    }

    /// `category: $total (n expenses, avg $x)` lines for advice prompts
    pub fn advice_breakdown(&self) -> String {
        self.totals()
            .iter()
            .map(|(category, s)| {
                let average = if s.count > 0 {
                    s.total / s.count as f64
                } else {
                    0.0
                };
                format!(
                    "{}: ${:.2} ({} expenses, avg ${:.2})",
                    category, s.total, s.count, average
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `category: $total (pct%)` lines for suggestion prompts
    pub fn suggestion_breakdown(&self) -> String {
        let total_spent = self.total_spent();
        self.totals()
            .iter()
            .map(|(category, s)| {
                format!(
                    "{}: ${:.2} ({:.1}%)",
                    category,
                    s.total,
                    aggregate::percent_of(s.total, total_spent)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The last few expenses as `- description: $amount (category)` lines
    pub fn recent_expenses(&self) -> String {
        let skip = self.expenses.len().saturating_sub(RECENT_EXPENSE_COUNT);
        self.expenses[skip..]
            .iter()
            .map(|e| format!("- {}: ${:.2} ({})", e.description, e.amount, e.category))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of distinct categories with spend
    pub fn category_count(&self) -> usize {
        self.totals().len()
    }

    /// Category with the highest total, if any
    pub fn top_category(&self) -> Option<(Category, f64)> {
        self.totals()
            .into_iter()
            .map(|(category, s)| (category, s.total))
            .fold(None, |best, (category, total)| match best {
                Some((_, best_total)) if best_total >= total => best,
                _ => Some((category, total)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SpendingSnapshot {
        SpendingSnapshot {
            expenses: vec![
                NewExpense::new("lunch", 12.0, Category::Food),
                NewExpense::new("gas", 40.0, Category::Transportation),
                NewExpense::new("dinner", 28.0, Category::Food),
            ],
            category_totals: None,
        }
    }

    #[test]
    fn test_totals_derived_when_missing() {
        let totals = snapshot().totals();
        assert_eq!(totals[&Category::Food].count, 2);
        assert_eq!(totals[&Category::Food].average, 20.0);
    }

    #[test]
    fn test_advice_breakdown_format() {
        let text = snapshot().advice_breakdown();
        assert!(text.contains("food: $40.00 (2 expenses, avg $20.00)"));
        assert!(text.contains("transportation: $40.00 (1 expenses, avg $40.00)"));
    }

    #[test]
    fn test_suggestion_breakdown_format() {
        let text = snapshot().suggestion_breakdown();
        assert!(text.contains("food: $40.00 (50.0%)"));
    }

    #[test]
    fn test_recent_expenses_keeps_last_five() {
        let mut snap = SpendingSnapshot::default();
        for i in 0..7 {
            snap.expenses
                .push(NewExpense::new(format!("item{}", i), 1.0, Category::Other));
        }
        let recent = snap.recent_expenses();
        assert_eq!(recent.lines().count(), 5);
        assert!(recent.starts_with("- item2: $1.00 (other)"));
        assert!(!recent.contains("item1"));
    }

    #[test]
    fn test_deserialize_client_payload() {
        let json = r#"{
            "expenses": [
                {"id": "1712-0.5", "description": "lunch", "amount": 12, "category": "food", "timestamp": "2024-01-01T00:00:00Z"}
            ],
            "categoryTotals": {"food": {"total": 12, "count": 1, "average": 12}}
        }"#;
        let snap: SpendingSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.expenses.len(), 1);
        assert_eq!(snap.totals()[&Category::Food].total, 12.0);
    }

    #[test]
    fn test_validate_rejects_negative_amounts() {
        assert!(snapshot().validate().is_ok());
        assert!(SpendingSnapshot::default().validate().is_ok());

        let mut snap = snapshot();
        snap.expenses.push(NewExpense::new("refund", -100.0, Category::Other));
        assert!(matches!(snap.validate(), Err(Error::InvalidData(_))));

        let json = r#"{"expenses": [], "categoryTotals": {"food": {"total": -5, "count": 1, "average": -5}}}"#;
        let snap: SpendingSnapshot = serde_json::from_str(json).unwrap();
        assert!(snap.validate().is_err());
    }

    #[test]
    fn test_top_category() {
        let snap = snapshot();
        assert_eq!(snap.top_category(), Some((Category::Food, 40.0)));
        assert_eq!(SpendingSnapshot::default().top_category(), None);
    }
}
