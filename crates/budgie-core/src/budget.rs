//! Budget progress evaluation and budget suggestions
//!
//! A single linear threshold model: spend is compared to one monthly ceiling.
//!
//! | Percent used   | Status              |
//! |----------------|---------------------|
//! | `<= 90`        | `on-track`          |
//! | `(90, 100]`    | `approaching-limit` |
//! | `> 100`        | `over-budget`       |

use serde::{Deserialize, Serialize};

/// Percent used above which the budget is approaching its limit
pub const APPROACHING_THRESHOLD: f64 = 90.0;

/// Percent used above which the budget is exceeded
pub const OVER_THRESHOLD: f64 = 100.0;

/// Below this percent an on-track budget gets the encouraging message
pub const ENCOURAGING_THRESHOLD: f64 = 50.0;

/// Suggested ceiling when nothing has been tracked yet
pub const DEFAULT_SUGGESTION: f64 = 2000.0;

/// Buffer over current spend when no AI provider is configured
pub const UNCONFIGURED_BUFFER: f64 = 1.20;

/// Buffer over current spend when the AI answer could not be decoded
pub const MALFORMED_BUFFER: f64 = 1.15;

pub const NO_BUDGET_MESSAGE: &str = "Set a monthly budget to track your progress and get insights!";

/// Three-state budget status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    OnTrack,
    ApproachingLimit,
    OverBudget,
}

impl BudgetStatus {
    /// Classify a percent-used value (boundaries inclusive on the lower state)
    pub fn from_percent(percent: f64) -> Self {
        if percent > OVER_THRESHOLD {
            Self::OverBudget
        } else if percent > APPROACHING_THRESHOLD {
            Self::ApproachingLimit
        } else {
            Self::OnTrack
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on-track",
            Self::ApproachingLimit => "approaching-limit",
            Self::OverBudget => "over-budget",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::ApproachingLimit => "Approaching Limit",
            Self::OverBudget => "Over Budget",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of comparing spend with the budget ceiling
///
/// When no budget is set the numeric fields and status are absent and the
/// message asks the user to set one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEvaluation {
    pub budget_amount: Option<f64>,
    pub total_spent: f64,
    pub progress_percent: Option<f64>,
    /// Budget minus spend, negative once over budget
    pub remaining: Option<f64>,
    pub status: Option<BudgetStatus>,
    pub status_label: Option<&'static str>,
    pub status_message: String,
}

impl BudgetEvaluation {
    pub fn has_budget(&self) -> bool {
        self.budget_amount.is_some()
    }
}

/// Evaluate spend against an optional ceiling; `None` or `<= 0` means unset
pub fn evaluate(total_spent: f64, budget_amount: Option<f64>) -> BudgetEvaluation {
    let budget = match budget_amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => amount,
        _ => {
            return BudgetEvaluation {
                budget_amount: None,
                total_spent,
                progress_percent: None,
                remaining: None,
                status: None,
                status_label: None,
                status_message: NO_BUDGET_MESSAGE.to_string(),
            }
        }
    };

    // Multiplying first keeps exact boundaries like 45/50 at exactly 90.
    let progress = total_spent * 100.0 / budget;
    let remaining = budget - total_spent;
    let status = BudgetStatus::from_percent(progress);

    BudgetEvaluation {
        budget_amount: Some(budget),
        total_spent,
        progress_percent: Some(progress),
        remaining: Some(remaining),
        status: Some(status),
        status_label: Some(status.label()),
        status_message: status_message(status, progress, remaining),
    }
}

/// Insight text for an evaluated budget
pub fn status_message(status: BudgetStatus, progress: f64, remaining: f64) -> String {
    match status {
        BudgetStatus::OnTrack if progress < ENCOURAGING_THRESHOLD => format!(
            "Great job! You're only {:.1}% through your budget with ${:.2} remaining.",
            progress, remaining
        ),
        BudgetStatus::OnTrack => format!(
            "You're on track! {:.1}% of budget used. Consider tracking spending closely.",
            progress
        ),
        BudgetStatus::ApproachingLimit => format!(
            "Warning: You've used {:.1}% of your budget. Only ${:.2} remaining.",
            progress, remaining
        ),
        BudgetStatus::OverBudget => format!(
            "You're over budget by ${:.2}. Consider reviewing your expenses.",
            remaining.abs()
        ),
    }
}

/// Session-scoped monthly ceiling, never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BudgetGoal {
    monthly_amount: Option<f64>,
}

impl BudgetGoal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ceiling; non-positive amounts clear it
    pub fn set(&mut self, amount: f64) {
        self.monthly_amount = if amount.is_finite() && amount > 0.0 {
            Some(amount)
        } else {
            None
        };
    }

    pub fn clear(&mut self) {
        self.monthly_amount = None;
    }

    pub fn amount(&self) -> Option<f64> {
        self.monthly_amount
    }

    pub fn evaluate(&self, total_spent: f64) -> BudgetEvaluation {
        evaluate(total_spent, self.monthly_amount)
    }
}

/// A suggested monthly budget with its explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSuggestion {
    pub suggestion: f64,
    pub reasoning: String,
}

/// Which local heuristic produced a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionFallback {
    /// No AI provider credential is configured
    Unconfigured,
    /// The provider answered with something that was not a suggestion
    MalformedResponse,
}

impl SuggestionFallback {
    pub fn buffer(&self) -> f64 {
        match self {
            Self::Unconfigured => UNCONFIGURED_BUFFER,
            Self::MalformedResponse => MALFORMED_BUFFER,
        }
    }
}

/// Suggestion used before any expense has been tracked
pub fn default_suggestion() -> BudgetSuggestion {
    BudgetSuggestion {
        suggestion: DEFAULT_SUGGESTION,
        reasoning: format!(
            "Start with a ${:.0} monthly budget and adjust based on your actual spending patterns.",
            DEFAULT_SUGGESTION
        ),
    }
}

/// Deterministic suggestion: current spend plus the fallback's buffer, rounded up
pub fn heuristic_suggestion(
    total_spent: f64,
    expense_count: usize,
    fallback: SuggestionFallback,
) -> BudgetSuggestion {
    if expense_count == 0 {
        return default_suggestion();
    }

    let suggested = buffered_ceiling(total_spent, fallback.buffer());
    let reasoning = match fallback {
        SuggestionFallback::Unconfigured => format!(
            "Based on your current spending of ${:.2}, I suggest a monthly budget of ${:.2} to give you some buffer.",
            total_spent, suggested
        ),
        SuggestionFallback::MalformedResponse => format!(
            "Based on your spending patterns, I recommend ${:.2} monthly budget with a 15% buffer for flexibility.",
            suggested
        ),
    };

    BudgetSuggestion {
        suggestion: suggested,
        reasoning,
    }
}

/// `ceil(total * buffer)`, with the product first rounded to cents
fn buffered_ceiling(total: f64, buffer: f64) -> f64 {
    ((total * buffer * 100.0).round() / 100.0).ceil()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_thresholds() {
        assert_eq!(BudgetStatus::from_percent(50.0), BudgetStatus::OnTrack);
        assert_eq!(BudgetStatus::from_percent(95.0), BudgetStatus::ApproachingLimit);
        assert_eq!(BudgetStatus::from_percent(101.0), BudgetStatus::OverBudget);
    }

    #[test]
    fn test_status_boundaries() {
        assert_eq!(BudgetStatus::from_percent(90.0), BudgetStatus::OnTrack);
        assert_eq!(BudgetStatus::from_percent(100.0), BudgetStatus::ApproachingLimit);
        assert_eq!(BudgetStatus::from_percent(0.0), BudgetStatus::OnTrack);
    }

    #[test]
    fn test_evaluate_exact_boundaries() {
        assert_eq!(evaluate(45.0, Some(50.0)).status, Some(BudgetStatus::OnTrack));
        assert_eq!(
            evaluate(50.0, Some(50.0)).status,
            Some(BudgetStatus::ApproachingLimit)
        );
        assert_eq!(evaluate(900.0, Some(1000.0)).progress_percent, Some(90.0));
    }

    #[test]
    fn test_evaluate_no_budget() {
        for budget in [None, Some(0.0), Some(-5.0), Some(f64::NAN)] {
            let eval = evaluate(100.0, budget);
            assert!(!eval.has_budget());
            assert!(eval.status.is_none());
            assert!(eval.progress_percent.is_none());
            assert_eq!(eval.status_message, NO_BUDGET_MESSAGE);
        }
    }

    #[test]
    fn test_evaluate_remaining_goes_negative() {
        let eval = evaluate(1200.0, Some(1000.0));
        assert_eq!(eval.remaining, Some(-200.0));
        assert_eq!(eval.status, Some(BudgetStatus::OverBudget));
        assert_eq!(eval.status_label, Some("Over Budget"));
        assert_eq!(
            eval.status_message,
            "You're over budget by $200.00. Consider reviewing your expenses."
        );
    }

    #[test]
    fn test_status_messages_four_way() {
        let low = evaluate(250.0, Some(1000.0)).status_message;
        assert_eq!(
            low,
            "Great job! You're only 25.0% through your budget with $750.00 remaining."
        );

        let mid = evaluate(800.0, Some(1000.0)).status_message;
        assert_eq!(
            mid,
            "You're on track! 80.0% of budget used. Consider tracking spending closely."
        );

        let near = evaluate(950.0, Some(1000.0)).status_message;
        assert_eq!(
            near,
            "Warning: You've used 95.0% of your budget. Only $50.00 remaining."
        );

        let at_half = evaluate(500.0, Some(1000.0)).status_message;
        assert!(at_half.starts_with("You're on track!"));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(BudgetStatus::ApproachingLimit).unwrap();
        assert_eq!(json, "approaching-limit");

        let eval = serde_json::to_value(evaluate(10.0, Some(100.0))).unwrap();
        assert_eq!(eval["status"], "on-track");
        assert_eq!(eval["progressPercent"], 10.0);
        assert_eq!(eval["remaining"], 90.0);
    }

    #[test]
    fn test_budget_goal_set_and_clear() {
        let mut goal = BudgetGoal::new();
        assert_eq!(goal.amount(), None);

        goal.set(1500.0);
        assert_eq!(goal.amount(), Some(1500.0));
        assert_eq!(goal.evaluate(150.0).progress_percent, Some(10.0));

        goal.set(0.0);
        assert_eq!(goal.amount(), None);

        goal.set(10.0);
        goal.clear();
        assert!(!goal.evaluate(5.0).has_budget());
    }

    #[test]
    fn test_unconfigured_suggestion_uses_twenty_percent_buffer() {
        let s = heuristic_suggestion(1000.0, 3, SuggestionFallback::Unconfigured);
        assert_eq!(s.suggestion, 1200.0);
        assert!(s.reasoning.contains("$1000.00"));
        assert!(s.reasoning.contains("$1200.00"));
    }

    #[test]
    fn test_malformed_suggestion_uses_fifteen_percent_buffer() {
        let s = heuristic_suggestion(1000.0, 3, SuggestionFallback::MalformedResponse);
        assert_eq!(s.suggestion, 1150.0);
        assert!(s.reasoning.contains("15% buffer"));
    }

    #[test]
    fn test_suggestion_rounds_up() {
        let s = heuristic_suggestion(10.01, 1, SuggestionFallback::Unconfigured);
        assert_eq!(s.suggestion, 13.0);
    }

    #[test]
    fn test_suggestion_without_expenses_is_default() {
        let s = heuristic_suggestion(0.0, 0, SuggestionFallback::Unconfigured);
        assert_eq!(s, default_suggestion());
        assert_eq!(s.suggestion, 2000.0);
        assert_eq!(
            s.reasoning,
            "Start with a $2000 monthly budget and adjust based on your actual spending patterns."
        );
    }
}
