//! Budget evaluation and suggestion commands
//!
//! Both run entirely offline.

use anyhow::{bail, Result};
use budgie_core::budget::{self, SuggestionFallback};
use budgie_core::{BudgetEvaluation, BudgetSuggestion};

pub fn cmd_evaluate(spent: f64, budget_amount: Option<f64>, json: bool) -> Result<()> {
    if !spent.is_finite() || spent < 0.0 {
        bail!("--spent must be a non-negative number");
    }

    let evaluation = budget::evaluate(spent, budget_amount);

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        print!("{}", format_evaluation(&evaluation));
    }
    Ok(())
}

pub fn cmd_suggest(spent: f64, count: usize, json: bool) -> Result<()> {
    if !spent.is_finite() || spent < 0.0 {
        bail!("--spent must be a non-negative number");
    }

    let suggestion = budget::heuristic_suggestion(spent, count, SuggestionFallback::Unconfigured);

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestion)?);
    } else {
        print!("{}", format_suggestion(&suggestion));
    }
    Ok(())
}

pub fn format_evaluation(evaluation: &BudgetEvaluation) -> String {
    let mut out = format!("Spent:     ${:.2}\n", evaluation.total_spent);

    if let (Some(amount), Some(progress), Some(remaining)) = (
        evaluation.budget_amount,
        evaluation.progress_percent,
        evaluation.remaining,
    ) {
        out.push_str(&format!("Budget:    ${:.2}\n", amount));
        out.push_str(&format!("Progress:  {:.1}%\n", progress));
        out.push_str(&format!("Remaining: ${:.2}\n", remaining));
    }
    if let Some(label) = evaluation.status_label {
        out.push_str(&format!("Status:    {}\n", label));
    }

    out.push('\n');
    out.push_str(&evaluation.status_message);
    out.push('\n');
    out
}

pub fn format_suggestion(suggestion: &BudgetSuggestion) -> String {
    format!(
        "Suggested budget: ${:.2}\n{}\n",
        suggestion.suggestion, suggestion.reasoning
    )
}
