//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use budgie_core::budget;
use budgie_core::{BudgetSuggestion, Category, NewExpense, PromptId};

use crate::commands::{self, find_prompt_id, format_evaluation, format_expense_table, truncate};

// ========== Parse Command Tests ==========

#[tokio::test]
async fn test_cmd_parse_offline() {
    let result = commands::cmd_parse("lunch $12", true, false).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_parse_offline_json() {
    let result = commands::cmd_parse("groceries 85", true, true).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_parse_no_expenses() {
    let result = commands::cmd_parse("hello there", true, false).await;
    assert!(result.is_ok());
}

#[test]
fn test_format_expense_table() {
    let expenses = vec![
        NewExpense::new("lunch", 12.0, Category::Food),
        NewExpense::new("coffee", 4.5, Category::Food),
    ];

    let table = format_expense_table(&expenses);

    assert!(table.starts_with("DESCRIPTION"));
    assert!(table.contains("lunch"));
    assert!(table.contains("$12.00"));
    assert!(table.contains("$4.50"));
    assert!(table.contains("food"));
    assert!(table.lines().last().unwrap().contains("$16.50"));
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly ten", 11), "exactly ten");
    assert_eq!(truncate("a much longer description", 10), "a much ...");
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_evaluate() {
    assert!(commands::cmd_evaluate(95.0, Some(100.0), false).is_ok());
    assert!(commands::cmd_evaluate(95.0, None, true).is_ok());
}

#[test]
fn test_cmd_evaluate_rejects_negative_spend() {
    assert!(commands::cmd_evaluate(-1.0, Some(100.0), false).is_err());
    assert!(commands::cmd_evaluate(f64::NAN, Some(100.0), false).is_err());
}

#[test]
fn test_format_evaluation_with_budget() {
    let text = format_evaluation(&budget::evaluate(95.0, Some(100.0)));

    assert!(text.contains("Budget:    $100.00"));
    assert!(text.contains("Progress:  95.0%"));
    assert!(text.contains("Remaining: $5.00"));
    assert!(text.contains("Status:"));
}

#[test]
fn test_format_evaluation_without_budget() {
    let text = format_evaluation(&budget::evaluate(40.0, None));

    assert!(text.contains("Spent:     $40.00"));
    assert!(!text.contains("Budget:"));
    assert!(text.contains(budget::NO_BUDGET_MESSAGE));
}

#[test]
fn test_cmd_suggest() {
    assert!(commands::cmd_suggest(1000.0, 3, false).is_ok());
    assert!(commands::cmd_suggest(0.0, 0, true).is_ok());
    assert!(commands::cmd_suggest(-5.0, 1, false).is_err());
}

#[test]
fn test_format_suggestion() {
    let suggestion = BudgetSuggestion {
        suggestion: 1200.0,
        reasoning: "Room to breathe".to_string(),
    };

    assert_eq!(
        commands::format_suggestion(&suggestion),
        "Suggested budget: $1200.00\nRoom to breathe\n"
    );
}

// ========== Prompts Command Tests ==========

#[test]
fn test_find_prompt_id() {
    assert_eq!(find_prompt_id("parse_expenses"), Some(PromptId::ParseExpenses));
    assert_eq!(find_prompt_id("budget_advice"), Some(PromptId::BudgetAdvice));
    assert_eq!(
        find_prompt_id("budget_suggestion"),
        Some(PromptId::BudgetSuggestion)
    );
    assert_eq!(find_prompt_id("classify_merchant"), None);
}

#[test]
fn test_cmd_prompts_show_unknown_is_ok() {
    assert!(commands::cmd_prompts_show("nope").is_ok());
}

#[test]
fn test_cmd_prompts_path() {
    assert!(commands::cmd_prompts_path().is_ok());
}
