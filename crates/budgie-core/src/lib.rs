//! Budgie Core Library
//!
//! Shared functionality for the Budgie chat-style expense tracker:
//! - Expense records and the in-memory store
//! - Category aggregation and chart projections
//! - Budget evaluation and suggestion heuristics
//! - Free-text expense parsing (AI with a regex fallback)
//! - Pluggable AI backends (OpenAI chat completions, mock)
//! - Prompt library for customizable AI prompts

pub mod advisor;
pub mod aggregate;
pub mod ai;
pub mod budget;
pub mod chat;
pub mod error;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod session;
pub mod store;

/// Test utilities including mock chat-completions server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::BudgetAdvisor;
pub use ai::{AIBackend, AIClient, MockBackend, MockMode, OpenAIBackend, SpendingSnapshot};
pub use budget::{BudgetEvaluation, BudgetGoal, BudgetStatus, BudgetSuggestion};
pub use error::{Error, Result};
pub use models::{
    Category, CategoryGroup, CategoryShare, CategorySummary, CategoryTotals, Expense, ExpenseId,
    ExpenseUpdate, NewExpense, Spend,
};
pub use parser::{AiParser, ExpenseParser, FallbackParser, HeuristicParser};
pub use prompts::{Prompt, PromptId, PromptLibrary};
pub use session::{Session, SessionSummary};
pub use store::ExpenseStore;
