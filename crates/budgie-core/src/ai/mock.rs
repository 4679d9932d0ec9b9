//! Mock backend for testing
//!
//! Produces deterministic completions without a network. Responses are built
//! as raw completion text and decoded with the same parsing helpers the real
//! backend uses, so failure modes exercise the real error paths.

use async_trait::async_trait;
use serde_json::json;

use crate::budget::BudgetSuggestion;
use crate::error::{Error, Result};
use crate::models::{Category, NewExpense};
use crate::parser::extract_amount;

use super::parsing::{parse_advice, parse_expense_list, parse_suggestion};
use super::types::SpendingSnapshot;
use super::AIBackend;

/// How the mock answers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MockMode {
    /// Well-formed completions
    #[default]
    Normal,
    /// Completions that are not in the expected shape
    Malformed,
    /// Every call fails as if the provider were unreachable
    Unavailable,
}

/// Mock AI backend for testing
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    pub mode: MockMode,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            mode: MockMode::Normal,
        }
    }

    /// Answers every request with unparsable text
    pub fn malformed() -> Self {
        Self {
            healthy: true,
            mode: MockMode::Malformed,
        }
    }

    /// Fails every request with a provider error
    pub fn unavailable() -> Self {
        Self {
            healthy: false,
            mode: MockMode::Unavailable,
        }
    }

    fn check_available(&self) -> Result<()> {
        match self.mode {
            MockMode::Unavailable => Err(Error::Provider("mock provider unavailable".into())),
            _ => Ok(()),
        }
    }
}

/// Keyword-based category guess
fn infer_category(description: &str) -> Category {
    let lower = description.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["lunch", "dinner", "breakfast", "coffee", "grocer", "food", "pizza", "bagel"]) {
        Category::Food
    } else if has(&["gas", "uber", "lyft", "taxi", "bus", "train", "parking"]) {
        Category::Transportation
    } else if has(&["movie", "concert", "netflix", "game", "spotify"]) {
        Category::Entertainment
    } else if has(&["shirt", "shoes", "amazon", "clothes"]) {
        Category::Shopping
    } else if has(&["rent", "electric", "water", "internet", "phone"]) {
        Category::Utilities
    } else if has(&["doctor", "pharmacy", "medicine", "dentist"]) {
        Category::Healthcare
    } else if has(&["book", "course", "tuition", "class"]) {
        Category::Education
    } else if has(&["flight", "hotel", "airbnb", "vacation"]) {
        Category::Travel
    } else {
        Category::Other
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn parse_expenses(&self, text: &str) -> Result<Vec<NewExpense>> {
        self.check_available()?;

        let response = match self.mode {
            MockMode::Malformed => "Sorry, I can't help with that.".to_string(),
            _ => {
                let items: Vec<_> = text
                    .split([',', ';'])
                    .flat_map(|part| part.split(" and "))
                    .filter_map(extract_amount)
                    .map(|(amount, description)| {
                        let category = infer_category(&description);
                        json!({
                            "description": description,
                            "amount": amount,
                            "category": category,
                        })
                    })
                    .collect();
                serde_json::Value::Array(items).to_string()
            }
        };

        parse_expense_list(&response)
    }

    async fn budget_advice(&self, snapshot: &SpendingSnapshot) -> Result<String> {
        self.check_available()?;

        let response = match (self.mode, snapshot.top_category()) {
            (MockMode::Malformed, _) => String::new(),
            (_, Some((category, total))) => format!(
                "Your largest category is {} at ${:.2}. Try trimming it by 10% next month.",
                category, total
            ),
            (_, None) => "Keep tracking your spending to see where your money goes.".to_string(),
        };

        parse_advice(&response)
    }

    async fn suggest_budget(&self, snapshot: &SpendingSnapshot) -> Result<BudgetSuggestion> {
        self.check_available()?;

        let response = match self.mode {
            MockMode::Malformed => "I'd suggest about fifteen hundred dollars.".to_string(),
            _ => {
                let suggestion = (snapshot.total_spent() * 110.0 / 100.0).ceil().max(1.0);
                json!({
                    "suggestion": suggestion,
                    "reasoning": format!(
                        "Covers your current spending across {} categories with a 10% cushion.",
                        snapshot.category_count()
                    ),
                })
                .to_string()
            }
        };

        parse_suggestion(&response)
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SpendingSnapshot {
        SpendingSnapshot {
            expenses: vec![
                NewExpense::new("rent", 900.0, Category::Utilities),
                NewExpense::new("lunch", 100.0, Category::Food),
            ],
            category_totals: None,
        }
    }

    #[tokio::test]
    async fn test_parse_multiple_expenses() {
        let mock = MockBackend::new();
        let parsed = mock
            .parse_expenses("coffee 4.50 and movie $12; parking 8")
            .await
            .unwrap();

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], NewExpense::new("coffee", 4.5, Category::Food));
        assert_eq!(parsed[1].category, Category::Entertainment);
        assert_eq!(parsed[2].category, Category::Transportation);
    }

    #[tokio::test]
    async fn test_parse_without_amount_is_empty() {
        let parsed = MockBackend::new().parse_expenses("hello there").await.unwrap();
        assert!(parsed.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_mode() {
        let mock = MockBackend::malformed();
        assert!(mock.parse_expenses("lunch 12").await.unwrap_err().is_malformed());
        assert!(mock.budget_advice(&snapshot()).await.unwrap_err().is_malformed());
        assert!(mock.suggest_budget(&snapshot()).await.unwrap_err().is_malformed());
    }

    #[tokio::test]
    async fn test_unavailable_mode() {
        let mock = MockBackend::unavailable();
        let err = mock.parse_expenses("lunch 12").await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert!(!mock.health_check().await);
    }

    #[tokio::test]
    async fn test_advice_names_top_category() {
        let advice = MockBackend::new().budget_advice(&snapshot()).await.unwrap();
        assert!(advice.contains("utilities at $900.00"));
    }

    #[tokio::test]
    async fn test_suggestion_adds_cushion() {
        let suggestion = MockBackend::new().suggest_budget(&snapshot()).await.unwrap();
        assert_eq!(suggestion.suggestion, 1100.0);
    }

    #[test]
    fn test_infer_category() {
        assert_eq!(infer_category("Groceries"), Category::Food);
        assert_eq!(infer_category("flight to NYC"), Category::Travel);
        assert_eq!(infer_category("mystery"), Category::Other);
    }
}
