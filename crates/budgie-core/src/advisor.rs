//! AI-assisted operations with local degradation
//!
//! `BudgetAdvisor` is what the HTTP and CLI layers call. It decides, per
//! operation, what happens when the provider is missing or misbehaves:
//!
//! | Operation  | Unconfigured         | Malformed output     | Transport failure |
//! |------------|----------------------|----------------------|-------------------|
//! | parse      | heuristic parser     | heuristic parser     | heuristic parser  |
//! | advice     | `NotConfigured` err  | error                | error             |
//! | suggestion | spend × 1.20         | spend × 1.15         | error             |

use tracing::{info, warn};

use crate::ai::parsing::truncate_for_log;
use crate::ai::{AIBackend, AIClient, SpendingSnapshot};
use crate::budget::{self, BudgetSuggestion, SuggestionFallback};
use crate::error::{Error, Result};
use crate::models::NewExpense;
use crate::parser::{AiParser, ExpenseParser, FallbackParser, HeuristicParser};

/// Advice returned when there is nothing to analyze yet
pub const EMPTY_ADVICE_MESSAGE: &str =
    "Start tracking your expenses to get personalized budget advice!";

/// Entry point for parsing, advice and budget suggestions
#[derive(Clone)]
pub struct BudgetAdvisor {
    ai: Option<AIClient>,
    parser: FallbackParser<AiParser, HeuristicParser>,
}

impl BudgetAdvisor {
    /// `None` means no provider credential is configured
    pub fn new(ai: Option<AIClient>) -> Self {
        Self {
            parser: FallbackParser::with_ai(ai.clone()),
            ai,
        }
    }

    pub fn from_env() -> Self {
        Self::new(AIClient::from_env())
    }

    /// Heuristics only
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    /// Parse a chat message into expense candidates
    ///
    /// Never fails because of the provider; the heuristic answers instead.
    pub async fn parse_expenses(&self, text: &str) -> Result<Vec<NewExpense>> {
        self.parser.parse(text).await
    }

    /// Free-text advice about the given spending
    ///
    /// Fails with `Error::NotConfigured` when there is no provider, even for
    /// an empty snapshot, and with `Error::InvalidData` for negative amounts.
    pub async fn budget_advice(&self, snapshot: &SpendingSnapshot) -> Result<String> {
        snapshot.validate()?;

        let client = self
            .ai
            .as_ref()
            .ok_or_else(|| Error::NotConfigured("OPENAI_API_KEY is not set".into()))?;

        if snapshot.is_empty() {
            return Ok(EMPTY_ADVICE_MESSAGE.to_string());
        }

        client.budget_advice(snapshot).await.inspect_err(|e| {
            warn!(error = %truncate_for_log(&e.to_string()), "Budget advice request failed");
        })
    }

    /// Recommend a monthly budget
    ///
    /// An empty snapshot always gets the fixed default. Negative amounts are
    /// rejected with `Error::InvalidData`. Transport and provider errors are
    /// returned to the caller.
    pub async fn suggest_budget(&self, snapshot: &SpendingSnapshot) -> Result<BudgetSuggestion> {
        snapshot.validate()?;

        if snapshot.is_empty() {
            return Ok(budget::default_suggestion());
        }

        let total = snapshot.total_spent();
        let count = snapshot.expenses.len();

        let Some(client) = self.ai.as_ref() else {
            info!(total, "AI not configured, using heuristic budget suggestion");
            return Ok(budget::heuristic_suggestion(
                total,
                count,
                SuggestionFallback::Unconfigured,
            ));
        };

        match client.suggest_budget(snapshot).await {
            Ok(suggestion) => Ok(suggestion),
            Err(e) if e.is_malformed() => {
                warn!(error = %e, "Unparsable budget suggestion, using heuristic");
                Ok(budget::heuristic_suggestion(
                    total,
                    count,
                    SuggestionFallback::MalformedResponse,
                ))
            }
            Err(e) => {
                warn!(error = %e, "Budget suggestion request failed");
                Err(e)
            }
        }
    }
}
