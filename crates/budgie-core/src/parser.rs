//! Free-text expense parsing
//!
//! Two interchangeable strategies sit behind `ExpenseParser`:
//!
//! - `AiParser` asks the configured AI backend for a structured list
//! - `HeuristicParser` pulls the first dollar amount out of the text
//!
//! `FallbackParser` composes them: whatever goes wrong with the primary
//! (no credential, transport failure, unparsable output) is logged and the
//! secondary answers instead.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::ai::{AIBackend, AIClient};
use crate::error::{Error, Result};
use crate::models::{normalize_description, Category, NewExpense};

/// Optional `$`, digits, optional decimal fraction
const AMOUNT_PATTERN: &str = r"\$?([0-9]+\.?[0-9]*)";

fn amount_regex() -> &'static Regex {
    static AMOUNT: OnceLock<Regex> = OnceLock::new();
    AMOUNT.get_or_init(|| Regex::new(AMOUNT_PATTERN).expect("valid regex"))
}

/// Find the first amount-like token
///
/// Returns the amount and the text with that token removed, trimmed. Only the
/// first match is considered, and a token too large for an `f64` is no match.
pub fn extract_amount(text: &str) -> Option<(f64, String)> {
    let captures = amount_regex().captures(text)?;
    let token = captures.get(0)?;
    let digits = captures.get(1)?.as_str();

    let amount = digits
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())?;

    let mut remainder = String::with_capacity(text.len());
    remainder.push_str(&text[..token.start()]);
    remainder.push_str(&text[token.end()..]);

    Some((amount, remainder.trim().to_string()))
}

/// A strategy that turns a chat message into expense candidates
///
/// An empty list means "nothing recognizable", not an error.
#[async_trait]
pub trait ExpenseParser: Send + Sync {
    async fn parse(&self, text: &str) -> Result<Vec<NewExpense>>;

    /// Strategy name for logs
    fn name(&self) -> &'static str;
}

/// Regex-based parser used when AI is unavailable
///
/// Never infers a category and never returns more than one expense.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicParser;

impl HeuristicParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_text(&self, text: &str) -> Vec<NewExpense> {
        match extract_amount(text) {
            Some((amount, description)) => vec![NewExpense::new(
                normalize_description(&description),
                amount,
                Category::Other,
            )],
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl ExpenseParser for HeuristicParser {
    async fn parse(&self, text: &str) -> Result<Vec<NewExpense>> {
        Ok(self.parse_text(text))
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Parser backed by the AI provider
///
/// Without a client every call fails with `Error::NotConfigured`.
#[derive(Clone, Default)]
pub struct AiParser {
    client: Option<AIClient>,
}

impl AiParser {
    pub fn new(client: Option<AIClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExpenseParser for AiParser {
    async fn parse(&self, text: &str) -> Result<Vec<NewExpense>> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| Error::NotConfigured("OPENAI_API_KEY is not set".into()))?;
        client.parse_expenses(text).await
    }

    fn name(&self) -> &'static str {
        "ai"
    }
}

/// Try `primary`, fall through to `fallback` on any error
#[derive(Clone)]
pub struct FallbackParser<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackParser<P, F>
where
    P: ExpenseParser,
    F: ExpenseParser,
{
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl FallbackParser<AiParser, HeuristicParser> {
    /// AI first, heuristic on failure
    pub fn with_ai(client: Option<AIClient>) -> Self {
        Self::new(AiParser::new(client), HeuristicParser::new())
    }
}

#[async_trait]
impl<P, F> ExpenseParser for FallbackParser<P, F>
where
    P: ExpenseParser,
    F: ExpenseParser,
{
    async fn parse(&self, text: &str) -> Result<Vec<NewExpense>> {
        match self.primary.parse(text).await {
            Ok(expenses) => Ok(expenses),
            Err(e) => {
                if e.is_not_configured() {
                    debug!(
                        parser = self.primary.name(),
                        "AI not configured, using {}",
                        self.fallback.name()
                    );
                } else {
                    warn!(
                        parser = self.primary.name(),
                        error = %e,
                        "Expense parsing failed, using {}",
                        self.fallback.name()
                    );
                }
                self.fallback.parse(text).await
            }
        }
    }

    fn name(&self) -> &'static str {
        self.primary.name()
    }
}
