//! Parsing helpers for AI provider responses
//!
//! Completion text often wraps the JSON payload in prose or markdown fences,
//! so each helper locates the payload before decoding it. Anything that
//! cannot be decoded is reported as `Error::MalformedResponse`.

use serde_json::Value;

use crate::budget::BudgetSuggestion;
use crate::error::{Error, Result};
use crate::models::{Category, NewExpense};

/// Maximum characters of raw model output carried in error messages
const RAW_PREVIEW_CHARS: usize = 200;

/// Truncate model output for logs and error messages
pub fn truncate_for_log(text: &str) -> String {
    if text.chars().count() > RAW_PREVIEW_CHARS {
        let preview: String = text.chars().take(RAW_PREVIEW_CHARS).collect();
        format!("{}...", preview)
    } else {
        text.to_string()
    }
}

/// Parse the expense list returned for a free-text message
///
/// Valid JSON that is not an array yields no expenses. Array items without a
/// description or a numeric amount are dropped.
pub fn parse_expense_list(response: &str) -> Result<Vec<NewExpense>> {
    let response = response.trim();

    let value = match serde_json::from_str::<Value>(response) {
        Ok(value) => value,
        Err(_) => extract_array(response)?,
    };

    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    Ok(items.iter().filter_map(expense_from_value).collect())
}

fn extract_array(response: &str) -> Result<Value> {
    let start = response.find('[');
    let end = response.rfind(']');

    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            serde_json::from_str(json_str).map_err(|e| {
                Error::MalformedResponse(format!(
                    "Invalid expense JSON from AI: {} | Raw: {}",
                    e,
                    truncate_for_log(json_str)
                ))
            })
        }
        _ => Err(Error::MalformedResponse(format!(
            "No JSON array found in AI response | Raw: {}",
            truncate_for_log(response)
        ))),
    }
}

fn expense_from_value(item: &Value) -> Option<NewExpense> {
    let description = item.get("description")?.as_str()?;
    let amount = item.get("amount").and_then(amount_from_value)?;
    let category = item
        .get("category")
        .and_then(Value::as_str)
        .map(Category::from_label)
        .unwrap_or_default();

    Some(NewExpense::new(description, amount, category))
}

/// Amounts occasionally come back as strings such as `"$12.50"`
fn amount_from_value(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_start_matches('$').parse().ok()?,
        _ => return None,
    };
    (amount.is_finite() && amount >= 0.0).then_some(amount)
}

/// Parse a `{suggestion, reasoning}` object from the suggestion prompt
pub fn parse_suggestion(response: &str) -> Result<BudgetSuggestion> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    let suggestion: BudgetSuggestion = match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            serde_json::from_str(json_str).map_err(|e| {
                Error::MalformedResponse(format!(
                    "Invalid suggestion JSON from AI: {} | Raw: {}",
                    e,
                    truncate_for_log(json_str)
                ))
            })?
        }
        _ => {
            return Err(Error::MalformedResponse(format!(
                "No JSON found in AI suggestion response | Raw: {}",
                truncate_for_log(response)
            )))
        }
    };

    if !suggestion.suggestion.is_finite() || suggestion.suggestion <= 0.0 {
        return Err(Error::MalformedResponse(format!(
            "Suggested budget must be a positive number, got {}",
            suggestion.suggestion
        )));
    }

    Ok(suggestion)
}

/// Advice is free text; only an empty completion is rejected
pub fn parse_advice(response: &str) -> Result<String> {
    let advice = response.trim();
    if advice.is_empty() {
        return Err(Error::MalformedResponse("Empty advice from AI".into()));
    }
    Ok(advice.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expense_list_plain_array() {
        let response = r#"[{"description": "lunch", "amount": 12, "category": "food"},
                           {"description": "uber", "amount": 18.5, "category": "transportation"}]"#;
        let expenses = parse_expense_list(response).unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0], NewExpense::new("lunch", 12.0, Category::Food));
        assert_eq!(expenses[1].amount, 18.5);
    }

    #[test]
    fn test_parse_expense_list_with_surrounding_text() {
        let response = "Here you go:\n```json\n[{\"description\": \"coffee\", \"amount\": 4.5, \"category\": \"food\"}]\n```";
        let expenses = parse_expense_list(response).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].description, "coffee");
    }

    #[test]
    fn test_parse_expense_list_non_array_is_empty() {
        let expenses = parse_expense_list(r#"{"description": "lunch", "amount": 12}"#).unwrap();
        assert!(expenses.is_empty());
    }

    #[test]
    fn test_parse_expense_list_drops_incomplete_items() {
        let response = r#"[{"description": "lunch"}, {"amount": 3},
                           {"description": "gas", "amount": "$40", "category": "Gasoline"}]"#;
        let expenses = parse_expense_list(response).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 40.0);
        assert_eq!(expenses[0].category, Category::Other);
    }

    #[test]
    fn test_parse_expense_list_malformed() {
        let err = parse_expense_list("I could not find any expenses.").unwrap_err();
        assert!(err.is_malformed());

        let err = parse_expense_list("[{description: lunch}]").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_suggestion() {
        let response = r#"Sure! {"suggestion": 1500, "reasoning": "Covers rent and food."}"#;
        let suggestion = parse_suggestion(response).unwrap();
        assert_eq!(suggestion.suggestion, 1500.0);
        assert_eq!(suggestion.reasoning, "Covers rent and food.");
    }

    #[test]
    fn test_parse_suggestion_rejects_bad_values() {
        assert!(parse_suggestion("around 1500 dollars").unwrap_err().is_malformed());
        assert!(parse_suggestion(r#"{"suggestion": -5, "reasoning": "x"}"#)
            .unwrap_err()
            .is_malformed());
        assert!(parse_suggestion(r#"{"suggestion": "lots", "reasoning": "x"}"#)
            .unwrap_err()
            .is_malformed());
    }

    #[test]
    fn test_parse_advice() {
        assert_eq!(parse_advice("  Spend less on coffee. \n").unwrap(), "Spend less on coffee.");
        assert!(parse_advice("   ").unwrap_err().is_malformed());
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        let text = "é".repeat(300);
        let truncated = truncate_for_log(&text);
        assert_eq!(truncated.chars().count(), RAW_PREVIEW_CHARS + 3);
        assert_eq!(truncate_for_log("short"), "short");
    }
}
