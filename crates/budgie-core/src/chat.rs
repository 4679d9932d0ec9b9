//! Bot replies for the chat-style entry box

use crate::models::Expense;

/// Reply when the message could not be processed at all
pub const ERROR_REPLY: &str = "Sorry, I had trouble processing your message. Please try again.";

/// Reply when nothing in the message looked like an expense
pub const NO_EXPENSE_REPLY: &str = "I couldn't find any expenses in that message. \
Try something like \"lunch 12\", \"lunch $12\", \"rent 2000\", \"groceries 85\" or \"coffee 4.50\".";

/// Confirmation message for the expenses a chat message produced
pub fn reply_for(expenses: &[Expense]) -> String {
    match expenses {
        [] => NO_EXPENSE_REPLY.to_string(),
        [expense] => format!(
            "Added expense: {} - ${:.2} ({})",
            expense.description, expense.amount, expense.category
        ),
        many => {
            let items = many
                .iter()
                .map(|e| format!("{} ${:.2}", e.description, e.amount))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Added {} expenses: {}", many.len(), items)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{Category, ExpenseId};

    fn expense(id: u64, description: &str, amount: f64, category: Category) -> Expense {
        Expense {
            id: ExpenseId(id),
            description: description.to_string(),
            amount,
            category,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_single_expense_reply() {
        let reply = reply_for(&[expense(1, "lunch", 12.0, Category::Food)]);
        assert_eq!(reply, "Added expense: lunch - $12.00 (food)");
    }

    #[test]
    fn test_multiple_expense_reply() {
        let reply = reply_for(&[
            expense(1, "lunch", 12.0, Category::Food),
            expense(2, "coffee", 4.5, Category::Food),
        ]);
        assert_eq!(reply, "Added 2 expenses: lunch $12.00, coffee $4.50");
    }

    #[test]
    fn test_empty_reply_lists_examples() {
        let reply = reply_for(&[]);
        assert!(reply.contains("coffee 4.50"));
        assert!(reply.contains("rent 2000"));
    }
}
