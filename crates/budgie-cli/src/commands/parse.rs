//! Parse command implementation

use anyhow::Result;
use budgie_core::{chat, BudgetAdvisor, NewExpense};

use super::truncate;

pub async fn cmd_parse(text: &str, offline: bool, json: bool) -> Result<()> {
    let advisor = if offline {
        BudgetAdvisor::offline()
    } else {
        BudgetAdvisor::from_env()
    };

    let expenses = advisor.parse_expenses(text).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&expenses)?);
        return Ok(());
    }

    if expenses.is_empty() {
        println!("{}", chat::NO_EXPENSE_REPLY);
        return Ok(());
    }

    print!("{}", format_expense_table(&expenses));
    Ok(())
}

/// Render parsed expenses as an aligned table with a total row
pub fn format_expense_table(expenses: &[NewExpense]) -> String {
    let mut out = format!("{:<30} {:>10}  {}\n", "DESCRIPTION", "AMOUNT", "CATEGORY");
    out.push_str(&"-".repeat(56));
    out.push('\n');

    for expense in expenses {
        out.push_str(&format!(
            "{:<30} {:>10}  {}\n",
            truncate(&expense.description, 30),
            format!("${:.2}", expense.amount),
            expense.category
        ));
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    out.push_str(&format!("{:<30} {:>10}\n", "TOTAL", format!("${:.2}", total)));
    out
}
