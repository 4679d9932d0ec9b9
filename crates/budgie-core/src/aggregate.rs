//! Read-only projections of the expense records
//!
//! Everything here is recomputed from scratch on each call. Nothing is
//! maintained incrementally, so deletes can never leave stale averages behind.

use std::collections::BTreeMap;

use crate::models::{
    Category, CategoryGroup, CategoryShare, CategorySummary, CategoryTotals, Expense, Spend,
};

/// Sum of all amounts, `0` for no records
pub fn total_spent<T: Spend>(expenses: &[T]) -> f64 {
    expenses.iter().map(Spend::amount).sum()
}

/// Group records or candidates by category into total, count and average
pub fn category_totals<T: Spend>(expenses: &[T]) -> CategoryTotals {
    let mut sums: BTreeMap<Category, (f64, usize)> = BTreeMap::new();

    for expense in expenses {
        let entry = sums.entry(expense.category()).or_insert((0.0, 0));
        entry.0 += expense.amount();
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(category, (total, count))| {
            (
                category,
                CategorySummary {
                    total,
                    count,
                    average: total / count as f64,
                },
            )
        })
        .collect()
}

/// Pie chart slices, sorted by category name
pub fn category_breakdown(totals: &CategoryTotals) -> Vec<CategoryShare> {
    let grand_total: f64 = totals.values().map(|s| s.total).sum();

    totals
        .iter()
        .map(|(category, summary)| CategoryShare {
            category: *category,
            total: summary.total,
            percent: percent_of(summary.total, grand_total),
        })
        .collect()
}

/// Records grouped by category; groups sorted by name, records kept in order
pub fn group_by_category(expenses: &[Expense]) -> Vec<CategoryGroup> {
    let totals = category_totals(expenses);

    totals
        .into_iter()
        .map(|(category, summary)| CategoryGroup {
            category,
            summary,
            expenses: expenses
                .iter()
                .filter(|e| e.category == category)
                .cloned()
                .collect(),
        })
        .collect()
}

/// `part / whole * 100`, or `0` when there is nothing to divide by
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
