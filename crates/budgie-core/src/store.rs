//! In-memory expense record store
//!
//! The store is the single owner of all records for one session. Ids come
//! from a per-store monotonic counter shared by single and batch inserts, so
//! records created within the same instant never collide.

use chrono::Utc;

use crate::aggregate;
use crate::models::{
    normalize_description, Category, CategoryTotals, Expense, ExpenseId, ExpenseUpdate,
    NewExpense,
};

/// Ordered collection of expense records
#[derive(Debug, Clone)]
pub struct ExpenseStore {
    expenses: Vec<Expense>,
    next_id: u64,
}

impl Default for ExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self {
            expenses: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a record, assigning a fresh id and the current timestamp
    pub fn add(&mut self, expense: NewExpense) -> ExpenseId {
        let id = ExpenseId(self.next_id);
        self.next_id += 1;

        self.expenses.push(Expense {
            id,
            description: normalize_description(&expense.description),
            amount: sanitize_amount(expense.amount),
            category: expense.category,
            timestamp: Utc::now(),
        });

        id
    }

    /// Append several records in order, returning their ids
    pub fn add_many<I>(&mut self, expenses: I) -> Vec<ExpenseId>
    where
        I: IntoIterator<Item = NewExpense>,
    {
        expenses.into_iter().map(|e| self.add(e)).collect()
    }

    /// Remove a record by id, absent ids are a no-op
    pub fn remove(&mut self, id: ExpenseId) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| e.id == id)?;
        Some(self.expenses.remove(index))
    }

    /// Remove every record in a category, returning how many were removed
    pub fn remove_category(&mut self, category: Category) -> usize {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.category != category);
        before - self.expenses.len()
    }

    /// Merge fields into a record, absent ids are a no-op
    pub fn update(&mut self, id: ExpenseId, update: ExpenseUpdate) -> Option<&Expense> {
        let expense = self.expenses.iter_mut().find(|e| e.id == id)?;

        if let Some(description) = update.description {
            expense.description = normalize_description(&description);
        }
        if let Some(amount) = update.amount {
            expense.amount = sanitize_amount(amount);
        }
        if let Some(category) = update.category {
            expense.category = category;
        }

        Some(expense)
    }

    /// Empty the collection; ids keep counting up
    pub fn clear(&mut self) {
        self.expenses.clear();
    }

    /// Empty the collection and restart id assignment
    pub fn reset(&mut self) {
        self.expenses.clear();
        self.next_id = 1;
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Records in insertion order
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn total_spent(&self) -> f64 {
        aggregate::total_spent(&self.expenses)
    }

    pub fn category_totals(&self) -> CategoryTotals {
        aggregate::category_totals(&self.expenses)
    }
}

/// Amounts are non-negative and finite
fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}
