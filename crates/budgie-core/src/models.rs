//! Domain models for Budgie

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Label used when an expense arrives without a usable description
pub const DEFAULT_DESCRIPTION: &str = "Expense";

/// Fixed expense classification
///
/// Variants are declared alphabetically so the derived `Ord` sorts groups by
/// name, which is the order listings and chart slices are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Education,
    Entertainment,
    Food,
    Healthcare,
    #[default]
    Other,
    Shopping,
    Transportation,
    Travel,
    Utilities,
}

impl Category {
    /// The nine categories in the order they are presented to the model
    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transportation,
            Self::Entertainment,
            Self::Shopping,
            Self::Utilities,
            Self::Healthcare,
            Self::Education,
            Self::Travel,
            Self::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Entertainment => "entertainment",
            Self::Food => "food",
            Self::Healthcare => "healthcare",
            Self::Other => "other",
            Self::Shopping => "shopping",
            Self::Transportation => "transportation",
            Self::Travel => "travel",
            Self::Utilities => "utilities",
        }
    }

    /// Map any label onto the closed vocabulary, unknown labels become `Other`
    pub fn from_label(label: &str) -> Self {
        label.trim().parse().unwrap_or_default()
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "education" => Ok(Self::Education),
            "entertainment" => Ok(Self::Entertainment),
            "food" => Ok(Self::Food),
            "healthcare" => Ok(Self::Healthcare),
            "other" => Ok(Self::Other),
            "shopping" => Ok(Self::Shopping),
            "transportation" => Ok(Self::Transportation),
            "travel" => Ok(Self::Travel),
            "utilities" => Ok(Self::Utilities),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Category::from_label(&label))
    }
}

/// Accepts a missing or null category as `Other`
fn lenient_category<'de, D>(deserializer: D) -> std::result::Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.map(|l| Category::from_label(&l)).unwrap_or_default())
}

/// Opaque expense identifier, unique within one store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub u64);

impl std::fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A committed expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub timestamp: DateTime<Utc>,
}

/// An expense candidate before the store assigns id and timestamp
///
/// This is also the shape produced by every expense parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Category,
}

impl NewExpense {
    pub fn new(description: impl Into<String>, amount: f64, category: Category) -> Self {
        Self {
            description: description.into(),
            amount,
            category,
        }
    }
}

/// Anything that carries a spend amount in a category
pub trait Spend {
    fn amount(&self) -> f64;
    fn category(&self) -> Category;
}

impl Spend for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> Category {
        self.category
    }
}

impl Spend for NewExpense {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> Category {
        self.category
    }
}

/// Partial update applied to a stored expense
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category: Option<Category>,
}

/// Per-category aggregate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub total: f64,
    pub count: usize,
    pub average: f64,
}

/// Category name -> aggregate, derived from the records on every read
pub type CategoryTotals = BTreeMap<Category, CategorySummary>;

/// One pie chart slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub total: f64,
    /// Share of total spend, 0-100
    pub percent: f64,
}

/// Expenses of one category, for grouped listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub summary: CategorySummary,
    pub expenses: Vec<Expense>,
}

/// Normalize a free-text description, empty input gets the default label
pub fn normalize_description(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        DEFAULT_DESCRIPTION.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_labels() {
        for category in Category::all() {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), *category);
        }
        assert_eq!(Category::all().len(), 9);
    }

    #[test]
    fn test_category_from_label_is_lenient() {
        assert_eq!(Category::from_label("Food"), Category::Food);
        assert_eq!(Category::from_label(" TRAVEL "), Category::Travel);
        assert_eq!(Category::from_label("groceries"), Category::Other);
        assert_eq!(Category::from_label(""), Category::Other);
    }

    #[test]
    fn test_category_strict_parse_rejects_unknown() {
        assert!("groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_ordering_is_alphabetical() {
        let mut categories = Category::all().to_vec();
        categories.sort();
        let names: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_new_expense_deserialization_defaults() {
        let parsed: NewExpense =
            serde_json::from_str(r#"{"description": "lunch", "amount": 12.0, "category": "Food"}"#)
                .unwrap();
        assert_eq!(parsed.category, Category::Food);

        let parsed: NewExpense = serde_json::from_str(r#"{"amount": 3.5}"#).unwrap();
        assert_eq!(parsed.description, "");
        assert_eq!(parsed.category, Category::Other);

        let parsed: NewExpense =
            serde_json::from_str(r#"{"description": "x", "amount": 1, "category": null}"#).unwrap();
        assert_eq!(parsed.category, Category::Other);
    }

    #[test]
    fn test_category_totals_json_keys() {
        let mut totals = CategoryTotals::new();
        totals.insert(
            Category::Food,
            CategorySummary {
                total: 10.0,
                count: 2,
                average: 5.0,
            },
        );
        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json["food"]["count"], 2);

        let back: CategoryTotals = serde_json::from_value(json).unwrap();
        assert_eq!(back[&Category::Food].total, 10.0);
    }

    #[test]
    fn test_normalize_description() {
        assert_eq!(normalize_description("  lunch "), "lunch");
        assert_eq!(normalize_description("   "), DEFAULT_DESCRIPTION);
    }
}
