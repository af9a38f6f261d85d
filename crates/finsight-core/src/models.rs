//! Domain models for FinSight

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Income/expense classification of a transaction
///
/// The sign of a transaction is carried here, never by a negative amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    /// Coerce a model-returned type string into a kind.
    ///
    /// Only the exact string "INCOME" maps to Income; everything else
    /// (including lowercase "income") falls back to Expense. This matches
    /// the strict enum sent in the response schema.
    pub fn from_model_str(s: &str) -> Self {
        if s == "INCOME" {
            Self::Income
        } else {
            Self::Expense
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A financial transaction extracted from an uploaded document
///
/// Immutable after creation; removed only by clearing the whole list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque unique identifier assigned at extraction time
    pub id: String,
    pub date: NaiveDate,
    pub merchant: String,
    /// Always >= 0; direction is carried by `kind`
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Free-text financial guidance generated from aggregated data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAdvice {
    pub summary: String,
    pub actionable_tips: Vec<String>,
    /// Estimated monthly savings if the tips are followed; >= 0
    pub savings_potential: f64,
}

/// Per-category expense total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: f64,
}

/// Derived dashboard statistics
///
/// Recomputed from scratch on every aggregation, never mutated
/// incrementally. `top_categories` holds the full breakdown; presentation
/// slices it to the display limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
    pub top_categories: Vec<CategoryTotal>,
}

/// Transient processing state shown to the user during an upload cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStatus {
    pub is_processing: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
