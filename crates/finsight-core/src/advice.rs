//! Advice client
//!
//! Asks the AI backend for financial guidance. Only the aggregated summary
//! text travels to the model; raw transactions never do, keeping the request
//! small. An empty transaction list short-circuits to a fixed placeholder
//! without a network call.

use crate::aggregate::{aggregate, TOP_CATEGORIES_DISPLAY};
use crate::ai::{AIBackend, AIClient};
use crate::error::{Error, Result};
use crate::models::{FinancialAdvice, Transaction};

/// Advice shown before any documents have been analyzed
pub fn placeholder_advice() -> FinancialAdvice {
    FinancialAdvice {
        summary: "Upload documents to get analysis.".to_string(),
        actionable_tips: Vec::new(),
        savings_potential: 0.0,
    }
}

/// Render the compact summary text transmitted to the model
pub fn build_summary(transactions: &[Transaction]) -> String {
    let stats = aggregate(transactions);

    let top_categories = stats
        .top_categories
        .iter()
        .take(TOP_CATEGORIES_DISPLAY)
        .map(|c| format!("{} (₹{:.2})", c.name, c.value))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Total Income: ₹{:.2}\n\
         Total Expense: ₹{:.2}\n\
         Net Balance: ₹{:.2}\n\
         Top Spending Categories: {}",
        stats.total_income, stats.total_expense, stats.net_balance, top_categories
    )
}

/// Generate advice for the current transaction list
///
/// Empty list returns the placeholder without touching the backend. Any
/// backend failure collapses into `Error::Advice`; no retry, no partial
/// result.
pub async fn generate_advice(
    ai: &AIClient,
    transactions: &[Transaction],
) -> Result<FinancialAdvice> {
    if transactions.is_empty() {
        return Ok(placeholder_advice());
    }

    let summary = build_summary(transactions);

    ai.generate_advice(&summary)
        .await
        .map_err(|e| Error::Advice(e.to_string()))
}
