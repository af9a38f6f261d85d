//! Dashboard aggregation
//!
//! Pure functions over the in-memory transaction list. Stats are recomputed
//! from scratch on every call so displayed totals can never drift from the
//! stored transactions.

use crate::models::{CategoryTotal, DashboardStats, Transaction, TransactionKind};

/// Number of categories the presentation layer shows
pub const TOP_CATEGORIES_DISPLAY: usize = 5;

/// Sum of amounts for one kind
fn total_for(transactions: &[Transaction], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

/// Per-category expense totals, descending by total
///
/// Only EXPENSE transactions contribute. Categories are grouped by exact
/// string (case sensitive). Ties keep first-seen order: the sort is stable
/// and entries are created in discovery order.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for tx in transactions {
        if tx.kind != TransactionKind::Expense {
            continue;
        }
        match totals.iter_mut().find(|c| c.name == tx.category) {
            Some(entry) => entry.value += tx.amount,
            None => totals.push(CategoryTotal {
                name: tx.category.clone(),
                value: tx.amount,
            }),
        }
    }

    totals.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    totals
}

/// Compute dashboard stats from the full transaction list
///
/// The returned breakdown is complete; slicing to the display limit is the
/// presentation layer's job.
pub fn aggregate(transactions: &[Transaction]) -> DashboardStats {
    let total_income = total_for(transactions, TransactionKind::Income);
    let total_expense = total_for(transactions, TransactionKind::Expense);

    DashboardStats {
        total_income,
        total_expense,
        net_balance: total_income - total_expense,
        top_categories: category_breakdown(transactions),
    }
}
