//! AI backend response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};

/// A transaction item as returned by the model, before normalization
///
/// `normalize` in the extraction layer turns these into domain
/// [`Transaction`](crate::models::Transaction)s (fresh id, typed date,
/// coerced kind).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedTransaction {
    pub date: String,
    pub merchant: String,
    pub amount: f64,
    pub category: String,
    /// "INCOME" or "EXPENSE" per the response schema; coerced leniently
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Health/identity snapshot of the configured backend, for display
#[derive(Debug, Clone, Serialize)]
pub struct BackendInfo {
    pub model: String,
    pub host: String,
    pub reachable: bool,
}
