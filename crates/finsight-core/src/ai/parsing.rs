//! JSON parsing helpers for AI backend responses
//!
//! These functions extract JSON from model responses, which often include
//! extra text or code fences before/after the JSON payload.

use crate::error::{Error, Result};
use crate::models::FinancialAdvice;

use super::types::ExtractedTransaction;

/// Truncate a raw response for inclusion in an error message
fn truncate(raw: &str) -> String {
    if raw.len() > 200 {
        format!("{}...", &raw[..200])
    } else {
        raw.to_string()
    }
}

/// Parse the transaction array from an extraction response
///
/// Empty response text yields an empty list rather than an error; a
/// document with no recognizable transactions is not a failure.
pub fn parse_transactions(response: &str) -> Result<Vec<ExtractedTransaction>> {
    let response = response.trim();

    if response.is_empty() {
        return Ok(Vec::new());
    }

    // Look for the JSON array, ignoring surrounding prose or fences
    let start = response.find('[');
    let end = response.rfind(']');

    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            serde_json::from_str(json_str).map_err(|e| {
                Error::InvalidData(format!(
                    "Invalid transaction JSON from model: {} | Raw: {}",
                    e,
                    truncate(json_str)
                ))
            })
        }
        _ => Err(Error::InvalidData(format!(
            "No JSON array found in extraction response | Raw: {}",
            truncate(response)
        ))),
    }
}

/// Parse financial advice from an advice response
pub fn parse_advice(response: &str) -> Result<FinancialAdvice> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            serde_json::from_str(json_str).map_err(|e| {
                Error::InvalidData(format!(
                    "Invalid advice JSON from model: {} | Raw: {}",
                    e,
                    truncate(json_str)
                ))
            })
        }
        _ => Err(Error::InvalidData(format!(
            "No JSON found in advice response | Raw: {}",
            truncate(response)
        ))),
    }
}
