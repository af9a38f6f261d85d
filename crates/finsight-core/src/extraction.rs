//! Extraction client
//!
//! Runs a document through the AI backend and normalizes the raw items into
//! domain transactions: each gets a freshly generated identifier, a typed
//! date, and a coerced kind. Any transport or parse failure collapses into a
//! single `Error::Extraction`; the caller never retries.

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::ai::{AIBackend, AIClient, ExtractedTransaction};
use crate::error::{Error, Result};
use crate::intake::UploadedDocument;
use crate::models::{Transaction, TransactionKind};

/// Normalize a raw model item into a domain transaction
///
/// The type field is coerced with the exact-"INCOME" rule; an unparseable
/// date is a parse failure of the model output.
fn normalize(item: ExtractedTransaction) -> Result<Transaction> {
    let date = NaiveDate::parse_from_str(&item.date, "%Y-%m-%d")
        .map_err(|e| Error::Extraction(format!("bad date {:?} in model output: {}", item.date, e)))?;

    Ok(Transaction {
        id: Uuid::new_v4().to_string(),
        date,
        merchant: item.merchant,
        amount: item.amount,
        category: item.category,
        kind: TransactionKind::from_model_str(&item.kind),
        description: item.description,
    })
}

/// Extract transactions from an uploaded document
///
/// Returns an empty list for a document with no recognizable transactions.
pub async fn extract_transactions(
    ai: &AIClient,
    document: &UploadedDocument,
) -> Result<Vec<Transaction>> {
    let raw = ai
        .extract_transactions(document)
        .await
        .map_err(|e| Error::Extraction(e.to_string()))?;

    debug!(count = raw.len(), file = %document.name, "Model returned transaction items");

    raw.into_iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: &str) -> ExtractedTransaction {
        ExtractedTransaction {
            date: "2024-05-01".into(),
            merchant: "Shop".into(),
            amount: 9.99,
            category: "Misc".into(),
            kind: kind.into(),
            description: None,
        }
    }

    #[test]
    fn test_normalize_assigns_unique_ids() {
        let a = normalize(item("EXPENSE")).unwrap();
        let b = normalize(item("EXPENSE")).unwrap();
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
    }

    #[test]
    fn test_normalize_kind_coercion() {
        assert_eq!(normalize(item("INCOME")).unwrap().kind, TransactionKind::Income);
        assert_eq!(normalize(item("income")).unwrap().kind, TransactionKind::Expense);
        assert_eq!(normalize(item("EXPENSE")).unwrap().kind, TransactionKind::Expense);
        assert_eq!(normalize(item("REFUND")).unwrap().kind, TransactionKind::Expense);
    }

    #[test]
    fn test_normalize_parses_date() {
        let tx = normalize(item("EXPENSE")).unwrap();
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn test_normalize_rejects_bad_date() {
        let mut bad = item("EXPENSE");
        bad.date = "05/01/2024".into();
        assert!(matches!(normalize(bad), Err(Error::Extraction(_))));
    }

    #[tokio::test]
    async fn test_extract_with_mock() {
        let ai = AIClient::mock();
        let doc = UploadedDocument::from_bytes("r.jpg", "image/jpeg", b"img");
        let txs = extract_transactions(&ai, &doc).await.unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].kind, TransactionKind::Expense);
        assert_eq!(txs[1].kind, TransactionKind::Income);
    }

    #[tokio::test]
    async fn test_extract_failure_collapses_to_extraction_error() {
        let ai = AIClient::Mock(crate::ai::MockBackend::failing_extraction());
        let doc = UploadedDocument::from_bytes("r.jpg", "image/jpeg", b"img");
        let err = extract_transactions(&ai, &doc).await.unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[tokio::test]
    async fn test_extract_empty_is_ok() {
        let ai = AIClient::Mock(crate::ai::MockBackend::empty());
        let doc = UploadedDocument::from_bytes("blank.pdf", "application/pdf", b"%PDF");
        let txs = extract_transactions(&ai, &doc).await.unwrap();
        assert!(txs.is_empty());
    }
}
