//! Mock backend for testing
//!
//! Provides predictable responses for both AI operations without a network.
//! Useful for unit tests and development without an API credential.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::intake::UploadedDocument;
use crate::models::FinancialAdvice;

use super::types::ExtractedTransaction;
use super::AIBackend;

/// Mock AI backend for testing
///
/// Returns a fixed pair of transactions for any document and advice derived
/// from the summary text it receives. Can be configured to fail either
/// operation to exercise error paths.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// When set, extract_transactions fails
    pub fail_extraction: bool,
    /// When set, generate_advice fails
    pub fail_advice: bool,
    /// When set, extract_transactions returns no transactions
    pub empty_extraction: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Default::default()
        }
    }

    /// Mock whose extraction call fails
    pub fn failing_extraction() -> Self {
        Self {
            healthy: true,
            fail_extraction: true,
            ..Default::default()
        }
    }

    /// Mock whose advice call fails
    pub fn failing_advice() -> Self {
        Self {
            healthy: true,
            fail_advice: true,
            ..Default::default()
        }
    }

    /// Mock that extracts zero transactions
    pub fn empty() -> Self {
        Self {
            healthy: true,
            empty_extraction: true,
            ..Default::default()
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn extract_transactions(
        &self,
        document: &UploadedDocument,
    ) -> Result<Vec<ExtractedTransaction>> {
        if self.fail_extraction {
            return Err(Error::InvalidData("mock extraction failure".into()));
        }
        if self.empty_extraction {
            return Ok(Vec::new());
        }

        Ok(vec![
            ExtractedTransaction {
                date: "2024-01-15".to_string(),
                merchant: "Mock Store".to_string(),
                amount: 42.50,
                category: "Groceries".to_string(),
                kind: "EXPENSE".to_string(),
                description: Some(format!("from {}", document.name)),
            },
            ExtractedTransaction {
                date: "2024-01-31".to_string(),
                merchant: "Acme Corp".to_string(),
                amount: 3000.0,
                category: "Salary".to_string(),
                kind: "INCOME".to_string(),
                description: None,
            },
        ])
    }

    async fn generate_advice(&self, summary: &str) -> Result<FinancialAdvice> {
        if self.fail_advice {
            return Err(Error::InvalidData("mock advice failure".into()));
        }

        Ok(FinancialAdvice {
            summary: format!("Mock analysis of: {}", summary.lines().count()),
            actionable_tips: vec![
                "Cook at home more often".to_string(),
                "Review recurring charges".to_string(),
                "Set a weekly budget".to_string(),
            ],
            savings_potential: 150.0,
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
