//! FinSight Core Library
//!
//! Shared functionality for the FinSight document-to-dashboard pipeline:
//! - Document intake (base64 payload handling)
//! - Pluggable AI backends (Gemini, OpenAI-compatible servers, mock)
//! - Prompt library for customizable model prompts
//! - Extraction normalization (ids, dates, income/expense coercion)
//! - Dashboard aggregation (totals, category breakdown)
//! - Advice generation from aggregated summaries
//! - Session state machine driving the upload pipeline

pub mod advice;
pub mod aggregate;
pub mod ai;
pub mod error;
pub mod extraction;
pub mod intake;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod session;

/// Test utilities including the mock generation API server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AIBackend, AIClient, BackendInfo, ExtractedTransaction, GeminiBackend, MockBackend,
    OpenAICompatibleBackend,
};
pub use aggregate::{aggregate, category_breakdown, TOP_CATEGORIES_DISPLAY};
pub use error::{Error, Result};
pub use intake::UploadedDocument;
pub use models::{
    CategoryTotal, DashboardStats, FinancialAdvice, ProcessingStatus, Transaction, TransactionKind,
};
pub use pipeline::{run_upload_cycle, shared_state, SharedState};
pub use prompts::{Prompt, PromptId, PromptLibrary};
pub use session::{DashboardState, Phase};
