//! Dashboard session state
//!
//! A reducer-style state machine owning the transaction list, the current
//! advice, and the transient processing status. All mutation funnels through
//! the action methods here, and every action belonging to an upload cycle
//! carries the generation token handed out by [`DashboardState::begin_upload`].
//! Stale tokens are ignored, so a response landing after a `clear` cannot
//! resurrect old results.

use serde::Serialize;

use crate::models::{FinancialAdvice, ProcessingStatus, Transaction};

/// User-facing message when extraction or advice fails
pub const MSG_PROCESS_FAILED: &str = "Failed to process file.";

/// User-facing message when the intake conversion fails
pub const MSG_READ_FAILED: &str = "Error reading file.";

/// Upload cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    ReadingFile,
    Extracting,
    Analyzing,
    Complete,
}

impl Phase {
    /// Status message shown while this phase is active
    pub fn message(&self) -> &'static str {
        match self {
            Phase::Idle | Phase::Complete => "",
            Phase::ReadingFile => "Reading file...",
            Phase::Extracting => "Extracting data points...",
            Phase::Analyzing => "Analyzing spending patterns...",
        }
    }

    fn is_processing(&self) -> bool {
        !matches!(self, Phase::Idle | Phase::Complete)
    }
}

/// Top-level application state for one dashboard session
#[derive(Debug)]
pub struct DashboardState {
    pub transactions: Vec<Transaction>,
    pub advice: Option<FinancialAdvice>,
    pub status: ProcessingStatus,
    pub phase: Phase,
    /// Monotonically increasing upload-cycle token
    generation: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            advice: None,
            status: ProcessingStatus::default(),
            phase: Phase::Idle,
            generation: 0,
        }
    }

    /// Current generation token
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    fn apply_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.status = ProcessingStatus {
            is_processing: phase.is_processing(),
            message: phase.message().to_string(),
            error: None,
        };
    }

    /// Start a new upload cycle and return its generation token
    ///
    /// Clears any prior error and enters ReadingFile.
    pub fn begin_upload(&mut self) -> u64 {
        self.generation += 1;
        self.apply_phase(Phase::ReadingFile);
        self.generation
    }

    /// Advance the cycle's phase; ignored if the token is stale
    pub fn set_phase(&mut self, generation: u64, phase: Phase) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.apply_phase(phase);
        true
    }

    /// Append newly extracted transactions; ignored if the token is stale
    ///
    /// Transactions accumulate across uploads; they are never replaced here.
    pub fn merge_transactions(&mut self, generation: u64, new: Vec<Transaction>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.transactions.extend(new);
        true
    }

    /// Replace the advice wholesale; ignored if the token is stale
    pub fn set_advice(&mut self, generation: u64, advice: FinancialAdvice) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.advice = Some(advice);
        true
    }

    /// Record a failed cycle; ignored if the token is stale
    ///
    /// Transactions already merged stay visible; only the failed step's
    /// output is abandoned.
    pub fn fail(&mut self, generation: u64, message: &str) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.phase = Phase::Idle;
        self.status = ProcessingStatus {
            is_processing: false,
            message: String::new(),
            error: Some(message.to_string()),
        };
        true
    }

    /// Reset the dashboard: empty transactions, no advice, back to Idle
    ///
    /// Bumps the generation so an in-flight upload's late results are
    /// discarded rather than merged into the cleared state.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.transactions.clear();
        self.advice = None;
        self.apply_phase(Phase::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use chrono::NaiveDate;

    fn tx(amount: f64) -> Transaction {
        Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            merchant: "m".into(),
            amount,
            category: "Food".into(),
            kind: TransactionKind::Expense,
            description: None,
        }
    }

    fn advice() -> FinancialAdvice {
        FinancialAdvice {
            summary: "s".into(),
            actionable_tips: vec![],
            savings_potential: 1.0,
        }
    }

    #[test]
    fn test_begin_upload_enters_reading() {
        let mut state = DashboardState::new();
        let gen = state.begin_upload();
        assert_eq!(gen, 1);
        assert_eq!(state.phase, Phase::ReadingFile);
        assert!(state.status.is_processing);
        assert_eq!(state.status.message, "Reading file...");
        assert!(state.status.error.is_none());
    }

    #[test]
    fn test_sequential_phases() {
        let mut state = DashboardState::new();
        let gen = state.begin_upload();

        assert!(state.set_phase(gen, Phase::Extracting));
        assert_eq!(state.status.message, "Extracting data points...");

        assert!(state.merge_transactions(gen, vec![tx(10.0)]));
        assert!(state.set_phase(gen, Phase::Analyzing));
        assert_eq!(state.status.message, "Analyzing spending patterns...");

        assert!(state.set_advice(gen, advice()));
        assert!(state.set_phase(gen, Phase::Complete));

        // Complete clears the message and stops processing
        assert!(!state.status.is_processing);
        assert!(state.status.message.is_empty());
        assert_eq!(state.transactions.len(), 1);
        assert!(state.advice.is_some());
    }

    #[test]
    fn test_fail_retains_merged_transactions() {
        let mut state = DashboardState::new();

        // First upload succeeds fully
        let gen = state.begin_upload();
        state.merge_transactions(gen, vec![tx(10.0)]);
        state.set_advice(gen, advice());
        state.set_phase(gen, Phase::Complete);

        // Second upload merges then fails at the advice step
        let gen = state.begin_upload();
        state.merge_transactions(gen, vec![tx(20.0)]);
        state.fail(gen, MSG_PROCESS_FAILED);

        assert_eq!(state.transactions.len(), 2);
        assert!(!state.status.is_processing);
        assert_eq!(state.status.error.as_deref(), Some(MSG_PROCESS_FAILED));
    }

    #[test]
    fn test_failed_extraction_leaves_list_unchanged() {
        let mut state = DashboardState::new();
        let gen = state.begin_upload();
        state.merge_transactions(gen, vec![tx(10.0)]);
        state.set_phase(gen, Phase::Complete);
        let before = state.transactions.len();

        let gen = state.begin_upload();
        state.fail(gen, MSG_PROCESS_FAILED);

        assert_eq!(state.transactions.len(), before);
        assert!(!state.status.is_processing);
        assert!(state.status.error.is_some());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut state = DashboardState::new();
        let gen = state.begin_upload();
        state.merge_transactions(gen, vec![tx(10.0)]);
        state.set_advice(gen, advice());

        state.clear();

        assert!(state.transactions.is_empty());
        assert!(state.advice.is_none());
        assert_eq!(state.phase, Phase::Idle);
        assert!(!state.status.is_processing);
        assert!(state.status.error.is_none());
    }

    #[test]
    fn test_clear_discards_stale_results() {
        let mut state = DashboardState::new();
        let gen = state.begin_upload();

        // User clears while the upload is still in flight
        state.clear();

        // The late results carry the old token and are ignored
        assert!(!state.merge_transactions(gen, vec![tx(10.0)]));
        assert!(!state.set_advice(gen, advice()));
        assert!(!state.set_phase(gen, Phase::Complete));
        assert!(!state.fail(gen, MSG_PROCESS_FAILED));

        assert!(state.transactions.is_empty());
        assert!(state.advice.is_none());
        assert_eq!(state.phase, Phase::Idle);
    }

    #[test]
    fn test_new_upload_supersedes_old_one() {
        let mut state = DashboardState::new();
        let old = state.begin_upload();
        let new = state.begin_upload();

        assert!(!state.merge_transactions(old, vec![tx(1.0)]));
        assert!(state.merge_transactions(new, vec![tx(2.0)]));
        assert_eq!(state.transactions.len(), 1);
    }
}
