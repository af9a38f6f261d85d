//! Upload pipeline
//!
//! One uploaded document drives one linear chain of awaited stages:
//! read → extract → merge → advise → complete. Stages run strictly in
//! sequence, shared state is touched only at stage boundaries, and a single
//! error boundary maps failures to the user-facing messages. There is no
//! retry, no timeout, and no cancellation of in-flight model calls; a
//! `clear` during a cycle only invalidates the cycle's generation token.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, info};

use crate::advice;
use crate::ai::AIClient;
use crate::error::{Error, Result};
use crate::extraction;
use crate::intake::UploadedDocument;
use crate::models::Transaction;
use crate::session::{DashboardState, Phase, MSG_PROCESS_FAILED, MSG_READ_FAILED};

/// Shared handle to the single owning session state
pub type SharedState = Arc<Mutex<DashboardState>>;

/// Create a fresh shared session state
pub fn shared_state() -> SharedState {
    Arc::new(Mutex::new(DashboardState::new()))
}

/// Lock the state, recovering from a poisoned mutex
///
/// State updates are plain field writes; a panic mid-update cannot leave the
/// reducer in a torn state worth dying over.
pub fn lock(state: &SharedState) -> std::sync::MutexGuard<'_, DashboardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The user-visible message for a failed cycle
fn user_message(err: &Error) -> &'static str {
    match err {
        Error::FileRead(_) => MSG_READ_FAILED,
        _ => MSG_PROCESS_FAILED,
    }
}

/// Run one full upload cycle against the shared state
///
/// Returns the error that ended the cycle, if any; the state has already
/// absorbed it (error banner set, merged transactions retained).
pub async fn run_upload_cycle(
    ai: &AIClient,
    state: &SharedState,
    document: UploadedDocument,
) -> Result<()> {
    let generation = lock(state).begin_upload();

    match drive(ai, state, generation, &document).await {
        Ok(()) => {
            info!(file = %document.name, "Upload cycle complete");
            Ok(())
        }
        Err(e) => {
            // The cause is logged for diagnostics; the user sees only the
            // generic message.
            error!(error = %e, file = %document.name, "Upload cycle failed");
            lock(state).fail(generation, user_message(&e));
            Err(e)
        }
    }
}

async fn drive(
    ai: &AIClient,
    state: &SharedState,
    generation: u64,
    document: &UploadedDocument,
) -> Result<()> {
    // ReadingFile: the payload must decode before anything is transmitted
    document.decode()?;

    lock(state).set_phase(generation, Phase::Extracting);
    let extracted = extraction::extract_transactions(ai, document).await?;

    // Merge before the advice step: a later advice failure must not roll
    // these back.
    let merged: Vec<Transaction> = {
        let mut guard = lock(state);
        guard.merge_transactions(generation, extracted);
        guard.transactions.clone()
    };

    // Extraction yielding zero transactions still proceeds to advice
    lock(state).set_phase(generation, Phase::Analyzing);
    let new_advice = advice::generate_advice(ai, &merged).await?;

    let mut guard = lock(state);
    guard.set_advice(generation, new_advice);
    guard.set_phase(generation, Phase::Complete);

    Ok(())
}
