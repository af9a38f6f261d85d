//! Dashboard view handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::{AppError, AppState};
use finsight_core::ai::BackendInfo;
use finsight_core::{
    aggregate, pipeline, DashboardStats, FinancialAdvice, ProcessingStatus, Transaction,
    TOP_CATEGORIES_DISPLAY,
};

/// Everything the single-page view renders
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub transactions: Vec<Transaction>,
    pub stats: DashboardStats,
    pub advice: Option<FinancialAdvice>,
    pub status: ProcessingStatus,
}

/// Build the view from the current session state
///
/// Stats are recomputed from scratch on every request; the category list is
/// sliced to the display limit here, not in the aggregator.
pub(crate) fn dashboard_view(state: &AppState) -> DashboardView {
    let guard = pipeline::lock(&state.session);

    let mut stats = aggregate(&guard.transactions);
    stats.top_categories.truncate(TOP_CATEGORIES_DISPLAY);

    DashboardView {
        transactions: guard.transactions.clone(),
        stats,
        advice: guard.advice.clone(),
        status: guard.status.clone(),
    }
}

/// GET /api/dashboard - Current dashboard state
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(dashboard_view(&state))
}

/// POST /api/clear - Reset transactions and advice
pub async fn clear_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    pipeline::lock(&state.session).clear();
    info!("Dashboard cleared");
    Json(dashboard_view(&state))
}

/// AI backend health response
#[derive(Debug, Serialize)]
pub struct AiHealthResponse {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendInfo>,
}

/// GET /api/ai/health - Backend configuration and reachability
pub async fn ai_health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AiHealthResponse>, AppError> {
    let backend = match &state.ai {
        Some(client) => Some(client.info().await),
        None => None,
    };

    Ok(Json(AiHealthResponse {
        configured: state.ai.is_some(),
        backend,
    }))
}
