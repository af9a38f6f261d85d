//! Document upload handler

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::{info, warn};

use crate::{AppError, AppState};
use finsight_core::{run_upload_cycle, UploadedDocument};

use super::dashboard::{dashboard_view, DashboardView};

/// POST /api/documents - Upload one document and run the full cycle
///
/// Only the first file field is processed; additional files in the same
/// request are ignored. The pipeline's outcome (including a failed cycle)
/// is reflected in the returned dashboard status rather than an HTTP error,
/// so the view always has a coherent state to render.
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<DashboardView>, AppError> {
    let ai = state.ai.clone().ok_or_else(|| {
        AppError::service_unavailable(
            "AI backend not configured. Set GEMINI_API_KEY (or AI_BACKEND).",
        )
    })?;

    let mut document: Option<UploadedDocument> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::bad_request("Invalid multipart request body"))?
    {
        if field.file_name().is_none() {
            continue;
        }

        if document.is_some() {
            // One file per invocation; extras are dropped
            warn!(
                field = field.name().unwrap_or("?"),
                "Ignoring additional file in upload"
            );
            continue;
        }

        let name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = field.bytes().await.map_err(|_| {
            AppError::bad_request("Invalid request body or file too large (max 10MB)")
        })?;

        if bytes.is_empty() {
            return Err(AppError::bad_request("No document data provided"));
        }

        info!(file = %name, mime = %mime_type, size = bytes.len(), "Document received");
        document = Some(UploadedDocument::from_bytes(&name, &mime_type, &bytes));
    }

    let document =
        document.ok_or_else(|| AppError::bad_request("No file field in upload request"))?;

    // Failures are already absorbed into the session status by the pipeline's
    // error boundary; the view carries the error banner.
    let _ = run_upload_cycle(&ai, &state.session, document).await;

    Ok(Json(dashboard_view(&state)))
}
