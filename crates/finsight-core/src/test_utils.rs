//! Test utilities for finsight-core
//!
//! This module provides testing infrastructure including a mock generation
//! API server that speaks the Gemini `generateContent` wire format, for
//! development and integration tests without a real API credential.

use axum::{
    extract::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// Mock generation API server for testing and development
pub struct MockModelServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockModelServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/v1beta/models", get(handle_models))
            .route("/v1beta/models/:model_call", post(handle_generate));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockModelServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Model listing endpoint (health check)
async fn handle_models() -> Json<Value> {
    Json(json!({
        "models": [
            { "name": "models/gemini-2.5-flash" }
        ]
    }))
}

/// generateContent endpoint
///
/// Distinguishes extraction from advice by the response schema sent with
/// the request: extraction constrains an ARRAY, advice an OBJECT.
async fn handle_generate(Json(request): Json<Value>) -> Json<Value> {
    let schema_type = request
        .pointer("/generationConfig/responseSchema/type")
        .and_then(|t| t.as_str())
        .unwrap_or("");

    let text = if schema_type == "ARRAY" {
        mock_extraction_text()
    } else {
        mock_advice_text()
    };

    Json(json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": text }]
            }
        }]
    }))
}

fn mock_extraction_text() -> String {
    json!([
        {
            "date": "2024-01-15",
            "merchant": "Grocer",
            "amount": 42.5,
            "category": "Food",
            "type": "EXPENSE"
        },
        {
            "date": "2024-01-31",
            "merchant": "Acme Corp",
            "amount": 3000.0,
            "category": "Salary",
            "type": "INCOME",
            "description": "January payroll"
        }
    ])
    .to_string()
}

fn mock_advice_text() -> String {
    json!({
        "summary": "Spending is concentrated in food; income comfortably covers expenses.",
        "actionableTips": [
            "Plan meals for the week",
            "Move 10% of income to savings on payday",
            "Audit subscriptions quarterly"
        ],
        "savingsPotential": 180.0
    })
    .to_string()
}
