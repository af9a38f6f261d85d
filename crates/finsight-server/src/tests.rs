//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use finsight_core::ai::MockBackend;
use finsight_core::AIClient;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn setup_test_app(ai: Option<AIClient>) -> Router {
    create_router(ai, None, ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

const BOUNDARY: &str = "FinSightTestBoundary";

/// Build a multipart body with the given file parts
fn multipart_body(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (filename, content) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: image/jpeg\r\n\r\n",
                BOUNDARY, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(files: &[(&str, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/documents")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(files)))
        .unwrap()
}

// ========== Dashboard Tests ==========

#[tokio::test]
async fn test_empty_dashboard() {
    let app = setup_test_app(Some(AIClient::mock()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json["transactions"].as_array().unwrap().is_empty());
    assert!(json["advice"].is_null());
    assert_eq!(json["stats"]["totalIncome"], 0.0);
    assert_eq!(json["stats"]["netBalance"], 0.0);
    assert_eq!(json["status"]["isProcessing"], false);
}

#[tokio::test]
async fn test_upload_document() {
    let app = setup_test_app(Some(AIClient::mock()));

    let response = app
        .oneshot(upload_request(&[("receipt.jpg", b"fake image")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let transactions = json["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert!(json["advice"].is_object());
    assert_eq!(json["status"]["isProcessing"], false);
    assert!(json["status"].get("error").is_none());

    // Mock data: 3000 income, 42.5 expense
    assert_eq!(json["stats"]["totalIncome"], 3000.0);
    assert_eq!(json["stats"]["totalExpense"], 42.5);
    assert_eq!(json["stats"]["topCategories"][0]["name"], "Groceries");
}

#[tokio::test]
async fn test_upload_accumulates_across_requests() {
    let app = setup_test_app(Some(AIClient::mock()));

    let response = app
        .clone()
        .oneshot(upload_request(&[("one.jpg", b"a")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(upload_request(&[("two.jpg", b"b")]))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["transactions"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_upload_ignores_additional_files() {
    let app = setup_test_app(Some(AIClient::mock()));

    let response = app
        .oneshot(upload_request(&[
            ("first.jpg", b"a"),
            ("second.jpg", b"b"),
            ("third.jpg", b"c"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // One pipeline run, not three
    let json = get_body_json(response).await;
    assert_eq!(json["transactions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_upload_advice_failure_keeps_transactions() {
    let app = setup_test_app(Some(AIClient::Mock(MockBackend::failing_advice())));

    let response = app
        .oneshot(upload_request(&[("receipt.jpg", b"fake image")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    // Partial commit: extraction landed, advice did not
    assert_eq!(json["transactions"].as_array().unwrap().len(), 2);
    assert!(json["advice"].is_null());
    assert_eq!(json["status"]["error"], "Failed to process file.");
    assert_eq!(json["status"]["isProcessing"], false);
}

#[tokio::test]
async fn test_upload_extraction_failure_sets_error() {
    let app = setup_test_app(Some(AIClient::Mock(MockBackend::failing_extraction())));

    let response = app
        .oneshot(upload_request(&[("receipt.jpg", b"fake image")]))
        .await
        .unwrap();

    let json = get_body_json(response).await;
    assert!(json["transactions"].as_array().unwrap().is_empty());
    assert_eq!(json["status"]["error"], "Failed to process file.");
}

#[tokio::test]
async fn test_upload_without_backend_is_unavailable() {
    let app = setup_test_app(None);

    let response = app
        .oneshot(upload_request(&[("receipt.jpg", b"fake image")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = setup_test_app(Some(AIClient::mock()));

    let response = app.oneshot(upload_request(&[])).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_clear_resets_dashboard() {
    let app = setup_test_app(Some(AIClient::mock()));

    let response = app
        .clone()
        .oneshot(upload_request(&[("receipt.jpg", b"fake image")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json["transactions"].as_array().unwrap().is_empty());
    assert!(json["advice"].is_null());
    assert_eq!(json["stats"]["totalExpense"], 0.0);
}

// ========== AI Health Tests ==========

#[tokio::test]
async fn test_ai_health_configured() {
    let app = setup_test_app(Some(AIClient::mock()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ai/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["configured"], true);
    assert_eq!(json["backend"]["model"], "mock");
    assert_eq!(json["backend"]["reachable"], true);
}

#[tokio::test]
async fn test_ai_health_unconfigured() {
    let app = setup_test_app(None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/ai/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = get_body_json(response).await;
    assert_eq!(json["configured"], false);
    assert!(json.get("backend").is_none());
}

// ========== Header Tests ==========

#[tokio::test]
async fn test_security_headers_present() {
    let app = setup_test_app(Some(AIClient::mock()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("content-security-policy").is_some());
}
