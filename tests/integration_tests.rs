//! Integration tests for the uploader component and the HTTP host

use std::env;
use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::IntoResponse,
};
use pdfgate::{
    config::Config,
    error::AppError,
    handlers::{create_router, AppState},
    models::{ByteSource, UploadCandidate},
    services::{PdfUploader, UploaderState},
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

const BOUNDARY: &str = "pdfgate-test-boundary";

/// A source whose read never completes.
struct StalledSource;

#[async_trait]
impl ByteSource for StalledSource {
    async fn read_prefix(&self, _limit: usize) -> std::io::Result<Vec<u8>> {
        std::future::pending().await
    }
}

fn pdf_candidate(name: &str) -> UploadCandidate {
    let mut content = b"%PDF-1.4\n".to_vec();
    content.resize(1024, b' ');
    UploadCandidate::from_bytes(name, "application/pdf", content)
}

fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 8080,
        max_file_size_bytes: 10 * 1024 * 1024,
        accepted_file_types: vec![".pdf".to_string(), "pdf".to_string()],
        show_preview: true,
        success_display_ms: 2000,
        request_timeout_seconds: 30,
    }
}

fn multipart_body(file_name: &str, mime: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    write!(
        body,
        "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
        BOUNDARY, file_name, mime
    )
    .unwrap();
    body.extend_from_slice(content);
    write!(body, "\r\n--{}--\r\n", BOUNDARY).unwrap();
    body
}

fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_config_loading() {
    env::remove_var("SERVER_HOST");
    env::set_var("SERVER_PORT", "9090");
    env::set_var("MAX_FILE_SIZE_BYTES", "2048");
    env::set_var("ACCEPTED_FILE_TYPES", ".PDF, pdf");
    env::set_var("SHOW_PREVIEW", "false");
    env::set_var("SUCCESS_DISPLAY_MS", "not-a-number");

    let config = Config::from_env().unwrap();
    assert_eq!(config.server_host, "0.0.0.0");
    assert_eq!(config.server_port, 9090);
    assert_eq!(config.max_file_size_bytes, 2048);
    assert_eq!(config.accepted_file_types, vec![".PDF", "pdf"]);
    assert!(!config.show_preview);
    assert_eq!(config.success_display_ms, 2000);

    let rules = config.validation_config().unwrap();
    assert!(rules.allows_extension("pdf"));
    assert_eq!(rules.max_byte_size(), 2048);

    for var in [
        "SERVER_PORT",
        "MAX_FILE_SIZE_BYTES",
        "ACCEPTED_FILE_TYPES",
        "SHOW_PREVIEW",
        "SUCCESS_DISPLAY_MS",
    ] {
        env::remove_var(var);
    }
}

#[tokio::test]
async fn test_upload_emits_notification() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut uploader = PdfUploader::default().with_notifier(tx);

    let verdict = uploader.select_file(pdf_candidate("test.pdf")).await.cloned();
    assert!(verdict.map(|v| v.is_valid()).unwrap_or(false));
    assert_eq!(uploader.state(), UploaderState::Valid);
    assert!(uploader.is_file_valid());
    assert_eq!(uploader.status_label(), "Valid PDF file");

    let event = uploader.request_upload().unwrap();
    assert_eq!(event.file_name, "test.pdf");
    assert_eq!(event.file_size, 1024);

    let received = rx.try_recv().unwrap();
    assert_eq!(received.file_name, "test.pdf");
    assert_eq!(received.file_size, 1024);
    assert_eq!(received.file_type, "application/pdf");
    assert_eq!(uploader.state(), UploaderState::Completed);
    assert_eq!(uploader.success_message(), "File \"test.pdf\" uploaded successfully!");
}

#[tokio::test]
async fn test_upload_after_invalid_selection_is_refused() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut uploader = PdfUploader::default().with_notifier(tx);

    let fake = UploadCandidate::from_bytes("fake.pdf", "text/plain", &b"This is not a PDF"[..]);
    uploader.select_file(fake).await;
    assert_eq!(uploader.state(), UploaderState::Invalid);

    let result = uploader.request_upload();
    assert!(matches!(result, Err(AppError::NoValidSelection)));
    assert_eq!(
        uploader.error_message(),
        "Please select a valid PDF file before uploading."
    );
    assert!(rx.try_recv().is_err());
    assert!(uploader.current_file().is_some());
}

#[tokio::test]
async fn test_upload_without_selection_is_refused() {
    let mut uploader = PdfUploader::default();
    assert!(uploader.request_upload().is_err());
    assert_eq!(
        uploader.error_message(),
        "Please select a valid PDF file before uploading."
    );
    assert_eq!(uploader.state(), UploaderState::Empty);
}

#[tokio::test(start_paused = true)]
async fn test_completed_upload_clears_after_display_delay() {
    let mut uploader = PdfUploader::default().with_display_delay(Duration::from_millis(1500));
    uploader.select_file(pdf_candidate("test.pdf")).await;
    uploader.request_upload().unwrap();

    let started = tokio::time::Instant::now();
    uploader.finish_upload().await;
    assert!(started.elapsed() >= Duration::from_millis(1500));

    assert_eq!(uploader.state(), UploaderState::Empty);
    assert!(uploader.current_file().is_none());
    assert_eq!(uploader.success_message(), "");
    assert_eq!(uploader.status_label(), "");
}

#[tokio::test]
async fn test_reset_is_idempotent() {
    let mut uploader = PdfUploader::default();
    let text = UploadCandidate::from_bytes("document.txt", "text/plain", &b"Some text content"[..]);
    uploader.select_file(text).await;
    uploader.drag_enter();
    assert_eq!(uploader.error_message(), "Please select a PDF file.");

    uploader.reset();
    let once = (
        uploader.state(),
        uploader.current_file().is_none(),
        uploader.status_label().to_string(),
        uploader.detail_message().to_string(),
        uploader.error_message().to_string(),
        uploader.success_message().to_string(),
        uploader.is_drag_over(),
    );
    uploader.remove_file();
    let twice = (
        uploader.state(),
        uploader.current_file().is_none(),
        uploader.status_label().to_string(),
        uploader.detail_message().to_string(),
        uploader.error_message().to_string(),
        uploader.success_message().to_string(),
        uploader.is_drag_over(),
    );

    assert_eq!(once, twice);
    assert_eq!(
        once,
        (UploaderState::Empty, true, String::new(), String::new(), String::new(), String::new(), false)
    );
}

#[tokio::test]
async fn test_drop_uses_first_file_only() {
    let mut uploader = PdfUploader::default();
    uploader.drag_enter();

    let extra = UploadCandidate::from_bytes("notes.txt", "text/plain", &b"notes"[..]);
    let verdict = uploader
        .drop_files(vec![pdf_candidate("first.pdf"), extra])
        .await
        .cloned()
        .unwrap();

    assert!(verdict.is_valid());
    assert!(!uploader.is_drag_over());
    assert_eq!(uploader.current_file().map(|f| f.name()), Some("first.pdf"));
}

#[tokio::test]
async fn test_new_selection_clears_previous_messages() {
    let mut uploader = PdfUploader::default();
    let fake = UploadCandidate::from_bytes("fake.pdf", "text/plain", &b"This is not a PDF"[..]);
    uploader.select_file(fake).await;
    uploader.request_upload().unwrap_err();
    assert_eq!(uploader.status_label(), "Invalid PDF content");
    assert!(!uploader.error_message().is_empty());

    uploader.select(pdf_candidate("fresh.pdf"));
    assert_eq!(uploader.state(), UploaderState::Selected);
    assert_eq!(uploader.error_message(), "");
    assert_eq!(uploader.status_label(), "");
}

#[tokio::test]
async fn test_file_backed_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("report.pdf");
    std::fs::write(&pdf_path, b"%PDF-1.7\n1 0 obj\n").unwrap();

    let candidate = UploadCandidate::from_path(&pdf_path, "application/pdf").await.unwrap();
    assert_eq!(candidate.name(), "report.pdf");
    assert_eq!(candidate.byte_size(), 17);

    let mut uploader = PdfUploader::default();
    uploader.select_file(candidate).await;
    assert!(uploader.is_file_valid());

    std::fs::remove_file(&pdf_path).unwrap();
    let gone = UploadCandidate::new(
        "report.pdf",
        17,
        "application/pdf",
        std::sync::Arc::new(pdfgate::models::FileSource::new(&pdf_path)),
    );
    let verdict = uploader.select_file(gone).await.cloned().unwrap();
    assert_eq!(verdict.status_label(), "Invalid PDF content");
    assert!(verdict.detail_message().starts_with("Could not read file content"));
}

#[tokio::test]
async fn test_validate_endpoint_reports_verdicts() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let app = create_router(AppState::new(test_config(), tx).unwrap());

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/validate",
            multipart_body("test.pdf", "application/pdf", b"%PDF-1.4\nbody"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["verdict"]["isValid"], true);
    assert_eq!(body["data"]["verdict"]["statusLabel"], "Valid PDF file");

    let response = app
        .oneshot(multipart_request(
            "/api/v1/validate",
            multipart_body("fake.pdf", "text/plain", b"This is not a PDF"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["verdict"]["isValid"], false);
    assert_eq!(body["data"]["verdict"]["statusLabel"], "Invalid PDF content");
}

#[tokio::test]
async fn test_binary_endpoint_uses_file_name_header() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let app = create_router(AppState::new(test_config(), tx).unwrap());

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/validate/binary")
        .header("content-type", "application/octet-stream")
        .header("x-file-name", "document.txt")
        .body(Body::from("Some text content"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = json_body(response).await;
    assert_eq!(body["data"]["file_name"], "document.txt");
    assert_eq!(body["data"]["verdict"]["statusLabel"], "Invalid file type");
}

#[tokio::test]
async fn test_upload_endpoint() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let app = create_router(AppState::new(test_config(), tx).unwrap());

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/upload",
            multipart_body("test.pdf", "application/pdf", b"%PDF-1.5\n"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["fileName"], "test.pdf");
    assert_eq!(body["data"]["fileSize"], 9);
    assert_eq!(body["data"]["fileType"], "application/pdf");
    assert_eq!(rx.try_recv().unwrap().file_name, "test.pdf");

    let response = app
        .oneshot(multipart_request(
            "/api/v1/upload",
            multipart_body("document.txt", "text/plain", b"Some text content"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "NO_VALID_SELECTION");
    assert_eq!(
        body["error"]["message"],
        "Please select a valid PDF file before uploading."
    );
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_missing_file_field() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let app = create_router(AppState::new(test_config(), tx).unwrap());

    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{b}--\r\n",
        b = BOUNDARY
    );
    let response = app
        .oneshot(multipart_request("/api/v1/validate", body.into_bytes()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "MISSING_FILE");
}

#[tokio::test]
async fn test_health_and_config_endpoints() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let app = create_router(AppState::new(test_config(), tx).unwrap());

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["validation"]["max_file_size"], "10 MB");

    let response = app
        .oneshot(Request::builder().uri("/api/v1/config").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["maxFileSize"], 10485760);
    assert_eq!(body["showPreview"], true);
}

#[tokio::test]
async fn test_oversize_file_within_body_headroom_gets_a_verdict() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let config = Config {
        max_file_size_bytes: 1024,
        ..test_config()
    };
    let app = create_router(AppState::new(config, tx).unwrap());

    let mut content = b"%PDF-1.4\n".to_vec();
    content.resize(5000, b' ');
    let response = app
        .oneshot(multipart_request(
            "/api/v1/validate",
            multipart_body("big.pdf", "application/pdf", &content),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["file_size"], 5000);
    assert_eq!(body["data"]["verdict"]["isValid"], false);
    assert_eq!(body["data"]["verdict"]["statusLabel"], "File too large");
}

#[tokio::test(start_paused = true)]
async fn test_stalled_read_times_out() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let state = AppState::new(test_config(), tx).unwrap();
    let stalled = UploadCandidate::new(
        "slow.pdf",
        10,
        "application/pdf",
        std::sync::Arc::new(StalledSource),
    );

    let err = state.validate(&stalled).await.unwrap_err();
    assert!(matches!(err, AppError::Timeout));

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "REQUEST_TIMEOUT");

    let mut uploader = state.uploader();
    uploader.select(stalled);
    let ticket = uploader.begin_validation().unwrap();
    let started = tokio::time::Instant::now();
    assert!(matches!(
        state.within_timeout(ticket.run()).await,
        Err(AppError::Timeout)
    ));
    assert!(started.elapsed() >= Duration::from_secs(30));
    assert_eq!(uploader.state(), UploaderState::Validating);
}
