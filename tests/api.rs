//! End-to-end tests for the HTTP surface
//!
//! The router runs against the in-memory store with scripted classifiers,
//! so every test exercises the real pipeline: multipart parsing,
//! validation, orchestration, fallback, querying, and report rendering.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use paperinsight::classifier::{
    ClassificationOrigin, ClassificationResult, Classifier, UploadedFile,
};
use paperinsight::config::AppConfig;
use paperinsight::db::models::{DocumentType, PaperNature};
use paperinsight::db::MemoryStore;
use paperinsight::errors::{AppError, Result};
use paperinsight::routes::create_router;
use paperinsight::services::AppState;

struct FailingClassifier;

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _file: &UploadedFile) -> Result<ClassificationResult> {
        Err(AppError::ClassifierUnavailable("connection refused".into()))
    }
}

struct StubClassifier(ClassificationResult);

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, _file: &UploadedFile) -> Result<ClassificationResult> {
        Ok(self.0.clone())
    }
}

fn build_app(classifier: Arc<dyn Classifier>) -> Router {
    let config = Arc::new(AppConfig::default());
    let store = Arc::new(MemoryStore::new());
    create_router(AppState::new(config, store, classifier))
}

const BOUNDARY: &str = "paperinsight-test-boundary";

fn multipart_upload(file_name: &str, mime: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {mime}\r\n\r\n").as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn multipart_without_file() -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"note\"\r\n\r\n");
    body.extend_from_slice(b"no file here");
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn upload_pdf(app: &Router, file_name: &str) -> Value {
    let response = app
        .clone()
        .oneshot(multipart_upload(file_name, "application/pdf", b"%PDF-1.4 test"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test]
async fn upload_with_unavailable_classifier_still_completes() {
    let app = build_app(Arc::new(FailingClassifier));

    let content = vec![0u8; 1024 * 1024];
    let response = app
        .clone()
        .oneshot(multipart_upload("my-paper.pdf", "application/pdf", &content))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["status"], "completed");
    assert_eq!(data["title"], "My Paper");
    assert_eq!(data["originalFileName"], "my-paper.pdf");
    assert!(!data["evidence"].as_array().unwrap().is_empty());
    let type_confidence = data["typeConfidence"].as_f64().unwrap();
    assert!((0.70..=0.95).contains(&type_confidence));
    assert!(data.get("errorMessage").is_none());
}

#[tokio::test]
async fn upload_merges_a_genuine_classification() {
    let outcome = ClassificationResult {
        title: Some("Attention Is All You Need".into()),
        document_type: DocumentType::Journal,
        type_confidence: 0.93,
        nature: PaperNature::Theoretical,
        nature_confidence: 0.88,
        evidence: vec!["We provide formal proofs.".into()],
        keywords: vec!["attention".into()],
        origin: ClassificationOrigin::Service,
    };
    let app = build_app(Arc::new(StubClassifier(outcome)));

    let body = upload_pdf(&app, "attention.pdf").await;
    let data = &body["data"];
    assert_eq!(data["title"], "Attention Is All You Need");
    assert_eq!(data["documentType"], "Journal");
    assert_eq!(data["nature"], "Theoretical");
    assert_eq!(data["typeConfidence"], 0.93);
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let app = build_app(Arc::new(FailingClassifier));

    let response = app.oneshot(multipart_without_file()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Validation failed");
    assert!(body["message"].as_str().unwrap().contains("PDF"));
}

#[tokio::test]
async fn upload_with_wrong_mime_is_rejected() {
    let app = build_app(Arc::new(FailingClassifier));

    let response = app
        .oneshot(multipart_upload("notes.txt", "text/plain", b"just text"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_paginates_and_reports_statistics() {
    let app = build_app(Arc::new(FailingClassifier));
    for index in 0..25 {
        upload_pdf(&app, &format!("paper-{index}.pdf")).await;
    }

    let response = app
        .clone()
        .oneshot(get("/analysis?page=2&limit=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["limit"], 10);
    assert_eq!(body["pagination"]["total"], 25);
    assert_eq!(body["pagination"]["pages"], 3);
    assert_eq!(body["statistics"]["totalAnalyses"], 25);

    let conference = body["statistics"]["conferenceCount"].as_u64().unwrap();
    let journal = body["statistics"]["journalCount"].as_u64().unwrap();
    assert_eq!(conference + journal, 25);
    assert!(body["statistics"]["avgTypeConfidence"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn listing_filters_by_type_without_narrowing_statistics() {
    let outcome = ClassificationResult {
        title: None,
        document_type: DocumentType::Journal,
        type_confidence: 0.9,
        nature: PaperNature::Implementation,
        nature_confidence: 0.9,
        evidence: vec!["Benchmarked on 50k samples.".into()],
        keywords: vec![],
        origin: ClassificationOrigin::Service,
    };
    let app = build_app(Arc::new(StubClassifier(outcome)));
    for index in 0..4 {
        upload_pdf(&app, &format!("journal-{index}.pdf")).await;
    }

    let response = app
        .clone()
        .oneshot(get("/analysis?type=Conference"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["pagination"]["total"], 0);
    // Statistics still describe the full completed population
    assert_eq!(body["statistics"]["totalAnalyses"], 4);
    assert_eq!(body["statistics"]["journalCount"], 4);
}

#[tokio::test]
async fn listing_rejects_unknown_enum_values() {
    let app = build_app(Arc::new(FailingClassifier));
    let response = app.oneshot(get("/analysis?type=Workshop")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_with_malformed_id_is_400_not_404() {
    let app = build_app(Arc::new(FailingClassifier));
    let response = app.oneshot(get("/analysis/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Validation failed");
}

#[tokio::test]
async fn get_with_absent_id_is_404() {
    let app = build_app(Arc::new(FailingClassifier));
    let response = app
        .oneshot(get(
            "/analysis/00000000-0000-4000-8000-000000000000",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_returns_the_uploaded_record() {
    let app = build_app(Arc::new(FailingClassifier));
    let uploaded = upload_pdf(&app, "fetch-me.pdf").await;
    let id = uploaded["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get(&format!("/analysis/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["title"], "Fetch Me");
}

#[tokio::test]
async fn delete_removes_the_record_once() {
    let app = build_app(Arc::new(FailingClassifier));
    let uploaded = upload_pdf(&app, "delete-me.pdf").await;
    let id = uploaded["data"]["id"].as_str().unwrap().to_string();

    let delete = |id: String| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/analysis/{id}"))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete(id.clone())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Analysis deleted successfully");

    let response = app.clone().oneshot(delete(id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn batch_delete_counts_only_existing_records() {
    let app = build_app(Arc::new(FailingClassifier));
    let uploaded = upload_pdf(&app, "batch-a.pdf").await;
    let existing = uploaded["data"]["id"].as_str().unwrap().to_string();
    let missing = "11111111-1111-4111-8111-111111111111";

    let response = app
        .clone()
        .oneshot(json_post(
            "/analysis/batch-delete",
            serde_json::json!({ "ids": [existing, missing] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["deletedCount"], 1);
    assert_eq!(body["message"], "1 analyses deleted successfully");
}

#[tokio::test]
async fn batch_delete_validates_its_payload() {
    let app = build_app(Arc::new(FailingClassifier));

    let response = app
        .clone()
        .oneshot(json_post(
            "/analysis/batch-delete",
            serde_json::json!({ "ids": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_post(
            "/analysis/batch-delete",
            serde_json::json!({ "ids": ["not-a-uuid"] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn report_downloads_as_attachment() {
    let app = build_app(Arc::new(FailingClassifier));
    let uploaded = upload_pdf(&app, "my-paper.pdf").await;
    let id = uploaded["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get(&format!("/report/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("My_Paper_report.txt"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("Paper Title: My Paper"));
    assert!(text.contains("Key Evidence:"));
}

#[tokio::test]
async fn report_for_absent_record_is_404() {
    let app = build_app(Arc::new(FailingClassifier));
    let response = app
        .oneshot(get("/report/00000000-0000-4000-8000-000000000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_readiness_respond() {
    let app = build_app(Arc::new(FailingClassifier));

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");

    let response = app.clone().oneshot(get("/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ready");
}
