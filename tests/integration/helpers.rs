//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use vanish_api::AppState;
use vanish_core::config::AppConfig;
use vanish_core::traits::ManualClock;
use vanish_database::MemoryContentStore;
use vanish_service::{ContentService, LifecycleEngine, RandomIdGenerator};
use vanish_storage::LocalBlobStore;
use vanish_worker::Sweeper;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Clock driving every expiry decision
    pub clock: ManualClock,
    /// Blob root
    pub blob_dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a new test application on the in-memory store
    pub async fn new() -> Self {
        let blob_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = AppConfig::default();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap());

        let blobs = Arc::new(
            LocalBlobStore::new(blob_dir.path().to_str().expect("utf-8 temp path"))
                .await
                .expect("Failed to init blob store"),
        );
        let engine = Arc::new(LifecycleEngine::new(
            Arc::new(MemoryContentStore::new()),
            Arc::new(clock.clone()),
            Arc::new(RandomIdGenerator::default()),
            config.content.default_ttl(),
        ));
        let content = Arc::new(ContentService::new(
            engine.clone(),
            blobs.clone(),
            config.content.clone(),
            config.storage.max_upload_size_bytes,
        ));
        let sweeper = Arc::new(Sweeper::new(engine, blobs));
        let state = AppState::new(Arc::new(config), content, sweeper);

        Self {
            router: vanish_api::build_router(state),
            clock,
            blob_dir,
        }
    }

    /// Create text content and return its short id
    pub async fn create_text(&self, body: Value) -> String {
        let response = self.request("POST", "/api/content", Some(body)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["shortId"]
            .as_str()
            .expect("No shortId in create response")
            .to_string()
    }

    /// Upload a file through the multipart endpoint and return its short id
    pub async fn upload_file(&self, file_name: &str, contents: &str, extra: &[(&str, &str)]) -> String {
        let boundary = "vanish-test-boundary";
        let mut body = String::new();
        for (name, value) in extra {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n{contents}\r\n--{boundary}--\r\n"
        ));

        let req = Request::builder()
            .method("POST")
            .uri("/api/content/upload")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");
        let response = self.send(req).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["shortId"]
            .as_str()
            .expect("No shortId in upload response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Download the file of a record, returning the status and raw body
    pub async fn download(&self, id: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::builder()
            .uri(format!("/api/content/{id}/file"))
            .body(Body::empty())
            .expect("Failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        (status, body_bytes.to_vec())
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Number of files left under the blob root
    pub fn blob_count(&self) -> usize {
        fn walk(dir: &std::path::Path) -> usize {
            std::fs::read_dir(dir)
                .map(|entries| {
                    entries
                        .filter_map(Result::ok)
                        .map(|e| {
                            let path = e.path();
                            if path.is_dir() { walk(&path) } else { 1 }
                        })
                        .sum()
                })
                .unwrap_or(0)
        }
        walk(self.blob_dir.path())
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
