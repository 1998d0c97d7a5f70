//! End-to-end lifecycle tests over the HTTP API.

mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_one_time_reads_succeed_once() {
    let app = Arc::new(helpers::TestApp::new().await);
    let id = app
        .create_text(serde_json::json!({ "textContent": "burn after reading", "oneTimeView": true }))
        .await;

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let app = app.clone();
            let path = format!("/api/content/{id}");
            tokio::spawn(async move { app.request("GET", &path, None).await })
        })
        .collect();

    let mut ok = 0;
    let mut gone = 0;
    for handle in handles {
        let response = handle.await.unwrap();
        match response.status {
            StatusCode::OK => ok += 1,
            StatusCode::GONE => gone += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(gone, 31);
}

#[tokio::test]
async fn test_view_budget_is_exact() {
    let app = helpers::TestApp::new().await;
    let id = app
        .create_text(serde_json::json!({ "textContent": "three times", "maxViews": 3 }))
        .await;
    let path = format!("/api/content/{id}");

    for expected in 0..3 {
        let response = app.request("GET", &path, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["data"]["viewCount"], expected);
    }

    let response = app.request("GET", &path, None).await;
    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(response.body["reason"], "deleted");
}

#[tokio::test]
async fn test_metadata_does_not_consume_views() {
    let app = helpers::TestApp::new().await;
    let id = app
        .create_text(serde_json::json!({ "textContent": "peek", "oneTimeView": true }))
        .await;

    for _ in 0..3 {
        let response = app
            .request("GET", &format!("/api/content/{id}/metadata"), None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["data"]["canView"], true);
        assert!(response.body["data"].get("textContent").is_none());
    }

    let response = app.request("GET", &format!("/api/content/{id}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_content_is_gone_then_swept() {
    let app = helpers::TestApp::new().await;
    let id = app
        .upload_file("report.txt", "quarterly numbers", &[("type", "file")])
        .await;
    assert_eq!(app.blob_count(), 1);

    app.clock.advance(Duration::minutes(11));

    let response = app.request("GET", &format!("/api/content/{id}"), None).await;
    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(response.body["reason"], "expired");

    let response = app
        .request("GET", &format!("/api/content/{id}/metadata"), None)
        .await;
    assert_eq!(response.body["data"]["isExpired"], true);
    assert_eq!(response.body["data"]["canView"], false);

    let response = app.request("POST", "/api/cleanup", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["reclaimed"], 1);
    assert_eq!(response.body["data"]["blobsReleased"], 1);
    assert_eq!(app.blob_count(), 0);

    // Once deleted, the deletion reason wins over expiry.
    let response = app.request("GET", &format!("/api/content/{id}"), None).await;
    assert_eq!(response.body["reason"], "deleted");

    let response = app.request("POST", "/api/cleanup", None).await;
    assert_eq!(response.body["data"]["reclaimed"], 0);
}

#[tokio::test]
async fn test_delete_is_idempotent_and_releases_blob() {
    let app = helpers::TestApp::new().await;
    let id = app.upload_file("a.bin", "0123456789", &[]).await;
    assert_eq!(app.blob_count(), 1);

    for _ in 0..2 {
        let response = app
            .request("DELETE", &format!("/api/content/{id}"), None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
    assert_eq!(app.blob_count(), 0);

    let response = app
        .request("DELETE", "/api/content/NoSuchThing1", None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_one_time_file_download() {
    let app = helpers::TestApp::new().await;
    let id = app
        .upload_file("keys.txt", "ssh-ed25519 AAAA", &[("oneTimeView", "true")])
        .await;

    let (status, _) = app.download(&id).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let response = app.request("GET", &format!("/api/content/{id}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let file_url = response.body["data"]["fileUrl"].as_str().unwrap().to_string();
    assert!(file_url.ends_with(&format!("/api/content/{id}/file")));

    // The view is spent, the file is still there for the viewer.
    for _ in 0..2 {
        let (status, bytes) = app.download(&id).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"ssh-ed25519 AAAA");
    }
    assert_eq!(app.blob_count(), 1);

    let response = app
        .request("DELETE", &format!("/api/content/{id}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.blob_count(), 0);

    let (status, _) = app.download(&id).await;
    assert_eq!(status, StatusCode::GONE);
}

#[tokio::test]
async fn test_deleted_wins_over_password() {
    let app = helpers::TestApp::new().await;
    let id = app
        .create_text(serde_json::json!({ "textContent": "locked", "password": "opensesame" }))
        .await;
    app.request("DELETE", &format!("/api/content/{id}"), None)
        .await;

    let response = app.request("GET", &format!("/api/content/{id}"), None).await;
    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(response.body["reason"], "deleted");
    assert!(response.body.get("requiresPassword").is_none());
}

#[tokio::test]
async fn test_create_validation() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("POST", "/api/content", Some(serde_json::json!({ "textContent": "   " })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");

    let response = app
        .request(
            "POST",
            "/api/content",
            Some(serde_json::json!({ "textContent": "x", "maxViews": 4_000_000_000u64 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");

    let response = app
        .request(
            "POST",
            "/api/content",
            Some(serde_json::json!({ "textContent": "x", "password": "abc" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/api/content",
            Some(serde_json::json!({ "textContent": "x", "expiresAt": "2026-01-01T12:00:00Z" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "INVALID_EXPIRY");
}
