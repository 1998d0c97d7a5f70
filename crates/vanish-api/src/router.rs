//! Route definitions for the Vanish HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Multipart framing on top of the largest accepted file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = (state.config.storage.max_upload_size_bytes as usize)
        .max(state.config.content.max_text_bytes * 2)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(content_routes())
        .merge(maintenance_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Content create, read, metadata, delete
fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/content", post(handlers::content::create_text))
        .route("/content/upload", post(handlers::content::create_upload))
        .route(
            "/content/{id}",
            get(handlers::content::read_content).delete(handlers::content::delete_content),
        )
        .route("/content/{id}/file", get(handlers::content::download_file))
        .route("/content/{id}/metadata", get(handlers::content::read_metadata))
}

/// Manual sweep
fn maintenance_routes() -> Router<AppState> {
    Router::new().route("/cleanup", post(handlers::cleanup::trigger_sweep))
}

/// Health check (no state requirements beyond the stores)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use vanish_core::config::AppConfig;
    use vanish_core::traits::SystemClock;
    use vanish_database::MemoryContentStore;
    use vanish_service::{ContentService, LifecycleEngine, RandomIdGenerator};
    use vanish_storage::LocalBlobStore;
    use vanish_worker::Sweeper;

    struct TestApp {
        router: Router,
        _dir: tempfile::TempDir,
    }

    async fn app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.server.base_url = "https://vanish.test/".to_string();

        let blobs = Arc::new(
            LocalBlobStore::new(dir.path().to_str().unwrap())
                .await
                .unwrap(),
        );
        let engine = Arc::new(LifecycleEngine::new(
            Arc::new(MemoryContentStore::new()),
            Arc::new(SystemClock),
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

        TestApp {
            router: build_router(state),
            _dir: dir,
        }
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_one_time_text_roundtrip() {
        let app = app().await;
        let (status, body) = send(
            &app.router,
            post_json(
                "/api/content",
                serde_json::json!({ "textContent": "secret", "oneTimeView": true }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["data"]["shortId"].as_str().unwrap().to_string();
        assert_eq!(
            body["data"]["shareUrl"],
            format!("https://vanish.test/view/{id}")
        );
        assert_eq!(body["data"]["hasPassword"], false);

        let (status, body) = send(&app.router, get(&format!("/api/content/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["textContent"], "secret");
        assert_eq!(body["data"]["viewCount"], 0);

        let (status, body) = send(&app.router, get(&format!("/api/content/{id}"))).await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body["reason"], "deleted");

        let (status, body) =
            send(&app.router, get(&format!("/api/content/{id}/metadata"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["canView"], false);
    }

    #[tokio::test]
    async fn test_password_flow() {
        let app = app().await;
        let (_, body) = send(
            &app.router,
            post_json(
                "/api/content",
                serde_json::json!({ "textContent": "pin", "password": "hunter2" }),
            ),
        )
        .await;
        let id = body["data"]["shortId"].as_str().unwrap().to_string();

        let (status, body) = send(&app.router, get(&format!("/api/content/{id}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "PASSWORD_REQUIRED");
        assert_eq!(body["requiresPassword"], true);

        let (status, body) = send(
            &app.router,
            get(&format!("/api/content/{id}?password=wrong1")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "PASSWORD_INCORRECT");

        let (status, body) = send(
            &app.router,
            get(&format!("/api/content/{id}?password=hunter2")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["textContent"], "pin");

        let (_, body) = send(&app.router, get(&format!("/api/content/{id}/metadata"))).await;
        assert_eq!(body["data"]["requiresPassword"], true);
        assert!(body["data"].get("textContent").is_none());
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_not_found() {
        let app = app().await;
        let (status, body) = send(&app.router, get("/api/content/AAAAAAAAAAAA")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");

        let (status, _) = send(&app.router, get("/api/content/x")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_past_expiry_is_rejected() {
        let app = app().await;
        let (status, body) = send(
            &app.router,
            post_json(
                "/api/content",
                serde_json::json!({ "textContent": "late", "expiresAt": "2001-01-01T00:00:00Z" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_EXPIRY");
    }

    #[tokio::test]
    async fn test_multipart_file_upload_and_delete() {
        let app = app().await;
        let boundary = "vanishboundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\nfile\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"maxViews\"\r\n\r\n2\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\n\
             Content-Type: text/plain\r\n\r\nhello file\r\n--{b}--\r\n",
            b = boundary
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/content/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["type"], "file");
        assert_eq!(body["data"]["maxViews"], 2);
        let id = body["data"]["shortId"].as_str().unwrap().to_string();

        // No download before the first counted view.
        let (status, body) = send(&app.router, get(&format!("/api/content/{id}/file"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "CONFLICT");

        let (status, body) = send(&app.router, get(&format!("/api/content/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["fileName"], "notes.txt");
        assert_eq!(body["data"]["fileSize"], 10);
        assert_eq!(body["data"]["mimeType"], "text/plain");
        assert_eq!(
            body["data"]["fileUrl"],
            format!("https://vanish.test/api/content/{id}/file")
        );

        let response = app
            .router
            .clone()
            .oneshot(get(&format!("/api/content/{id}/file")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/plain");
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=\"notes.txt\""
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"hello file");

        // Downloading did not spend the second view.
        let (status, body) = send(&app.router, get(&format!("/api/content/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["viewCount"], 1);

        // The view budget is spent but the file stays downloadable until deleted.
        let response = app
            .router
            .clone()
            .oneshot(get(&format!("/api/content/{id}/file")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/content/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app.router, delete).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app.router, get(&format!("/api/content/{id}"))).await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body["reason"], "deleted");

        let (status, body) = send(&app.router, get(&format!("/api/content/{id}/file"))).await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body["reason"], "deleted");
    }

    #[tokio::test]
    async fn test_cleanup_and_health() {
        let app = app().await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/cleanup")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["reclaimed"], 0);

        let (status, body) = send(&app.router, get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["database"]["backend"], "memory");
    }
}
