//! Content create, read, download, metadata and delete handlers.

use std::str::FromStr;

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;

use vanish_core::error::AppError;
use vanish_entity::ContentKind;
use vanish_service::{ContentService, CreateContentRequest, UploadedFile};

use crate::dto::request::{CreateTextRequest, ReadQuery, parse_expiry, parse_flag};
use crate::dto::response::{ApiResponse, ContentResponse, CreateContentResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/content: create text content from a JSON body
pub async fn create_text(
    State(state): State<AppState>,
    Json(body): Json<CreateTextRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateContentResponse>>), ApiError> {
    let request = body.into_service_request()?;
    create(&state, request).await
}

/// POST /api/content/upload: create text or file content from a multipart form
pub async fn create_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<CreateContentResponse>>), ApiError> {
    let mut kind: Option<ContentKind> = None;
    let mut text: Option<String> = None;
    let mut file: Option<UploadedFile> = None;
    let mut password: Option<String> = None;
    let mut one_time_view = false;
    let mut max_views: Option<u32> = None;
    let mut expires_at: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let file_name = field
                .file_name()
                .map(String::from)
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "upload.bin".to_string());
            let mime_type = field.content_type().map(String::from);
            let data: Bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
            file = Some(UploadedFile {
                name: file_name,
                mime_type,
                data,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
        match name.as_str() {
            "type" => kind = Some(ContentKind::from_str(value.trim())?),
            "textContent" => text = Some(value),
            "password" => password = Some(value),
            "oneTimeView" => one_time_view = parse_flag(&value),
            "maxViews" if !value.trim().is_empty() => {
                max_views = Some(
                    value
                        .trim()
                        .parse()
                        .map_err(|_| AppError::validation("maxViews must be a positive integer"))?,
                );
            }
            "expiresAt" => expires_at = Some(value),
            _ => {}
        }
    }

    let kind = kind.unwrap_or(if file.is_some() {
        ContentKind::File
    } else {
        ContentKind::Text
    });

    let request = CreateContentRequest {
        kind,
        text,
        file,
        password,
        one_time_view,
        max_views,
        expires_at: parse_expiry(expires_at.as_deref())?,
    };
    create(&state, request).await
}

async fn create(
    state: &AppState,
    request: CreateContentRequest,
) -> Result<(StatusCode, Json<ApiResponse<CreateContentResponse>>), ApiError> {
    let record = state.content.create(request).await?;
    let share_url = state.config.server.share_url(record.id.as_str());
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(CreateContentResponse::from_record(
            &record, share_url,
        ))),
    ))
}

/// GET /api/content/{id}?password=...: read content, counting one view
pub async fn read_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReadQuery>,
) -> Result<Json<ApiResponse<ContentResponse>>, ApiError> {
    let id = ContentService::parse_id(&id)?;
    let record = state.content.read(&id, query.password.as_deref()).await?;
    let file_url = state.config.server.file_url(record.id.as_str());
    Ok(Json(ApiResponse::ok(ContentResponse::from_record(
        record, file_url,
    ))))
}

/// GET /api/content/{id}/file?password=...: download the file of content
/// that has already been opened. Does not count a view.
pub async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReadQuery>,
) -> Result<Response, ApiError> {
    let id = ContentService::parse_id(&id)?;
    let file = state
        .content
        .download(&id, query.password.as_deref())
        .await?;

    let content_type = file
        .mime_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let disposition = format!(
        "attachment; filename=\"{}\"",
        file.name.replace(['"', '\\', '\r', '\n'], "_")
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, file.data.len())
        .body(Body::from(file.data))
        .map_err(|e| AppError::internal(format!("Failed to build response: {e}")).into())
}

/// GET /api/content/{id}/metadata: lifecycle flags without the payload
pub async fn read_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = ContentService::parse_id(&id)?;
    let metadata = state.content.metadata(&id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": metadata })))
}

/// DELETE /api/content/{id}
pub async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = ContentService::parse_id(&id)?;
    state.content.delete(&id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Content deleted"
    })))
}
