//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use vanish_core::error::AppError;
use vanish_core::result::AppResult;
use vanish_service::CreateContentRequest;

/// JSON body of `POST /api/content`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTextRequest {
    /// Text to share.
    #[validate(length(min = 1, message = "Text content is required"))]
    pub text_content: String,
    /// Optional access password.
    #[serde(default)]
    pub password: Option<String>,
    /// One-time view.
    #[serde(default)]
    pub one_time_view: bool,
    /// Optional view budget.
    #[validate(range(
        min = 1,
        max = 2_147_483_647,
        message = "maxViews must be between 1 and 2147483647"
    ))]
    #[serde(default)]
    pub max_views: Option<u32>,
    /// Requested expiry, RFC 3339.
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl CreateTextRequest {
    /// Validate and convert into a service request.
    pub fn into_service_request(self) -> AppResult<CreateContentRequest> {
        self.validate()
            .map_err(|e| AppError::validation(format!("Invalid request: {e}")))?;

        Ok(CreateContentRequest {
            one_time_view: self.one_time_view,
            max_views: self.max_views,
            password: self.password,
            expires_at: parse_expiry(self.expires_at.as_deref())?,
            ..CreateContentRequest::text(self.text_content)
        })
    }
}

/// Query string of `GET /api/content/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadQuery {
    /// Access password.
    pub password: Option<String>,
}

/// Parse an optional RFC 3339 expiry. Blank input means "use the default".
pub fn parse_expiry(raw: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| AppError::invalid_expiry(format!("Invalid expiresAt '{s}'"))),
    }
}

/// Parse a form boolean (`true`, `1`, `on`, case-insensitive).
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}
