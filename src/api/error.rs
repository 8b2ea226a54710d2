use std::fmt;

use serde_json::Value;

/// Failure status returned by the metastore service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error response status code : {}, reason : {}",
            self.status, self.detail
        )
    }
}

impl std::error::Error for ApiError {}

/// Extracts a human readable detail from an error response body.
///
/// Google APIs wrap failures as `{"error": {"code", "message", "status"}}`.
/// Anything else is passed through as text.
pub fn error_detail(body: &str, reason: Option<&str>) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return reason.unwrap_or("unknown error").to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if let Some(message) = value
            .get("error")
            .and_then(|err| err.get("message"))
            .and_then(Value::as_str)
        {
            return message.to_string();
        }
    }

    trimmed.to_string()
}
