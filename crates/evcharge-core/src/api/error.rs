//! Error types shared across API endpoint groups.

use std::fmt;

use serde_json::Value;

/// Fallback message when the API provides no usable detail.
pub const DEFAULT_FALLBACK: &str = "Something went wrong";

/// Message used for all transport-level failures.
pub const SERVICE_UNAVAILABLE: &str = "Service unavailable";

/// Categories of API errors for consistent handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// HTTP status error (4xx, 5xx) other than 401.
    Http(u16),
    /// 401-class response; the stored session has been cleared.
    Unauthorized,
    /// Network unreachable, connection refused, or similar.
    Transport,
    /// Failed to parse a success response body.
    Decode,
}

/// Structured error from the API with kind and a display-ready message.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category.
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display; never a stack trace.
    pub message: String,
    /// Optional raw body or source error for logs.
    pub details: Option<String>,
}

impl ApiError {
    /// Builds an error from an HTTP error response.
    ///
    /// The message follows the API's `detail` payload when present, falling
    /// back to the caller's operation-specific message.
    pub fn from_response(status: u16, body: &str, fallback: &str) -> Self {
        let kind = if status == 401 {
            ApiErrorKind::Unauthorized
        } else {
            ApiErrorKind::Http(status)
        };
        let message = detail_message(body).unwrap_or_else(|| fallback.to_string());
        let details = (!body.is_empty()).then(|| body.to_string());
        Self {
            kind,
            message,
            details,
        }
    }

    /// Builds a transport error with the generic unavailable message.
    pub fn transport(source: &reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            message: SERVICE_UNAVAILABLE.to_string(),
            details: Some(source.to_string()),
        }
    }

    /// Builds a decode error for an unparseable success body.
    pub fn decode(source: &reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            message: "Failed to parse response".to_string(),
            details: Some(source.to_string()),
        }
    }

    /// Returns true for the 401-class category.
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Extracts a display message from a FastAPI-style error body.
///
/// Precedence: `detail` as a string; `detail` as an array joined from each
/// item's `msg`/`message` (else the item's JSON form); `detail` as an object
/// via its `msg` else the object's JSON form. Anything else yields nothing
/// and the caller's fallback applies.
fn detail_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    let detail = json.get("detail")?;

    match detail {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    item.get("msg")
                        .or_else(|| item.get("message"))
                        .and_then(Value::as_str)
                        .map(std::string::ToString::to_string)
                        .or_else(|| match item {
                            Value::String(s) => Some(s.clone()),
                            other => serde_json::to_string(other).ok(),
                        })
                })
                .filter(|part| !part.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(map) => match map.get("msg").and_then(Value::as_str) {
            Some(msg) => Some(msg.to_string()),
            None => serde_json::to_string(detail).ok(),
        },
        _ => None,
    }
}
