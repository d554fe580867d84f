use serde_json::Value;
use thiserror::Error;

/// Failure of a single backend call, or of the local checks that guard one.
///
/// Controller operations never return this to their caller. It is turned into
/// a message with [`ApiError::user_message`] and stored in the error slot of
/// the concern that issued the call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected locally before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Http {
        status: u16,
        message: Option<String>,
        body: String,
    },

    /// 2xx response whose envelope carried `success: false`.
    #[error("Request rejected: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message shown to the user: the backend's own message when it sent one,
    /// then the transport error text, then `default`.
    pub fn user_message(&self, default: &str) -> String {
        let message = match self {
            ApiError::Validation(msg) => Some(msg.clone()),
            ApiError::Http { message, .. } | ApiError::Rejected { message } => message.clone(),
            ApiError::Transport(e) => Some(e.to_string()),
            ApiError::Decode(e) => Some(e.to_string()),
        };
        message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

/// Pulls a human-readable message out of an error body.
///
/// Accepts `{"message": ".."}`, `{"error": ".."}` and the nested
/// `{"error": {"message": ".."}}` shape.
pub fn extract_backend_message(body: &Value) -> Option<String> {
    let direct = body.get("message").and_then(Value::as_str);
    let from_error = match body.get("error") {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Object(obj)) => obj.get("message").and_then(Value::as_str),
        _ => None,
    };
    let non_blank = |m: &str| -> Option<String> {
        let m = m.trim();
        (!m.is_empty()).then(|| m.to_string())
    };
    direct.and_then(non_blank).or_else(|| from_error.and_then(non_blank))
}
