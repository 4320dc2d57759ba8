use std::fmt;

/// Coarse classification of a failed API call.
///
/// Callers branch on the kind; the HTTP status (when one was received) and
/// message travel alongside in [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 401 or 403. The client does not clear the session on its own.
    Unauthorized,
    /// 404.
    NotFound,
    /// 400 or 422.
    Validation,
    /// Any 5xx.
    ServerError,
    /// No response was received (connect failure, timeout, reset).
    Network,
    /// Everything else, including unparseable 2xx bodies.
    Unknown,
}

impl ErrorKind {
    /// Maps a non-2xx HTTP status onto the taxonomy.
    pub fn from_status(status: u16) -> ErrorKind {
        match status {
            401 | 403 => ErrorKind::Unauthorized,
            404 => ErrorKind::NotFound,
            400 | 422 => ErrorKind::Validation,
            500..=599 => ErrorKind::ServerError,
            _ => ErrorKind::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::NotFound => "not found",
            ErrorKind::Validation => "validation",
            ErrorKind::ServerError => "server error",
            ErrorKind::Network => "network",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// A normalized API failure. Never a raw transport error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            kind,
            message: message.into(),
            status,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message, None)
    }

    /// Builds an error from a non-2xx status and the raw response body.
    ///
    /// The message prefers a `message` or `error` string field of a JSON body,
    /// then the body text itself, then the status reason phrase.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("request failed")
                .to_string()
        });
        Self::new(ErrorKind::from_status(status), message, Some(status))
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }
}

fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["message", "error"] {
            if let Some(serde_json::Value::String(s)) = map.get(key)
                && !s.is_empty()
            {
                return Some(s.clone());
            }
        }
    }
    Some(trimmed.to_string())
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} error (HTTP {status}): {}", self.kind.label(), self.message),
            None => write!(f, "{} error: {}", self.kind.label(), self.message),
        }
    }
}

impl std::error::Error for ApiError {}
