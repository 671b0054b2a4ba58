use thiserror::Error;

/// Failure of one REST fetch against the trading backend.
///
/// A poll batch is all-or-nothing: any of these aborts the whole batch and
/// the previously held state stays in place.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("Backend returned HTTP {status} for {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("Failed to decode {endpoint} response: {reason}")]
    DecodeFailed { endpoint: String, reason: String },

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl SyncError {
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            SyncError::RequestFailed { endpoint, .. }
            | SyncError::HttpStatus { endpoint, .. }
            | SyncError::DecodeFailed { endpoint, .. } => Some(endpoint),
            SyncError::InvalidUrl(_) => None,
        }
    }
}

impl From<url::ParseError> for SyncError {
    fn from(e: url::ParseError) -> Self {
        SyncError::InvalidUrl(e.to_string())
    }
}

/// Errors raised on the push channel. None of them is fatal: the channel
/// loop logs them and either skips the frame or schedules a reconnect.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("WebSocket connection failed: {0}")]
    ConnectionFailed(String),

    #[error("WebSocket error: {0}")]
    Transport(String),

    #[error("Failed to parse push message: {0}")]
    MessageParse(String),

    #[error("Push message '{kind}' is missing its payload")]
    MissingPayload { kind: String },
}

impl From<serde_json::Error> for PushError {
    fn from(e: serde_json::Error) -> Self {
        PushError::MessageParse(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Unsupported language code: {0}")]
    UnsupportedLanguage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_error_exposes_endpoint() {
        let err = SyncError::HttpStatus {
            endpoint: "/portfolio".to_string(),
            status: 502,
        };
        assert_eq!(err.endpoint(), Some("/portfolio"));
        assert_eq!(err.to_string(), "Backend returned HTTP 502 for /portfolio");

        let err = SyncError::InvalidUrl("relative URL without a base".to_string());
        assert_eq!(err.endpoint(), None);
    }

    #[test]
    fn test_push_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: PushError = json_err.into();
        assert!(matches!(err, PushError::MessageParse(_)));
    }
}
