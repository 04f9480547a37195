use az_common::{ErrorResponse, FieldErrors};
use std::path::PathBuf;
use thiserror::Error;

/// Message shown when the server gave nothing better
pub const FALLBACK_MESSAGE: &str = "Eroare";

/// Message shown when the backend could not be reached
pub const CONNECTION_MESSAGE: &str = "Eroare de conexiune";

#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// A non-authentication call was answered with 401. The gateway has
    /// already announced it; callers must not display it.
    #[error("Session expired")]
    SessionExpired,

    #[error("HTTP {status}: {}", .body.message.as_deref().unwrap_or(FALLBACK_MESSAGE))]
    Status { status: u16, body: ErrorResponse },

    #[error("Request to {path} failed: {message}")]
    Transport { path: String, message: String },

    #[error("Failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Setup(String),
}

impl ApiError {
    pub fn transport(path: &str, err: reqwest::Error) -> Self {
        Self::Transport {
            path: path.to_string(),
            message: err.to_string(),
        }
    }

    pub fn decode(path: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            path: path.to_string(),
            message: err.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided message, if the error carried one
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => body.message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Message suitable for a notification
    pub fn display_message(&self) -> String {
        match self {
            ApiError::Transport { .. } => CONNECTION_MESSAGE.to_string(),
            other => other.message().unwrap_or(FALLBACK_MESSAGE).to_string(),
        }
    }

    /// Per-field validation errors sent by the server
    pub fn validation_errors(&self) -> Option<FieldErrors> {
        match self {
            ApiError::Status { body, .. } => body.field_errors().map(|m| FieldErrors::from(m.clone())),
            _ => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_status_error_accessors() {
        let mut validation = BTreeMap::new();
        validation.insert("email".to_string(), "Email invalid".to_string());
        let err = ApiError::Status {
            status: 400,
            body: ErrorResponse {
                message: Some("Validare eșuată".into()),
                validation_errors: Some(validation),
                ..Default::default()
            },
        };
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.message(), Some("Validare eșuată"));
        assert_eq!(err.validation_errors().unwrap().get("email"), Some("Email invalid"));
        assert_eq!(err.to_string(), "HTTP 400: Validare eșuată");
    }

    #[test]
    fn test_display_message_fallbacks() {
        let bare = ApiError::Status { status: 500, body: ErrorResponse::default() };
        assert_eq!(bare.display_message(), FALLBACK_MESSAGE);

        let offline = ApiError::Transport { path: "/students".into(), message: "refused".into() };
        assert_eq!(offline.display_message(), CONNECTION_MESSAGE);
        assert!(offline.validation_errors().is_none());
    }
}
