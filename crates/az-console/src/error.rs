use az_common::FieldErrors;
use thiserror::Error;

/// Shown when a login fails without a server message
pub const LOGIN_FAILED_MESSAGE: &str = "Autentificare eșuată";

/// Login failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Client-side checks failed; nothing was sent
    #[error("Credentials incomplete")]
    Validation(FieldErrors),

    #[error("{message}")]
    BadCredentials {
        message: String,
        field_errors: FieldErrors,
    },

    #[error("{0}")]
    Connection(String),
}

impl AuthError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AuthError::Validation(errors) => Some(errors),
            AuthError::BadCredentials { field_errors, .. } if !field_errors.is_empty() => Some(field_errors),
            _ => None,
        }
    }
}

/// Refusals raised by views before any request is made
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    #[error("Action not permitted for the current roles")]
    Forbidden,
}
