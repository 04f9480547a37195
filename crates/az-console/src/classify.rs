//! Mutation error classification

use az_client::{ApiError, CONNECTION_MESSAGE, FALLBACK_MESSAGE};
use az_common::FieldErrors;

/// Status the backend uses for domain-rule rejections
pub const BUSINESS_RULE_STATUS: u16 = 422;

/// How a failed mutation is presented
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorClass {
    /// Already handled by the session store; show nothing
    SessionExpired,
    /// Per-field messages attached to the open form
    Validation(FieldErrors),
    /// Inline warning inside the still-open dialog
    BusinessRule(String),
    /// One-off error notification
    Transient(String),
}

pub trait ErrorClassifier: Send + Sync {
    fn classify(&self, err: &ApiError) -> ErrorClass;
}

/// Field errors when the server sent them, otherwise a transient message
#[derive(Debug, Clone, Copy)]
pub struct StandardClassifier {
    pub fallback: &'static str,
}

pub const STANDARD_CLASSIFIER: StandardClassifier = StandardClassifier {
    fallback: FALLBACK_MESSAGE,
};

impl StandardClassifier {
    pub const fn with_fallback(fallback: &'static str) -> Self {
        Self { fallback }
    }

    fn message(&self, err: &ApiError) -> String {
        if err.is_transport() {
            CONNECTION_MESSAGE.to_string()
        } else {
            err.message().unwrap_or(self.fallback).to_string()
        }
    }
}

impl Default for StandardClassifier {
    fn default() -> Self {
        STANDARD_CLASSIFIER
    }
}

impl ErrorClassifier for StandardClassifier {
    fn classify(&self, err: &ApiError) -> ErrorClass {
        if err.is_session_expired() {
            return ErrorClass::SessionExpired;
        }
        if let Some(fields) = err.validation_errors() {
            return ErrorClass::Validation(fields);
        }
        ErrorClass::Transient(self.message(err))
    }
}

/// Treats one HTTP status as a business-rule rejection
#[derive(Debug, Clone, Copy)]
pub struct BusinessRuleClassifier {
    pub status: u16,
    pub inner: StandardClassifier,
}

impl Default for BusinessRuleClassifier {
    fn default() -> Self {
        Self {
            status: BUSINESS_RULE_STATUS,
            inner: STANDARD_CLASSIFIER,
        }
    }
}

impl ErrorClassifier for BusinessRuleClassifier {
    fn classify(&self, err: &ApiError) -> ErrorClass {
        if err.status() == Some(self.status) {
            return ErrorClass::BusinessRule(self.inner.message(err));
        }
        self.inner.classify(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use az_common::ErrorResponse;
    use std::collections::BTreeMap;

    fn status(code: u16, message: Option<&str>) -> ApiError {
        ApiError::Status {
            status: code,
            body: ErrorResponse {
                message: message.map(String::from),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_standard_classification() {
        let classifier = StandardClassifier::default();
        assert_eq!(classifier.classify(&ApiError::SessionExpired), ErrorClass::SessionExpired);
        assert_eq!(
            classifier.classify(&status(409, Some("Email duplicat"))),
            ErrorClass::Transient("Email duplicat".into())
        );
        assert_eq!(classifier.classify(&status(500, None)), ErrorClass::Transient("Eroare".into()));

        let mut fields = BTreeMap::new();
        fields.insert("nume".to_string(), "Prea scurt".to_string());
        let err = ApiError::Status {
            status: 400,
            body: ErrorResponse {
                validation_errors: Some(fields),
                ..Default::default()
            },
        };
        assert!(matches!(classifier.classify(&err), ErrorClass::Validation(f) if f.get("nume") == Some("Prea scurt")));
    }

    #[test]
    fn test_empty_validation_map_is_transient() {
        let err = ApiError::Status {
            status: 400,
            body: ErrorResponse {
                message: Some("Cerere invalidă".into()),
                validation_errors: Some(BTreeMap::new()),
                ..Default::default()
            },
        };
        assert_eq!(STANDARD_CLASSIFIER.classify(&err), ErrorClass::Transient("Cerere invalidă".into()));
    }

    #[test]
    fn test_business_rule_status() {
        let classifier = BusinessRuleClassifier::default();
        let limit = status(422, Some("Numărul maxim de prezențe (14) a fost atins"));
        assert_eq!(
            classifier.classify(&limit),
            ErrorClass::BusinessRule("Numărul maxim de prezențe (14) a fost atins".into())
        );
        assert_eq!(classifier.classify(&status(400, Some("x"))), ErrorClass::Transient("x".into()));
        assert_eq!(classifier.classify(&ApiError::SessionExpired), ErrorClass::SessionExpired);
    }

    #[test]
    fn test_custom_fallback_and_connection_message() {
        let classifier = StandardClassifier::with_fallback("Eroare - posibil duplicat");
        assert_eq!(
            classifier.classify(&status(409, None)),
            ErrorClass::Transient("Eroare - posibil duplicat".into())
        );
        let offline = ApiError::Transport { path: "/x".into(), message: "refused".into() };
        assert_eq!(classifier.classify(&offline), ErrorClass::Transient("Eroare de conexiune".into()));
    }
}
