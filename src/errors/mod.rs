//! Unified error handling with the `{message}` response body the frontend expects.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Application error type mapping to HTTP status codes.
///
/// The `Display` output of each variant is the user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("Domain not found.")]
    DomainNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid verification token.")]
    InvalidToken,

    #[error("DNS verification failed. Check the TXT record and try again.")]
    DnsCheckFailed,

    #[error("Domain is already verified.")]
    AlreadyVerified,

    #[error("Verify the domain before running scans.")]
    DomainNotVerified,
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::DomainNotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::InvalidToken | Self::DomainNotVerified => {
                StatusCode::BAD_REQUEST
            }
            Self::Conflict(_) | Self::AlreadyVerified => StatusCode::CONFLICT,
            Self::DnsCheckFailed => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::DomainNotFound)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        Self::Validation(format!("Invalid or missing fields: {}", fields.join(", ")))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");

        (status, ErrorBody::new(self.to_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_serializes_message_only() {
        let body = ErrorBody::new("Scan not found.");
        let json = serde_json::to_value(&body.0).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Scan not found." }));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::DomainNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::DomainNotVerified.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::AlreadyVerified.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::Conflict("dup".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::DnsCheckFailed.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn app_error_is_not_found() {
        assert!(AppError::DomainNotFound.is_not_found());
        assert!(!AppError::InvalidToken.is_not_found());
    }

    #[test]
    fn app_error_display() {
        let err = AppError::Validation("Domain is required.".to_string());
        assert_eq!(err.to_string(), "Domain is required.");
    }

    #[test]
    fn into_response_uses_status() {
        let response = AppError::DnsCheckFailed.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn validation_errors_list_fields() {
        use validator::Validate;

        #[derive(Validate)]
        struct Body {
            #[validate(url)]
            target_url: String,
        }

        let errors = Body {
            target_url: "nope".into(),
        }
        .validate()
        .unwrap_err();
        let err: AppError = errors.into();
        assert_eq!(err.to_string(), "Invalid or missing fields: target_url");
    }
}
