//! Error types for the FHIR REST API.
//!
//! Every [`RestError`] renders as a FHIR OperationOutcome with a single
//! issue of severity `error`.
//!
//! # Error Mapping
//!
//! | Error | HTTP Status | FHIR Issue Code |
//! |-------|-------------|-----------------|
//! | NotFound | 404 | not-found |
//! | BadRequest | 400 | invalid |
//! | UnsupportedMediaType | 415 | not-supported |
//! | PayloadTooLarge | 413 | too-costly |
//! | UnprocessableEntity | 422 | processing |
//! | InternalError | 500 | exception |
//!
//! Storage validation errors become `BadRequest`; backend errors become
//! `InternalError`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use erezept_persistence::error::{BackendError, StorageError, ValidationError};
use serde_json::{Value, json};
use std::fmt;
use tracing::{error, warn};

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Resource not found (HTTP 404).
    NotFound {
        /// The resource type (e.g., "Patient").
        resource_type: String,
        /// The resource ID.
        id: String,
    },

    /// Bad request, usually a malformed body (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Unsupported media type (HTTP 415).
    UnsupportedMediaType {
        /// The unsupported content type.
        content_type: String,
    },

    /// Request body over the configured limit (HTTP 413).
    PayloadTooLarge {
        /// Error message.
        message: String,
    },

    /// Well-formed request that cannot be processed (HTTP 422).
    UnprocessableEntity {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Creates a not-found error for `resource_type/id`.
    pub fn not_found(resource_type: &str, id: &str) -> Self {
        RestError::NotFound {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }

    /// Creates a bad-request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest {
            message: message.into(),
        }
    }

    /// The HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RestError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RestError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The FHIR `IssueType` code for this error.
    pub fn issue_code(&self) -> &'static str {
        match self {
            RestError::NotFound { .. } => "not-found",
            RestError::BadRequest { .. } => "invalid",
            RestError::UnsupportedMediaType { .. } => "not-supported",
            RestError::PayloadTooLarge { .. } => "too-costly",
            RestError::UnprocessableEntity { .. } => "processing",
            RestError::InternalError { .. } => "exception",
        }
    }

    /// Human-readable text placed in `issue.diagnostics`.
    pub fn diagnostics(&self) -> String {
        match self {
            RestError::NotFound { resource_type, id } => {
                format!("{}/{} not found", resource_type, id)
            }
            RestError::UnsupportedMediaType { content_type } => {
                format!("Content type '{}' is not supported", content_type)
            }
            RestError::BadRequest { message }
            | RestError::PayloadTooLarge { message }
            | RestError::UnprocessableEntity { message }
            | RestError::InternalError { message } => message.clone(),
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound { resource_type, id } => {
                write!(f, "Resource not found: {}/{}", resource_type, id)
            }
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::UnsupportedMediaType { content_type } => {
                write!(f, "Unsupported media type: {}", content_type)
            }
            RestError::PayloadTooLarge { message } => write!(f, "Payload too large: {}", message),
            RestError::UnprocessableEntity { message } => {
                write!(f, "Unprocessable entity: {}", message)
            }
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else if !matches!(self, RestError::NotFound { .. }) {
            warn!(error = %self, "Request rejected");
        }

        let outcome = operation_outcome("error", self.issue_code(), &self.diagnostics());
        (status, Json(outcome)).into_response()
    }
}

/// Creates a FHIR OperationOutcome with a single issue.
///
/// # Arguments
///
/// * `severity` - The issue severity (fatal, error, warning, information)
/// * `code` - The FHIR issue code
/// * `diagnostics` - Human-readable details
pub fn operation_outcome(severity: &str, code: &str, diagnostics: &str) -> Value {
    json!({
        "resourceType": "OperationOutcome",
        "issue": [{
            "severity": severity,
            "code": code,
            "diagnostics": diagnostics
        }]
    })
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        RestError::InternalError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        RestError::BadRequest {
            message: format!("Invalid JSON: {}", err),
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = RestError::not_found("Patient", "123");
        assert_eq!(err.to_string(), "Resource not found: Patient/123");
        assert_eq!(err.diagnostics(), "Patient/123 not found");
    }

    #[test]
    fn test_status_and_issue_codes() {
        let cases = [
            (RestError::not_found("Patient", "1"), 404, "not-found"),
            (RestError::bad_request("x"), 400, "invalid"),
            (
                RestError::UnprocessableEntity {
                    message: "x".to_string(),
                },
                422,
                "processing",
            ),
            (
                RestError::InternalError {
                    message: "x".to_string(),
                },
                500,
                "exception",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_code().as_u16(), status);
            assert_eq!(err.issue_code(), code);
        }
    }

    #[test]
    fn test_operation_outcome_shape() {
        let outcome = operation_outcome("error", "not-found", "Patient/1 not found");
        assert_eq!(outcome["resourceType"], "OperationOutcome");
        assert_eq!(outcome["issue"][0]["severity"], "error");
        assert_eq!(outcome["issue"][0]["code"], "not-found");
        assert_eq!(outcome["issue"][0]["diagnostics"], "Patient/1 not found");
    }

    #[test]
    fn test_from_storage_validation_error() {
        let err: RestError = StorageError::from(ValidationError::MissingResourceType).into();
        assert!(matches!(err, RestError::BadRequest { .. }));
    }

    #[test]
    fn test_from_storage_backend_error() {
        let err: RestError = StorageError::from(BackendError::Internal {
            backend_name: "memory".to_string(),
            message: "boom".to_string(),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<Value>("{").unwrap_err();
        let err: RestError = json_err.into();
        assert!(err.diagnostics().starts_with("Invalid JSON"));
    }
}
