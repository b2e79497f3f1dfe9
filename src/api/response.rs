//! Response types for the Gratuity Tracker API.
//!
//! This module defines the error response structures and the mapping from
//! [`TrackerError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }
}

/// Body returned after a report email is handed to the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSent {
    /// Always `true`; failures are reported as errors.
    pub sent: bool,
    /// The address the report went to.
    pub recipient: String,
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with a validation error body.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::validation_error(message),
        }
    }

    /// A 500 response for failures outside [`TrackerError`].
    pub fn internal(details: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::with_details("INTERNAL_ERROR", "Internal server error", details),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<TrackerError> for ApiErrorResponse {
    fn from(error: TrackerError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            TrackerError::ConfigNotFound { .. }
            | TrackerError::ConfigParseError { .. }
            | TrackerError::InvalidConfig { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            TrackerError::MalformedUpload { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "MALFORMED_UPLOAD",
                    message,
                    "Upload a .csv or .xlsx file based on the template",
                ),
            ),
            TrackerError::MissingColumns { columns } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details("MISSING_COLUMNS", message, columns.join(", ")),
            ),
            TrackerError::MissingJoiningDate { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("MISSING_JOINING_DATE", message),
            ),
            TrackerError::Export { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("EXPORT_ERROR", "Export failed", message),
            ),
            TrackerError::Storage { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("STORAGE_ERROR", "Record store unavailable", message),
            ),
            TrackerError::Mail { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::with_details("MAIL_DELIVERY_FAILED", "Report email was not sent", message),
            ),
            TrackerError::MailNotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("MAIL_NOT_CONFIGURED", message),
            ),
            TrackerError::AuthenticationFailed { .. } => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("UNAUTHORIZED", message),
            ),
            TrackerError::InvalidRequest { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::validation_error(message))
            }
        };
        Self { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_missing_columns_maps_to_bad_request() {
        let response: ApiErrorResponse = TrackerError::MissingColumns {
            columns: vec!["Exit Date".to_string()],
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "MISSING_COLUMNS");
        assert_eq!(response.error.details.as_deref(), Some("Exit Date"));
    }

    #[test]
    fn test_mail_errors_map_to_gateway_statuses() {
        let failed: ApiErrorResponse = TrackerError::Mail {
            message: "connection refused".to_string(),
        }
        .into();
        assert_eq!(failed.status, StatusCode::BAD_GATEWAY);

        let missing: ApiErrorResponse = TrackerError::MailNotConfigured.into();
        assert_eq!(missing.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_auth_failure_maps_to_unauthorized() {
        let response: ApiErrorResponse = TrackerError::AuthenticationFailed {
            message: "nope".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_storage_error_maps_to_internal() {
        let response: ApiErrorResponse = TrackerError::Storage {
            path: "/data/employees.xlsx".to_string(),
            message: "disk full".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.code, "STORAGE_ERROR");
    }
}
