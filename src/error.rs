// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for the ledger, the completion adapters and the HTTP layer.

use crate::db::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

/// Caller input that was rejected before touching state or the network.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("entry id already exists: {0}")]
    DuplicateId(Uuid),

    #[error("goal must be a finite number")]
    InvalidGoal,

    #[error("description must not be empty")]
    EmptyDescription,

    #[error("at least one entry is required")]
    NoEntries,
}

/// Failures of a ledger operation.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The durable write failed. The in-memory mutation has already been applied.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

/// Failures of the estimation and insights adapters.
///
/// No transport or parse error type from the HTTP client leaks past this enum.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("completion service API key is not configured")]
    Configuration,

    #[error("completion service failed ({}): {body}", describe_status(.status))]
    Upstream { status: Option<u16>, body: String },

    #[error("malformed response from completion service: {0}")]
    MalformedResponse(String),
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {}", code),
        None => "no response".to_string(),
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Persistence(String),

    /// An adapter failure collapsed into a generic user-facing message.
    #[error("{message}")]
    Completion {
        message: &'static str,
        details: Option<String>,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Map an adapter failure onto the HTTP boundary.
    ///
    /// Validation failures stay 400s. Every other kind becomes `message`, with
    /// the underlying cause attached only when `expose_details` is set.
    pub fn from_adapter(err: AdapterError, message: &'static str, expose_details: bool) -> Self {
        match err {
            AdapterError::Validation(e) => AppError::BadRequest(e.to_string()),
            other => {
                tracing::warn!(error = %other, "Completion adapter failed");
                AppError::Completion {
                    message,
                    details: expose_details.then(|| other.to_string()),
                }
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(e) => e.into(),
            LedgerError::Persistence(e) => AppError::Persistence(e.to_string()),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request".to_string(), Some(msg)),
            AppError::Persistence(msg) => {
                tracing::error!(error = %msg, "Ledger persistence error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "persistence_error".to_string(),
                    None,
                )
            }
            AppError::Completion { message, details } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string(), details)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display_includes_status() {
        let err = AdapterError::Upstream {
            status: Some(502),
            body: "bad gateway".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "completion service failed (HTTP 502): bad gateway"
        );

        let err = AdapterError::Upstream {
            status: None,
            body: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("no response"));
    }

    #[test]
    fn test_adapter_validation_maps_to_bad_request() {
        let err = AppError::from_adapter(
            AdapterError::Validation(ValidationError::EmptyDescription),
            "Failed to estimate carbon footprint.",
            false,
        );
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_adapter_details_only_when_exposed() {
        let hidden = AppError::from_adapter(
            AdapterError::Configuration,
            "Failed to estimate carbon footprint.",
            false,
        );
        assert!(matches!(hidden, AppError::Completion { details: None, .. }));

        let shown = AppError::from_adapter(
            AdapterError::Configuration,
            "Failed to estimate carbon footprint.",
            true,
        );
        match shown {
            AppError::Completion { message, details } => {
                assert_eq!(message, "Failed to estimate carbon footprint.");
                assert!(details.unwrap().contains("not configured"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_completion_error_status() {
        let response = AppError::Completion {
            message: "Failed to analyze activity.",
            details: None,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
