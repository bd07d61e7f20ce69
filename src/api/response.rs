//! Response types for the site payroll API.
//!
//! This module defines the error response structures and maps every
//! engine error to an HTTP status.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

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

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                let body_text = err.body_text();
                if body_text.contains("missing field") {
                    ApiError::new("VALIDATION_ERROR", body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::malformed_json("Failed to parse request body"),
        };
        Self::new(StatusCode::BAD_REQUEST, error)
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                )
            }
            EngineError::Storage { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("STORAGE_ERROR", "Storage failure", message),
            ),
            EngineError::WorkerNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("WORKER_NOT_FOUND", message),
            ),
            EngineError::SiteNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("SITE_NOT_FOUND", message),
            ),
            EngineError::AttendanceNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("ATTENDANCE_NOT_FOUND", message),
            ),
            EngineError::NotAssigned { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "NOT_ASSIGNED",
                    message,
                    "Assign the worker to a site before punching in",
                ),
            ),
            EngineError::InvalidAttendance { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_ATTENDANCE", message),
            ),
            EngineError::InvalidAmount { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_AMOUNT", message),
            ),
            EngineError::InvalidSettlement { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_SETTLEMENT", message),
            ),
            EngineError::AlreadyOnShift { record_id, .. } => Self::new(
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "ALREADY_ON_SHIFT",
                    message,
                    format!("Punch out of record '{}' first", record_id),
                ),
            ),
            EngineError::AttendanceAlreadyClosed { .. } => Self::new(
                StatusCode::CONFLICT,
                ApiError::new("ATTENDANCE_ALREADY_CLOSED", message),
            ),
            EngineError::LocationUnavailable { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "LOCATION_UNAVAILABLE",
                    message,
                    "Enable location services and retry",
                ),
            ),
            EngineError::GeofenceViolation { distance_m, .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "GEOFENCE_VIOLATION",
                    message,
                    format!("distance_m={:.1}", distance_m),
                ),
            ),
        }
    }
}
