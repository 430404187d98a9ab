use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::services::ServiceError;

// ============================================================================
// Error status enum
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStatus {
    /// Server fault (5xx)
    Error,
    /// Client mistake (4xx)
    Fail,
}

// ============================================================================
// Error envelope
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub status: ErrorStatus,
}

impl ErrorBody {
    pub fn response(
        status_code: StatusCode,
        status: ErrorStatus,
        message: impl Into<String>,
    ) -> (StatusCode, Json<ErrorBody>) {
        (
            status_code,
            Json(ErrorBody {
                error: message.into(),
                status,
            }),
        )
    }
}

/// Plain `{ "message": ... }` acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<MessageResponse> {
        Json(MessageResponse {
            message: message.into(),
        })
    }
}

// ============================================================================
// Unified error type for handlers
// ============================================================================

/// An error that is either a fail (4xx) or an error (5xx).
#[derive(Debug)]
pub enum ApiError {
    Fail(StatusCode, String),
    Error(StatusCode, String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Fail(code, msg) => {
                ErrorBody::response(code, ErrorStatus::Fail, msg).into_response()
            }
            ApiError::Error(code, msg) => {
                ErrorBody::response(code, ErrorStatus::Error, msg).into_response()
            }
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::NOT_FOUND, message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::PAYLOAD_TOO_LARGE, message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Error(StatusCode::INTERNAL_SERVER_ERROR, message.into())
    }

    /// Map a service error, replacing the text of server faults with
    /// `fallback` so internal details stay in the log.
    pub fn from_service(e: ServiceError, fallback: &str) -> Self {
        match e {
            ServiceError::InvalidInput(msg) => ApiError::bad_request(msg),
            ServiceError::NoPhoto | ServiceError::UnsupportedMediaType => {
                ApiError::bad_request(e.to_string())
            }
            ServiceError::PayloadTooLarge { .. } => ApiError::payload_too_large(e.to_string()),
            ServiceError::PhotoNotFound => ApiError::not_found(e.to_string()),
            ServiceError::Transcode(_)
            | ServiceError::Database(_)
            | ServiceError::Blob(_)
            | ServiceError::Join(_) => {
                tracing::error!(error = %e, "{fallback}");
                ApiError::internal(fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_their_message() {
        match ApiError::from_service(ServiceError::NoPhoto, "Failed to upload photo") {
            ApiError::Fail(code, msg) => {
                assert_eq!(code, StatusCode::BAD_REQUEST);
                assert_eq!(msg, "No photo provided");
            }
            other => panic!("expected fail, got {other:?}"),
        }
    }

    #[test]
    fn test_faults_hide_details() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "/secret/path: disk full");
        let err = ServiceError::Blob(io.into());
        match ApiError::from_service(err, "Failed to upload photo") {
            ApiError::Error(code, msg) => {
                assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(msg, "Failed to upload photo");
            }
            other => panic!("expected error, got {other:?}"),
        }
    }
}
