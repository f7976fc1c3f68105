// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::Value;

use crate::api::envelope::{Envelope, MSG_FAILED, MSG_FAILURE, MSG_INVALID_TOKEN};

/// Client-facing failure classes. Every variant renders as the `{status:"-1", ...}` envelope.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    InvalidJson(String),
    InvalidToken(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    Decode(String),
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidJson(_) | ApiError::InvalidToken(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Decode(_) | ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// The envelope `msg` for this failure class
    pub fn msg(&self) -> &'static str {
        match self {
            ApiError::InvalidToken(_) => MSG_INVALID_TOKEN,
            ApiError::NotFound(_) | ApiError::Decode(_) => MSG_FAILED,
            _ => MSG_FAILURE,
        }
    }

    /// Get client-safe description, placed in the envelope `desc`
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::InvalidJson(msg) => msg,
            ApiError::InvalidToken(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::Decode(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    pub fn to_envelope(&self) -> Envelope<Value> {
        Envelope::failure(self.msg(), self.message())
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        ApiError::InvalidToken(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ApiError::Decode(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        match err {
            crate::database::manager::DatabaseError::ConfigMissing(_) => {
                tracing::error!("Database configuration error: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            crate::database::manager::DatabaseError::Migration(e) => {
                tracing::error!("Migration error: {}", e);
                ApiError::service_unavailable("Service is being updated, please try again later")
            }
            crate::database::manager::DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<crate::services::ServiceError> for ApiError {
    fn from(err: crate::services::ServiceError) -> Self {
        use crate::services::ServiceError;

        match err {
            ServiceError::NotFound(what) => ApiError::not_found(format!("{} not found", what)),
            ServiceError::Conflict(msg) => ApiError::bad_request(msg),
            ServiceError::Invalid(msg) => ApiError::bad_request(msg),
            ServiceError::Decode { what, source } => {
                tracing::warn!("Failed to decode {}: {}", what, source);
                ApiError::decode(format!("Failed to decode {}", what))
            }
            ServiceError::Unresolved(msg) => ApiError::internal_server_error(msg),
            ServiceError::Password(msg) => {
                tracing::error!("Password hashing error: {}", msg);
                ApiError::internal_server_error("Failed to process credentials")
            }
            ServiceError::Database(sqlx::Error::RowNotFound) => ApiError::not_found("Record not found"),
            ServiceError::Database(sqlx_err) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("Database query error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceError;

    #[test]
    fn maps_failure_classes_to_status_codes() {
        assert_eq!(ApiError::invalid_json("bad").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("no").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::decode("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::payload_too_large("big").status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(ApiError::payload_too_large("big").msg(), "Failure");
    }

    #[test]
    fn envelope_carries_failure_status() {
        let json = serde_json::to_value(ApiError::not_found("form not found").to_envelope()).unwrap();
        assert_eq!(json["status"], "-1");
        assert_eq!(json["msg"], "Failed");
        assert_eq!(json["desc"], "form not found");
        assert!(json["data"].is_null());
    }

    #[test]
    fn invalid_token_uses_its_own_msg() {
        let err = ApiError::invalid_token("orgId not found in token");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.msg(), "Invalid token");
    }

    #[test]
    fn storage_errors_are_sanitized() {
        let err: ApiError = ServiceError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Database error occurred");
    }

    #[test]
    fn conflict_is_client_error() {
        let err: ApiError = ServiceError::Conflict("form name already exists".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "form name already exists");
    }
}
