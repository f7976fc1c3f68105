use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STATUS_OK: &str = "0";
pub const STATUS_ERROR: &str = "-1";

pub const MSG_SUCCESS: &str = "Success";
pub const MSG_FAILURE: &str = "Failure";
pub const MSG_FAILED: &str = "Failed";
pub const MSG_INVALID_TOKEN: &str = "Invalid token";

/// The `{status, msg, data, desc}` body every endpoint returns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub status: String,
    pub msg: String,
    pub data: Option<T>,
    pub desc: String,
}

impl<T> Envelope<T> {
    pub fn success(data: Option<T>, desc: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            msg: MSG_SUCCESS.to_string(),
            data,
            desc: desc.into(),
        }
    }

    pub fn failure(msg: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            msg: msg.into(),
            data: None,
            desc: desc.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Wrapper for handler results that renders the success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub desc: String,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying a payload
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            desc: String::new(),
            status_code: StatusCode::OK,
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// Override the HTTP status code
    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }
}

impl ApiResponse<Value> {
    /// Successful response with no payload, e.g. "Create successfully"
    pub fn done(desc: impl Into<String>) -> Self {
        Self {
            data: None,
            desc: desc.into(),
            status_code: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match self.data.map(serde_json::to_value).transpose() {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(Envelope::<Value>::failure(MSG_FAILED, "Failed to serialize response data")),
                )
                    .into_response();
            }
        };

        (self.status_code, Json(Envelope::success(data_value, self.desc))).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_shape() {
        let envelope = Envelope::success(Some(json!({"id": 1})), "");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"status": "0", "msg": "Success", "data": {"id": 1}, "desc": ""}));
    }

    #[test]
    fn message_only_success_has_null_data() {
        let envelope: Envelope<Value> = Envelope::success(None, "Create successfully");
        let value = serde_json::to_value(&envelope).unwrap();
        assert!(value["data"].is_null());
        assert_eq!(value["desc"], "Create successfully");
        assert!(envelope.is_success());
    }

    #[test]
    fn failure_envelope_shape() {
        let envelope: Envelope<Value> = Envelope::failure(MSG_FAILURE, "boom");
        assert!(!envelope.is_success());
        assert_eq!(envelope.status, "-1");
        assert!(envelope.data.is_none());
    }
}
