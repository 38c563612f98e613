//! Error type and the error response envelope

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Every handler failure ends up as one of these. `details` carries the
/// offending field, the id that was looked up, or the store's reason.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the default message for `code`
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// `Missing required field: <field>`, with the field name in details
    pub fn required_field(field: impl Into<String>) -> Self {
        let f = field.into();
        Self::with_message(
            ErrorCode::RequiredField,
            format!("Missing required field: {f}"),
        )
        .with_detail("field", f)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Body or query string could not be parsed
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }
}

/// Error body sent to clients: `{code, message, details?}`
///
/// Successful responses are bare JSON; only failures use the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }

    /// Error code of a received envelope, if it is one this crate knows
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::try_from(self.code).ok()
    }
}

impl From<AppError> for ApiResponse {
    fn from(err: AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message,
            details: err.details,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();

        if self.code.category() == ErrorCategory::System {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                details = ?self.details,
                "System error returned to client"
            );
        }

        (status, axum::Json(ApiResponse::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::CustomerNotFound);
        assert_eq!(err.message, "Customer not found");
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert!(err.details.is_none());
    }

    #[test]
    fn test_details_accumulate() {
        let err = AppError::new(ErrorCode::InvalidPartySize)
            .with_detail("field", "party_size")
            .with_detail("value", 0);

        let details = err.details.unwrap();
        assert_eq!(details["field"], "party_size");
        assert_eq!(details["value"], 0);
    }

    #[test]
    fn test_required_field() {
        let err = AppError::required_field("table_id");
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "Missing required field: table_id");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_envelope_shape() {
        let err = AppError::internal("Failed to delete customer").with_detail("customer_id", 12);
        let json = serde_json::to_value(ApiResponse::error(&err)).unwrap();
        assert_eq!(json["code"], 9001);
        assert_eq!(json["message"], "Failed to delete customer");
        assert_eq!(json["details"]["customer_id"], 12);

        let bare = serde_json::to_string(&ApiResponse::from(AppError::new(ErrorCode::NotFound)))
            .unwrap();
        assert!(!bare.contains("details"));
    }

    #[test]
    fn test_error_code_round_trip_from_body() {
        let body: ApiResponse =
            serde_json::from_str(r#"{"code":2002,"message":"Invalid status"}"#).unwrap();
        assert_eq!(body.error_code(), Some(ErrorCode::InvalidReservationStatus));
        assert_eq!(
            serde_json::from_str::<ApiResponse>(r#"{"code":4242,"message":"?"}"#)
                .unwrap()
                .error_code(),
            None
        );
    }
}
