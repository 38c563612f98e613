//! Service-layer error type
//!
//! `ServiceError` bridges store errors (`GatewayError`) and the API-layer
//! error (`AppError`), so handlers can use `?` on both.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::GatewayError;

/// - `Db`: store failure (logged, mapped by kind)
/// - `App`: business-rule error, passed through to the client
#[derive(Debug)]
pub enum ServiceError {
    Db(GatewayError),
    App(AppError),
}

impl From<GatewayError> for ServiceError {
    fn from(e: GatewayError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) if db_err.is_connection() => {
                tracing::error!(error = %db_err, "Database unavailable");
                AppError::new(ErrorCode::DatabaseUnavailable)
            }
            ServiceError::Db(db_err) if db_err.is_constraint_violation() => {
                tracing::warn!(error = %db_err, "Write rejected by constraint");
                AppError::validation("Referenced record does not exist or value is not allowed")
            }
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
