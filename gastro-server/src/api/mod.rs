//! HTTP API
//!
//! Each resource module exposes `router()`; [`build_app`] merges them and
//! wraps the result in the shared middleware stack.

pub mod customers;
pub mod feedback;
pub mod health;
pub mod menu;
pub mod orders;
pub mod reports;
pub mod reservations;

use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, middleware};
use shared::error::{AppError, ErrorCode};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::middleware::logging_middleware;
use crate::state::AppState;

/// Full application router with middleware applied
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(menu::router())
        .merge(customers::router())
        .merge(reservations::router())
        .merge(orders::router())
        .merge(feedback::router())
        .merge(reports::router())
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
}

async fn not_found(uri: Uri) -> AppError {
    AppError::with_message(ErrorCode::NotFound, "Endpoint not found").with_detail("path", uri.path())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");
    AppError::new(ErrorCode::InternalError).into_response()
}

/// Unwrap a JSON body, turning extractor rejections into the error envelope
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::invalid_request(rejection.body_text()))
}
