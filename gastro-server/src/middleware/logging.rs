//! Request logging middleware
//!
//! Runs each request inside an `http` span carrying the request id, method
//! and matched route, so store and cascade logs emitted by the handler can
//! be tied back to the request. One completion line per request; 4xx and
//! 5xx complete at `warn`.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    // Normally set by SetRequestIdLayer
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    // Route template keeps ids out of the field: /api/customers/{customer_id}
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned());
    let path = route.unwrap_or_else(|| req.uri().path().to_owned());

    let span = tracing::info_span!(
        "http",
        request_id = %request_id,
        method = %req.method(),
        path = %path,
    );

    async move {
        let start = Instant::now();
        let response = next.run(req).await;
        let status = response.status().as_u16();
        let latency_ms = start.elapsed().as_millis() as u64;

        match status {
            500.. => tracing::warn!(status, latency_ms, "Request failed"),
            400..500 => tracing::warn!(status, latency_ms, "Request rejected"),
            _ => tracing::info!(status, latency_ms, "Request completed"),
        }
        response
    }
    .instrument(span)
    .await
}
