//! Service banner and health check

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::error::ServiceResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": "GastroMind backend is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "menu": "/api/menu",
            "customers": "/api/customers",
            "reservations": "/api/reservations",
            "orders": "/api/orders",
            "reports": "/api/reports",
            "feedback": "/api/feedback",
        }
    }))
}

/// Pings the store; 503 when it cannot be reached
async fn health_check(State(state): State<AppState>) -> ServiceResult<Json<Value>> {
    state.gateway.ping().await?;
    Ok(Json(json!({
        "status": "healthy",
        "service": "gastro-server",
        "version": env!("CARGO_PKG_VERSION"),
        "database": "ok",
    })))
}
