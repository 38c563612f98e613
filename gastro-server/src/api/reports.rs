use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};

use crate::db::{Row, reports};
use crate::error::ServiceResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/reports", get(index))
        .route("/api/reports/{name}", get(run))
}

/// Available reports
async fn index() -> Json<Vec<Value>> {
    Json(
        reports::REPORTS
            .iter()
            .map(|r| {
                json!({
                    "name": r.name,
                    "description": r.description,
                    "path": format!("/api/reports/{}", r.name),
                })
            })
            .collect(),
    )
}

async fn run(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ServiceResult<Json<Vec<Row>>> {
    let report = reports::find(&name).ok_or_else(|| {
        AppError::new(ErrorCode::ReportNotFound)
            .with_detail("report", name.as_str())
            .with_detail("available", reports::names().collect::<Vec<_>>())
    })?;
    Ok(Json(report.run(&state.gateway).await?))
}
