use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{FeedbackCreate, RatingSummary};

use crate::db::{Row, feedback};
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::validation::{MAX_NOTE_LEN, require, validate_optional_text, validate_positive_id};

use super::json_body;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/feedback", get(list).post(create))
        .route("/api/feedback/rating-summary", get(rating_summary))
}

async fn list(State(state): State<AppState>) -> ServiceResult<Json<Vec<Row>>> {
    Ok(Json(feedback::list_feedback(&state.gateway).await?))
}

async fn rating_summary(State(state): State<AppState>) -> ServiceResult<Json<RatingSummary>> {
    Ok(Json(feedback::rating_summary(&state.gateway).await?))
}

async fn create(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackCreate>, JsonRejection>,
) -> ServiceResult<(StatusCode, Json<Value>)> {
    let data = json_body(payload)?;

    let session_id = validate_positive_id(require(data.session_id, "session_id")?, "session_id")?;
    let rating = require(data.rating, "rating")?;
    if !(1..=5).contains(&rating) {
        return Err(AppError::new(ErrorCode::InvalidRating)
            .with_detail("field", "rating")
            .with_detail("value", rating)
            .into());
    }
    validate_optional_text(&data.comment, "comment", MAX_NOTE_LEN)?;

    if !feedback::session_exists(&state.gateway, session_id).await? {
        return Err(AppError::with_message(
            ErrorCode::SessionNotFound,
            "Invalid session_id - session does not exist",
        )
        .with_detail("session_id", session_id)
        .into());
    }

    let comment = data.comment.unwrap_or_default();
    let feedback_id =
        feedback::create_feedback(&state.gateway, session_id, rating, &comment).await?;
    tracing::info!(feedback_id, session_id, rating, "Feedback saved");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Feedback saved successfully",
            "feedback_id": feedback_id,
        })),
    ))
}
