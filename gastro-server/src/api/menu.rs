use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};

use crate::db::{Row, menu};
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::validation::parse_id;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/menu", get(list))
        .route("/api/menu/categories", get(list_categories))
        .route("/api/menu/category/{category_id}", get(list_by_category))
}

/// Priciest first
async fn list(State(state): State<AppState>) -> ServiceResult<Json<Vec<Row>>> {
    Ok(Json(menu::list_menu(&state.gateway).await?))
}

async fn list_categories(State(state): State<AppState>) -> ServiceResult<Json<Vec<Row>>> {
    Ok(Json(menu::list_categories(&state.gateway).await?))
}

/// Cheapest first. An existing category without items is an empty array.
async fn list_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> ServiceResult<Json<Vec<Row>>> {
    let category_id = parse_id(&category_id, "category_id")?;
    let items = menu::list_by_category(&state.gateway, category_id).await?;
    if items.is_empty() && !menu::category_exists(&state.gateway, category_id).await? {
        return Err(AppError::new(ErrorCode::CategoryNotFound)
            .with_detail("category_id", category_id)
            .into());
    }
    Ok(Json(items))
}
