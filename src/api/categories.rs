use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CategoryDto, CreateCategoryRequest};
use crate::services::UserInfo;

/// `GET /api/categories`: every category with its card count.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CategoryDto>>>, ApiError> {
    let categories = state.catalog_service().list_categories().await?;
    Ok(Json(ApiResponse::success(categories)))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryDto>>), ApiError> {
    let category = state
        .catalog_service()
        .create_category(&user, &payload.name, &payload.slug)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(category))))
}
