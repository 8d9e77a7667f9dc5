use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CatalogPageDto};
use crate::domain::TagId;
use crate::domain::catalog::{CatalogParams, CatalogScope};
use crate::services::UserInfo;

/// Lists all cards.
///
/// # Endpoint
/// `GET /api/cards/catalog?sort=&order=&search_query=&page=&status=&has_code=`
///
/// Unknown parameter values fall back to defaults; the effective values are
/// echoed in the response.
pub async fn list_catalog(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<ApiResponse<CatalogPageDto>>, ApiError> {
    let page = state
        .catalog_service()
        .list_cards(CatalogScope::All, &params)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

/// `GET /api/categories/{slug}/cards`. An unknown slug is an empty page.
pub async fn list_category_cards(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<ApiResponse<CatalogPageDto>>, ApiError> {
    let page = state
        .catalog_service()
        .list_cards(CatalogScope::Category(slug), &params)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

/// `GET /api/tags/{id}/cards`. An unknown id is an empty page.
pub async fn list_tag_cards(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<ApiResponse<CatalogPageDto>>, ApiError> {
    let page = state
        .catalog_service()
        .list_cards(CatalogScope::Tag(TagId::new(id)), &params)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

/// `GET /api/profile/cards`: the caller's own cards.
pub async fn list_profile_cards(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<ApiResponse<CatalogPageDto>>, ApiError> {
    let page = state
        .catalog_service()
        .list_cards(CatalogScope::Author(user.id), &params)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}
