use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, BulkStatusRequest, BulkStatusResponse, CardDetailDto,
    CardDto, CardRequest,
};
use crate::api::validation::{validate_bulk_ids, validate_card_id};
use crate::domain::CardId;
use crate::services::{Preview, PreviewRequest, UserInfo, render_preview};

/// Returns one card and counts the view.
///
/// # Endpoint
/// `GET /api/cards/{id}`
///
/// `views` in the response is the count before this request.
pub async fn get_card(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CardDetailDto>>, ApiError> {
    let id = validate_card_id(id)?;
    let detail = state.catalog_service().get_card(CardId::new(id)).await?;
    Ok(Json(ApiResponse::success(detail)))
}

pub async fn create_card(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
    Json(payload): Json<CardRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CardDto>>), ApiError> {
    let card = state.catalog_service().create_card(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(card))))
}

pub async fn update_card(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
    Path(id): Path<i32>,
    Json(payload): Json<CardRequest>,
) -> Result<Json<ApiResponse<CardDto>>, ApiError> {
    let id = validate_card_id(id)?;
    let card = state
        .catalog_service()
        .update_card(&user, CardId::new(id), payload)
        .await?;
    Ok(Json(ApiResponse::success(card)))
}

pub async fn delete_card(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_card_id(id)?;
    state
        .catalog_service()
        .delete_card(&user, CardId::new(id))
        .await?;
    Ok(Json(ApiResponse::success(())))
}

/// Staff action: mark many cards checked or unchecked.
///
/// # Endpoint
/// `POST /api/cards/status` with `{ "ids": [..], "status": "checked" }`
pub async fn set_cards_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
    Json(payload): Json<BulkStatusRequest>,
) -> Result<Json<ApiResponse<BulkStatusResponse>>, ApiError> {
    let ids = validate_bulk_ids(&payload.ids)?;
    let updated = state
        .catalog_service()
        .set_status(&user, ids, payload.status)
        .await?;
    Ok(Json(ApiResponse::success(BulkStatusResponse { updated })))
}

/// Renders a draft without storing it.
pub async fn preview_card(Json(draft): Json<PreviewRequest>) -> Json<ApiResponse<Preview>> {
    Json(ApiResponse::success(render_preview(&draft)))
}
