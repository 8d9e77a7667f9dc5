use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::SiteContext;

/// `GET /api/site`: navigation menu and the cached counts.
pub async fn get_site(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SiteContext>>, ApiError> {
    let site = state.catalog_service().site_context().await?;
    Ok(Json(ApiResponse::success(site)))
}
