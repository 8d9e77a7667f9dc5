use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::validation::validate_username;
use super::{ApiError, ApiResponse, AppState};
use crate::services::{LoginResult, UserInfo};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct ApiKeyResponse {
    pub api_key: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that checks:
/// 1. `X-Api-Key` header
/// 2. `Authorization: Bearer <api_key>` header
///
/// On success the caller's [`UserInfo`] is added to the request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(key) = extract_api_key(&headers) {
        match state.auth_service().authenticate(&key).await {
            Ok(Some(user)) => {
                tracing::Span::current().record("user_id", user.username.as_str());
                request.extensions_mut().insert(user);
                return Ok(next.run(request).await);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "API key lookup failed"),
        }
    }

    let response = (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error("Unauthorized")),
    );
    Ok(response.into_response())
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with username and password, returns API key on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let result = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// POST /auth/signup
/// Create a regular account, returns its API key
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResult>>), ApiError> {
    let username = validate_username(&payload.username)?;

    let result = state
        .auth_service()
        .signup(username, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(result))))
}

/// GET /auth/me
pub async fn get_current_user(
    Extension(user): Extension<UserInfo>,
) -> Json<ApiResponse<UserInfo>> {
    Json(ApiResponse::success(user))
}

/// POST /auth/api-key/regenerate
/// Generate a new random API key; the old one stops working
pub async fn regenerate_api_key(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
) -> Result<Json<ApiResponse<ApiKeyResponse>>, ApiError> {
    let api_key = state
        .auth_service()
        .regenerate_api_key(&user.username)
        .await?;

    tracing::info!("API key regenerated for user: {}", user.username);

    Ok(Json(ApiResponse::success(ApiKeyResponse { api_key })))
}
