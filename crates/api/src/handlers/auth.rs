use crate::middleware::AuthUser;
use crate::AppState;
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tickethub_auth::{AuthError, AuthResponse, SignInRequest};
use tickethub_models::Profile;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Sign in with email and password
/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.identity_service.sign_in_with_password(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::warn!("Login error: {}", e);
            let (status, error_code) = match &e {
                AuthError::InvalidCredentials | AuthError::UserInactive => {
                    (StatusCode::UNAUTHORIZED, "invalid_credentials")
                }
                AuthError::ValidationError(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            };

            Err((status, Json(ErrorResponse::new(error_code, &e.to_string()))))
        }
    }
}

/// Exchange a refresh token for a fresh access token
/// POST /api/auth/refresh
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .identity_service
        .refresh(&request.refresh_token)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::debug!("Refresh error: {}", e);
            let (status, error_code) = match &e {
                AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                    (StatusCode::UNAUTHORIZED, "invalid_token")
                }
                AuthError::UserInactive => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            };

            (status, Json(ErrorResponse::new(error_code, &e.to_string())))
        })
}

/// Sign out: revoke the refresh session
/// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .identity_service
        .sign_out(&request.refresh_token)
        .await
        .map_err(|e| {
            tracing::error!("Logout error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error", &e.to_string())),
            )
        })?;

    Ok(Json(MessageResponse {
        message: "Signed out".to_string(),
    }))
}

/// The caller's profile
/// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Profile>, (StatusCode, Json<ErrorResponse>)> {
    state
        .identity_service
        .current_user(auth_user.user_id)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Profile lookup error: {}", e);
            let (status, error_code) = match &e {
                AuthError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            };

            (status, Json(ErrorResponse::new(error_code, &e.to_string())))
        })
}
