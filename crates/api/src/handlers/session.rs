use crate::handlers::auth::{ErrorResponse, MessageResponse};
use crate::handlers::organization::resolve_context;
use crate::middleware::AuthUser;
use crate::AppState;
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tickethub_database::{SessionRepository, TemplateRepository};
use tickethub_models::{NewSession, PublicSession, Session, SessionWithTemplate};
use uuid::Uuid;

/// List the current organisation's sessions with template details
/// GET /api/sessions
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<SessionWithTemplate>>, (StatusCode, Json<ErrorResponse>)> {
    let organization_id = resolve_context(&state, auth_user.user_id).await?;

    let repo = SessionRepository::new(state.db.pool().clone());
    let sessions = repo.list_by_organization(organization_id).await.map_err(|e| {
        tracing::error!("List sessions error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("internal_error", &e.to_string())),
        )
    })?;

    Ok(Json(sessions))
}

/// Schedule a session from one of the current organisation's templates
/// POST /api/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(request): Json<NewSession>,
) -> Result<Json<Session>, (StatusCode, Json<ErrorResponse>)> {
    let organization_id = resolve_context(&state, auth_user.user_id).await?;

    // The template must belong to the caller's organisation
    let template_repo = TemplateRepository::new(state.db.pool().clone());
    let template = template_repo
        .find_by_id(request.template_id)
        .await
        .map_err(|e| {
            tracing::error!("Template lookup error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error", &e.to_string())),
            )
        })?;

    match template {
        Some(t) if t.organization_id == organization_id => {}
        _ => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    "template_not_found",
                    "Template not found in this organisation",
                )),
            ));
        }
    }

    let repo = SessionRepository::new(state.db.pool().clone());
    let session = repo.create(&request).await.map_err(|e| {
        tracing::error!("Create session error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("internal_error", &e.to_string())),
        )
    })?;

    tracing::info!(
        "Session created: id={}, template={}, date={}",
        session.id,
        session.template_id,
        session.session_date
    );

    Ok(Json(session))
}

/// Delete a session belonging to the current organisation
/// DELETE /api/sessions/:session_id
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    let organization_id = resolve_context(&state, auth_user.user_id).await?;

    let repo = SessionRepository::new(state.db.pool().clone());
    let deleted = repo
        .delete_scoped(session_id, organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Delete session error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error", &e.to_string())),
            )
        })?;

    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                "session_not_found",
                "Session not found in this organisation",
            )),
        ));
    }

    Ok(Json(MessageResponse {
        message: "Session deleted".to_string(),
    }))
}

/// Public listing of active sessions across all organisations
/// GET /api/public/sessions
pub async fn public_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PublicSession>>, (StatusCode, Json<ErrorResponse>)> {
    let repo = SessionRepository::new(state.db.pool().clone());
    let sessions = repo.list_public_active().await.map_err(|e| {
        tracing::error!("Public sessions error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("internal_error", &e.to_string())),
        )
    })?;

    Ok(Json(sessions))
}
