use crate::handlers::auth::{ErrorResponse, MessageResponse};
use crate::middleware::AuthUser;
use crate::AppState;
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tickethub_auth::AuthError;
use tickethub_models::{MembershipWithProfile, Organization};
use tickethub_org::OrgError;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CreateOrganizationResponse {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub organization: Option<Organization>,
}

#[derive(Debug, Deserialize)]
pub struct SwitchContextRequest {
    pub organization_id: Uuid,
}

/// Resolve the caller's current organisation, or answer the "no
/// organisation context" state shared by every organisation-scoped handler.
pub(crate) async fn resolve_context(
    state: &AppState,
    user_id: Uuid,
) -> Result<Uuid, (StatusCode, Json<ErrorResponse>)> {
    match state.resolver.resolve(user_id).await {
        Ok(Some(organization_id)) => Ok(organization_id),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                "no_organization_context",
                "You are not a member of any organisation",
            )),
        )),
        Err(e) => {
            tracing::error!("Organisation resolution error: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error", &e.to_string())),
            ))
        }
    }
}

/// Organisation sign-up (public)
/// POST /api/organizations
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<tickethub_org::BootstrapRequest>,
) -> Result<Json<CreateOrganizationResponse>, (StatusCode, Json<ErrorResponse>)> {
    let outcome = state
        .organization_service
        .bootstrap(request)
        .await
        .map_err(|e| {
            tracing::error!("Organisation sign-up error: {}", e);
            let (status, error_code) = match &e {
                OrgError::Identity(AuthError::AlreadyExists(_)) => {
                    (StatusCode::CONFLICT, "email_exists")
                }
                OrgError::Identity(AuthError::WeakPassword(_)) => {
                    (StatusCode::BAD_REQUEST, "weak_password")
                }
                OrgError::Identity(_) => (StatusCode::BAD_REQUEST, "signup_failed"),
                OrgError::ValidationError(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            };

            (status, Json(ErrorResponse::new(error_code, &e.to_string())))
        })?;

    Ok(Json(CreateOrganizationResponse {
        organization_id: outcome.organization_id,
        user_id: outcome.user_id,
        message: "Organisation created. You can now sign in.".to_string(),
    }))
}

/// Current organisation context
/// GET /api/context
pub async fn get_context(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<ContextResponse>, (StatusCode, Json<ErrorResponse>)> {
    let resolved = state.resolver.resolve(auth_user.user_id).await.map_err(|e| {
        tracing::error!("Organisation resolution error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("internal_error", &e.to_string())),
        )
    })?;

    let organization = match resolved {
        Some(organization_id) => {
            match state.organization_service.organization(organization_id).await {
                Ok(org) => Some(org),
                Err(OrgError::Database(tickethub_database::DatabaseError::NotFound(_))) => {
                    tracing::warn!(
                        "Resolved organisation {} has no record; rendering empty context",
                        organization_id
                    );
                    None
                }
                Err(e) => {
                    tracing::error!("Organisation fetch error: {}", e);
                    return Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse::new("internal_error", &e.to_string())),
                    ));
                }
            }
        }
        None => None,
    };

    Ok(Json(ContextResponse { organization }))
}

/// Switch the selected organisation (validated lazily on next resolution)
/// PUT /api/context
pub async fn switch_context(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(request): Json<SwitchContextRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .resolver
        .switch(auth_user.user_id, request.organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Organisation switch error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error", &e.to_string())),
            )
        })?;

    Ok(Json(MessageResponse {
        message: "Organisation switched".to_string(),
    }))
}

/// List the current organisation's members
/// GET /api/members
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<MembershipWithProfile>>, (StatusCode, Json<ErrorResponse>)> {
    let organization_id = resolve_context(&state, auth_user.user_id).await?;

    let members = state
        .member_service
        .list(organization_id)
        .await
        .map_err(|e| {
            tracing::error!("List members error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error", &e.to_string())),
            )
        })?;

    Ok(Json(members))
}

/// Remove a member from the current organisation
/// DELETE /api/members/:user_id
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Self-removal is not offered at the interface level
    if auth_user.user_id == user_id {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "cannot_remove_self",
                "You cannot remove your own membership",
            )),
        ));
    }

    let organization_id = resolve_context(&state, auth_user.user_id).await?;

    state
        .member_service
        .remove(user_id, organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Remove member error: {}", e);
            let (status, error_code) = match &e {
                OrgError::Forbidden(_) => (StatusCode::FORBIDDEN, "last_admin"),
                OrgError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            };

            (status, Json(ErrorResponse::new(error_code, &e.to_string())))
        })?;

    Ok(Json(MessageResponse {
        message: "Member removed".to_string(),
    }))
}
