use crate::handlers::auth::{ErrorResponse, MessageResponse};
use crate::handlers::organization::resolve_context;
use crate::middleware::AuthUser;
use crate::AppState;
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tickethub_auth::{AuthError, AuthResponse, SignInRequest};
use tickethub_models::Invitation;
use tickethub_org::{AcceptOutcome, InviteRequest, OrgError};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CreateInvitationResponse {
    pub invitation: Invitation,
    pub accept_url: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyInvitationQuery {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyInvitationResponse {
    pub organization_id: Uuid,
    pub organization_name: String,
    pub email: String,
    pub role: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AcceptInvitationRequest {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AcceptSignupRequest {
    pub token: Option<String>,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AcceptSigninRequest {
    pub token: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AcceptInvitationResponse {
    pub outcome: String,
    pub organization_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AcceptSigninResponse {
    pub outcome: String,
    pub organization_id: Uuid,
    pub message: String,
    pub auth: AuthResponse,
}

fn missing_token() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(
            "missing_token",
            "No invitation token was provided",
        )),
    )
}

fn map_accept_error(e: &OrgError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, error_code) = match e {
        OrgError::InvitationNotFound => (StatusCode::NOT_FOUND, "invitation_not_found"),
        OrgError::Identity(AuthError::InvalidCredentials)
        | OrgError::Identity(AuthError::UserInactive) => {
            (StatusCode::UNAUTHORIZED, "invalid_credentials")
        }
        OrgError::Identity(AuthError::AlreadyExists(_)) => (StatusCode::CONFLICT, "email_exists"),
        OrgError::Identity(AuthError::WeakPassword(_)) => (StatusCode::BAD_REQUEST, "weak_password"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };

    (status, Json(ErrorResponse::new(error_code, &e.to_string())))
}

fn describe(outcome: AcceptOutcome) -> (String, Uuid, String) {
    match outcome {
        AcceptOutcome::Joined { organization_id } => (
            "joined".to_string(),
            organization_id,
            "You have joined the organisation.".to_string(),
        ),
        AcceptOutcome::AlreadyMember { organization_id } => (
            "already_member".to_string(),
            organization_id,
            "You are already a member of this organisation.".to_string(),
        ),
    }
}

/// Send an invitation from the current organisation
/// POST /api/invitations
pub async fn create_invitation(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(request): Json<InviteRequest>,
) -> Result<Json<CreateInvitationResponse>, (StatusCode, Json<ErrorResponse>)> {
    let organization_id = resolve_context(&state, auth_user.user_id).await?;

    let issued = state
        .invitation_service
        .create(organization_id, auth_user.user_id, request)
        .await
        .map_err(|e| {
            tracing::error!("Create invitation error: {}", e);
            let (status, error_code) = match &e {
                OrgError::InvalidRole(_) => (StatusCode::BAD_REQUEST, "invalid_role"),
                OrgError::ValidationError(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
                OrgError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            };

            (status, Json(ErrorResponse::new(error_code, &e.to_string())))
        })?;

    let email = issued.invitation.email.clone();

    Ok(Json(CreateInvitationResponse {
        invitation: issued.invitation,
        accept_url: issued.accept_url,
        message: format!("Invitation created for {}", email),
    }))
}

/// List the current organisation's pending invitations
/// GET /api/invitations
pub async fn list_invitations(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<Invitation>>, (StatusCode, Json<ErrorResponse>)> {
    let organization_id = resolve_context(&state, auth_user.user_id).await?;

    let invitations = state
        .invitation_service
        .list(organization_id)
        .await
        .map_err(|e| {
            tracing::error!("List invitations error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error", &e.to_string())),
            )
        })?;

    Ok(Json(invitations))
}

/// Revoke a pending invitation
/// DELETE /api/invitations/:invitation_id
pub async fn revoke_invitation(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(invitation_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    let organization_id = resolve_context(&state, auth_user.user_id).await?;

    state
        .invitation_service
        .revoke(invitation_id, organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Revoke invitation error: {}", e);
            let (status, error_code) = match &e {
                OrgError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            };

            (status, Json(ErrorResponse::new(error_code, &e.to_string())))
        })?;

    Ok(Json(MessageResponse {
        message: "Invitation revoked".to_string(),
    }))
}

/// Verify an invitation token (public, for the acceptance page)
/// GET /api/invitations/verify?token=xxx
pub async fn verify_invitation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerifyInvitationQuery>,
) -> Result<Json<VerifyInvitationResponse>, (StatusCode, Json<ErrorResponse>)> {
    let token = query.token.ok_or_else(missing_token)?;

    let (invitation, organization) = state
        .invitation_service
        .preview(&token)
        .await
        .map_err(|e| map_accept_error(&e))?;

    Ok(Json(VerifyInvitationResponse {
        organization_id: organization.id,
        organization_name: organization.name,
        email: invitation.email,
        role: invitation.role,
        expires_at: invitation.expires_at,
    }))
}

/// Accept an invitation as the authenticated caller
/// POST /api/invitations/accept
pub async fn accept_invitation(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(request): Json<AcceptInvitationRequest>,
) -> Result<Json<AcceptInvitationResponse>, (StatusCode, Json<ErrorResponse>)> {
    let token = request.token.ok_or_else(missing_token)?;

    let outcome = state
        .invitation_service
        .accept_authenticated(&token, auth_user.user_id)
        .await
        .map_err(|e| {
            tracing::warn!("Accept invitation error: {}", e);
            map_accept_error(&e)
        })?;

    let (outcome, organization_id, message) = describe(outcome);

    Ok(Json(AcceptInvitationResponse {
        outcome,
        organization_id,
        message,
    }))
}

/// Accept an invitation by creating a new account bound to its email (public)
/// POST /api/invitations/accept-signup
pub async fn accept_invitation_signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AcceptSignupRequest>,
) -> Result<Json<AcceptInvitationResponse>, (StatusCode, Json<ErrorResponse>)> {
    let token = request.token.ok_or_else(missing_token)?;

    let outcome = state
        .invitation_service
        .accept_with_signup(&token, &request.password, &request.full_name)
        .await
        .map_err(|e| {
            tracing::warn!("Accept invitation (signup) error: {}", e);
            map_accept_error(&e)
        })?;

    let (outcome, organization_id, _) = describe(outcome);

    Ok(Json(AcceptInvitationResponse {
        outcome,
        organization_id,
        message: "Account created and invitation accepted. You can now sign in.".to_string(),
    }))
}

/// Accept an invitation by signing in with an existing account (public)
/// POST /api/invitations/accept-signin
pub async fn accept_invitation_signin(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AcceptSigninRequest>,
) -> Result<Json<AcceptSigninResponse>, (StatusCode, Json<ErrorResponse>)> {
    let token = request.token.ok_or_else(missing_token)?;

    let sign_in = SignInRequest {
        email: request.email,
        password: request.password,
    };

    let (outcome, auth) = state
        .invitation_service
        .accept_with_signin(&token, &sign_in)
        .await
        .map_err(|e| {
            tracing::warn!("Accept invitation (signin) error: {}", e);
            map_accept_error(&e)
        })?;

    let (outcome, organization_id, message) = describe(outcome);

    Ok(Json(AcceptSigninResponse {
        outcome,
        organization_id,
        message,
        auth,
    }))
}
