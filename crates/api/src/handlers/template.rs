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
use tickethub_database::TemplateRepository;
use tickethub_models::{NewTemplate, Template};
use uuid::Uuid;
use validator::Validate;

/// List the current organisation's templates
/// GET /api/templates
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<Template>>, (StatusCode, Json<ErrorResponse>)> {
    let organization_id = resolve_context(&state, auth_user.user_id).await?;

    let repo = TemplateRepository::new(state.db.pool().clone());
    let templates = repo.list_by_organization(organization_id).await.map_err(|e| {
        tracing::error!("List templates error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("internal_error", &e.to_string())),
        )
    })?;

    Ok(Json(templates))
}

/// Create a template in the current organisation
/// POST /api/templates
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(request): Json<NewTemplate>,
) -> Result<Json<Template>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(e) = request.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("invalid_request", &e.to_string())),
        ));
    }

    let organization_id = resolve_context(&state, auth_user.user_id).await?;

    let repo = TemplateRepository::new(state.db.pool().clone());
    let template = repo.create(organization_id, &request).await.map_err(|e| {
        tracing::error!("Create template error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("internal_error", &e.to_string())),
        )
    })?;

    tracing::info!(
        "Template created: id={}, organization={}",
        template.id,
        organization_id
    );

    Ok(Json(template))
}

/// Delete a template and every session scheduled from it
/// DELETE /api/templates/:template_id
pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(template_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    let organization_id = resolve_context(&state, auth_user.user_id).await?;

    let repo = TemplateRepository::new(state.db.pool().clone());
    let deleted = repo
        .delete_cascade(template_id, organization_id)
        .await
        .map_err(|e| {
            tracing::error!("Delete template error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error", &e.to_string())),
            )
        })?;

    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                "template_not_found",
                "Template not found in this organisation",
            )),
        ));
    }

    Ok(Json(MessageResponse {
        message: "Template and its sessions deleted".to_string(),
    }))
}
