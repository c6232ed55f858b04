use crate::handlers;
use crate::middleware;
use crate::AppState;
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Organisation sign-up (public)
        .route(
            "/api/organizations",
            post(handlers::organization::register).layer(axum::middleware::from_fn_with_state(
                state.cache.clone(),
                middleware::rate_limit_signup,
            )),
        )
        // Auth routes
        .route(
            "/api/auth/login",
            post(handlers::auth::login).layer(axum::middleware::from_fn_with_state(
                state.cache.clone(),
                middleware::rate_limit_login,
            )),
        )
        .route("/api/auth/refresh", post(handlers::auth::refresh_token))
        .route(
            "/api/auth/logout",
            post(handlers::auth::logout)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/auth/me",
            get(handlers::auth::me)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Organisation context
        .route(
            "/api/context",
            get(handlers::organization::get_context)
                .put(handlers::organization::switch_context)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Members
        .route(
            "/api/members",
            get(handlers::organization::list_members)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/members/:user_id",
            delete(handlers::organization::remove_member)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Invitations - public acceptance endpoints
        .route(
            "/api/invitations/verify",
            get(handlers::invitation::verify_invitation),
        )
        .route(
            "/api/invitations/accept-signup",
            post(handlers::invitation::accept_invitation_signup),
        )
        .route(
            "/api/invitations/accept-signin",
            post(handlers::invitation::accept_invitation_signin),
        )
        // Invitations - protected
        .route(
            "/api/invitations/accept",
            post(handlers::invitation::accept_invitation)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/invitations",
            post(handlers::invitation::create_invitation)
                .get(handlers::invitation::list_invitations)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/invitations/:invitation_id",
            delete(handlers::invitation::revoke_invitation)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Templates
        .route(
            "/api/templates",
            get(handlers::template::list_templates)
                .post(handlers::template::create_template)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/templates/:template_id",
            delete(handlers::template::delete_template)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Sessions
        .route(
            "/api/sessions",
            get(handlers::session::list_sessions)
                .post(handlers::session::create_session)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .route(
            "/api/sessions/:session_id",
            delete(handlers::session::delete_session)
                .route_layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        // Public listing
        .route(
            "/api/public/sessions",
            get(handlers::session::public_sessions),
        )
        .with_state(state)
}
