// TicketHub API Server
// Console backend for organisations running recurring giveaway sessions

mod config;
mod handlers;
mod middleware;
mod routes;

use config::Config;
use dotenvy::dotenv;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub struct AppState {
    pub identity_service: Arc<tickethub_auth::IdentityService>,
    pub organization_service: tickethub_org::OrganizationService,
    pub member_service: tickethub_org::MemberService,
    pub invitation_service: tickethub_org::InvitationService,
    pub resolver: tickethub_org::OrgResolver,
    pub db: tickethub_database::Database,
    pub cache: Arc<tickethub_cache::Cache>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tickethub_api=debug,tower_http=debug".to_string()),
        )
        .init();

    tracing::info!("Starting TicketHub API Server");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Server: {}:{}", config.server_host, config.server_port);

    // Initialize database
    tracing::info!("Connecting to database...");
    let database = tickethub_database::Database::new(config.database.clone())
        .await
        .expect("Failed to connect to database");
    database.ping().await.expect("Database ping failed");
    tracing::info!("Database connected");

    // Initialize cache
    tracing::info!("Connecting to Redis...");
    let cache = tickethub_cache::Cache::new(config.cache.clone())
        .await
        .expect("Failed to connect to Redis");
    cache.ping().await.expect("Redis ping failed");
    tracing::info!("Redis connected");

    // Initialize JWT service
    let jwt_service = tickethub_auth::JwtService::from_env();
    tracing::info!("JWT service initialized");

    // Identity-provider boundary
    let identity_service = Arc::new(tickethub_auth::IdentityService::new(
        database.clone(),
        jwt_service,
    ));
    tracing::info!("Identity service initialized");

    // Membership & invitation workflow services
    let organization_service =
        tickethub_org::OrganizationService::new(database.clone(), identity_service.clone());
    let member_service = tickethub_org::MemberService::new(database.clone());
    let invitation_service = tickethub_org::InvitationService::new(
        database.clone(),
        identity_service.clone(),
        cache.clone(),
        config.base_url.clone(),
    );
    let resolver = tickethub_org::OrgResolver::new(database.clone(), cache.clone());
    tracing::info!("Organisation workflow services initialized");

    // Create app state
    let state = Arc::new(AppState {
        identity_service,
        organization_service,
        member_service,
        invitation_service,
        resolver,
        db: database,
        cache: Arc::new(cache),
    });

    // Create router
    let app = routes::create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
    );

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server ready at http://{}", addr);

    axum::serve(listener, app).await.expect("Server error");

    Ok(())
}
