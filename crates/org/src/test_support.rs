// Shared fixtures for the database-backed workflow tests. Those tests are
// #[ignore]d and expect DATABASE_URL / REDIS_URL pointing at a dev stack
// with the tickethub schema loaded.

use crate::bootstrap::BootstrapRequest;
use std::sync::Arc;
use tickethub_auth::{IdentityService, JwtService};
use tickethub_cache::{Cache, CacheConfig};
use tickethub_database::{Database, DatabaseConfig};
use uuid::Uuid;

pub(crate) async fn stack() -> (Database, Cache, Arc<IdentityService>) {
    let db = Database::new(DatabaseConfig::from_env())
        .await
        .expect("Failed to connect to database");
    let cache = Cache::new(CacheConfig::from_env())
        .await
        .expect("Failed to connect to Redis");
    let identity = Arc::new(IdentityService::new(
        db.clone(),
        JwtService::new("test-secret-key-min-32-characters-long"),
    ));

    (db, cache, identity)
}

pub(crate) fn unique_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}

pub(crate) fn bootstrap_request(email: &str, organization_name: &str) -> BootstrapRequest {
    BootstrapRequest {
        email: email.to_string(),
        password: "ValidP@ssw0rd".to_string(),
        full_name: "Test Admin".to_string(),
        organization_name: organization_name.to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        country: "USA".to_string(),
        website: None,
    }
}
