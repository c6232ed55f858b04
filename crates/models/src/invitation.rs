use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Single-use invitation to join an organisation.
/// The raw token is never stored; lookups go through its SHA-256 hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invitation {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub email: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewInvitation {
    pub organization_id: Uuid,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 50))]
    pub role: String,

    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
