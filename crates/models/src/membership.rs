use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Membership linking a user to an organisation with a role
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

/// Request to link a user to an organisation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewMembership {
    pub user_id: Uuid,
    pub organization_id: Uuid,

    #[validate(length(min = 1, max = 50))]
    pub role: String,
}

/// Membership joined with the member's mirrored profile
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MembershipWithProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,

    // Profile details
    pub email: String,
    pub full_name: String,
}

/// Organisation roles
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const COORDINATOR: &str = "coordinator";
}
