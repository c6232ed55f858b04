use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle status of a scheduled session
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
    Cancelled,
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Active
    }
}

/// A scheduled, dated instantiation of a template
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub template_id: Uuid,
    pub session_date: NaiveDate,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

/// Create new session request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    pub template_id: Uuid,
    pub session_date: NaiveDate,

    #[serde(default)]
    pub status: SessionStatus,
}

/// Session joined with its template, for organisation-scoped listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionWithTemplate {
    pub id: Uuid,
    pub session_date: NaiveDate,
    pub status: SessionStatus,

    // Template details
    pub template_id: Uuid,
    pub template_name: String,
    pub ticket_type: String,
    pub start_time: NaiveTime,
    pub tickets_per_period: i32,
    pub number_of_periods: i32,
}

/// Active session with embedded template and organisation, for the public listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PublicSession {
    pub id: Uuid,
    pub session_date: NaiveDate,
    pub status: SessionStatus,

    pub template_name: String,
    pub ticket_type: String,
    pub start_time: NaiveTime,
    pub tickets_per_period: i32,
    pub number_of_periods: i32,

    pub organization_id: Uuid,
    pub organization_name: String,
    pub city: String,
    pub state: String,
    pub country: String,
}
