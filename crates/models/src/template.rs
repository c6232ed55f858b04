use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Reusable definition of a recurring session's parameters
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Template {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub ticket_type: String,
    pub start_time: NaiveTime,
    pub tickets_per_period: i32,
    pub number_of_periods: i32,
    pub additional_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create new template request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTemplate {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub ticket_type: String,

    pub start_time: NaiveTime,

    #[validate(range(min = 1))]
    pub tickets_per_period: i32,

    #[validate(range(min = 1))]
    pub number_of_periods: i32,

    #[validate(length(max = 2000))]
    pub additional_info: Option<String>,
}
